//! Profile page with a mock friend directory. Nothing here talks to the backend.

use std::collections::BTreeSet;

use async_trait::async_trait;
use libris_kernel::{User, View};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::utils::{self, Notice};

pub const NO_USER: &str = "No user logged in.";
pub const NO_EMAIL: &str = "No email provided";

const AVATAR_ENDPOINT: &str = "https://ui-avatars.com/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: u64,
    pub name: &'static str,
    pub email: &'static str,
}

/// Fixed directory shown on the profile page.
pub const MOCK_DIRECTORY: [DirectoryEntry; 3] = [
    DirectoryEntry {
        id: 1,
        name: "Admin",
        email: "admin123@gmail.com",
    },
    DirectoryEntry {
        id: 2,
        name: "Test",
        email: "test@gmail.com",
    },
    DirectoryEntry {
        id: 3,
        name: "Haha",
        email: "haha@gmail.com",
    },
];

/// What the profile card shows for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

impl Profile {
    fn from_user(user: &User) -> Self {
        let email = if user.email.is_empty() {
            NO_EMAIL.to_string()
        } else {
            user.email.clone()
        };
        Self {
            name: user.name.clone(),
            email,
            avatar_url: avatar_url(&user.name),
        }
    }
}

/// Generated avatar image for `name`.
pub fn avatar_url(name: &str) -> String {
    let name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{AVATAR_ENDPOINT}?name={name}&background=random&color=fff&size=150")
}

pub struct ProfileView {
    ctx: AppContext,
    directory: Vec<DirectoryEntry>,
    search: String,
    added: BTreeSet<u64>,
    notice: Option<Notice>,
}

impl ProfileView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            directory: MOCK_DIRECTORY.to_vec(),
            search: String::new(),
            added: BTreeSet::new(),
            notice: None,
        }
    }

    pub fn profile(&self) -> Result<Profile, ViewError> {
        self.ctx
            .session()
            .user()
            .map(|user| Profile::from_user(&user))
            .ok_or(ViewError::SignedOut)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Directory entries whose name contains the search term, minus the
    /// current user.
    pub fn candidates(&self) -> Vec<&DirectoryEntry> {
        let term = self.search.to_lowercase();
        let me = self.ctx.session().user().map(|user| user.id);
        self.directory
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&term))
            .filter(|entry| Some(entry.id) != me)
            .collect()
    }

    pub fn is_added(&self, id: u64) -> bool {
        self.added.contains(&id)
    }

    pub fn friends(&self) -> impl Iterator<Item = u64> + '_ {
        self.added.iter().copied()
    }

    pub fn notice(&self) -> Option<&Notice> {
        utils::visible(&self.notice)
    }

    /// Mark a listed entry as a friend. Returns `false` if it already was one.
    pub fn add_friend(&mut self, id: u64) -> Result<bool, ViewError> {
        let name = self
            .candidates()
            .into_iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name)
            .ok_or(ViewError::UnknownEntry(id))?;

        if !self.added.insert(id) {
            return Ok(false);
        }
        tracing::debug!(friend = id, "friend added");
        self.notice = Some(Notice::success(
            format!("{name} has been added as a friend!"),
            self.ctx.ux.notice_ttl(),
        ));
        Ok(true)
    }
}

#[async_trait]
impl View for ProfileView {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn mount(&mut self) -> anyhow::Result<()> {
        utils::pause(self.ctx.ux.profile_delay()).await;
        Ok(())
    }

    fn unmount(&mut self) {
        self.search.clear();
        self.notice = None;
    }
}
