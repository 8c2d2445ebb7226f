use async_trait::async_trait;
use libris_http::Endpoint;
use libris_kernel::{User, View};

use super::models::{Credentials, LoginResponse, Phase, Submission};
use crate::context::AppContext;
use crate::error::ViewError;
use crate::utils::{self, Notice, RETRY_MESSAGE};

pub const LOGIN_REJECTED: &str = "Login failed: incorrect email or password.";
pub const LOGGED_IN: &str = "Logged in successfully!";

pub struct LoginView {
    ctx: AppContext,
    pub email: String,
    pub password: String,
    phase: Phase,
    notice: Option<Notice>,
}

impl LoginView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            email: String::new(),
            password: String::new(),
            phase: Phase::Idle,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        utils::visible(&self.notice)
    }

    /// Exchange the credentials for a token and establish the session.
    pub async fn submit(&mut self) -> Result<User, ViewError> {
        let submission = Submission::begin(&mut self.phase)?;
        utils::pause(self.ctx.ux.submit_delay()).await;

        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        let result = self
            .ctx
            .client
            .post_json::<_, LoginResponse>(Endpoint::Login, &credentials)
            .await;

        let LoginResponse { token, user } = match result {
            Ok(response) => response,
            Err(err) => {
                let message = if err.is_validation() {
                    tracing::debug!(errors = ?err.field_errors(), "login rejected by backend");
                    LOGIN_REJECTED
                } else {
                    RETRY_MESSAGE
                };
                self.notice = Some(Notice::error(message, self.ctx.ux.notice_ttl()));
                return Err(err.into());
            }
        };

        let session = self.ctx.session().clone();
        if let Err(err) = session.set_token(token) {
            tracing::error!(error = %err, "could not persist access token");
            self.notice = Some(Notice::error(RETRY_MESSAGE, self.ctx.ux.notice_ttl()));
            return Err(err.into());
        }
        session.set_user(Some(user.clone()));

        tracing::info!(user_id = user.id, "logged in");
        submission.succeed();
        self.password.clear();
        self.notice = Some(Notice::success(LOGGED_IN, self.ctx.ux.notice_ttl()));
        Ok(user)
    }
}

#[async_trait]
impl View for LoginView {
    fn name(&self) -> &'static str {
        "login"
    }

    fn unmount(&mut self) {
        self.password.clear();
        self.phase = Phase::Idle;
        self.notice = None;
    }
}
