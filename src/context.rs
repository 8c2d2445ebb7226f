use std::sync::Arc;

use anyhow::Context;
use libris_http::ApiClient;
use libris_kernel::settings::UxSettings;
use libris_kernel::{Session, Settings};

/// Everything a view needs, handed over at construction.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub ux: UxSettings,
}

impl AppContext {
    pub fn new(client: ApiClient, ux: UxSettings) -> Self {
        Self { client, ux }
    }

    /// Open the persistent session and build the API client from `settings`.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let session = Session::open(&settings.session)
            .with_context(|| "failed to open session store")?;
        let client = ApiClient::new(&settings.api, Arc::new(session))?;
        Ok(Self::new(client, settings.ux.clone()))
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }
}
