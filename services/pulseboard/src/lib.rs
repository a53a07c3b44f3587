//! Pulseboard - command-line client for the data dashboard backend
//!
//! Logs in, pages through and edits the backend table, and follows the live
//! feed from a terminal.

pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod io;
pub mod prompt;
pub mod storage;

pub use config::{load_config, Config};
pub use error::{PulseboardError, Result};

use std::sync::Arc;

use pulseboard_core::io::HttpClient;
use pulseboard_core::router::{self, Route};
use pulseboard_core::{ApiClient, Confirm, Endpoints, SessionStore, TablePanel, TokenStorage};

use crate::feed::FeedClient;
use crate::io::ReqwestHttpClient;
use crate::storage::FileTokenStorage;

/// Session, API client, and feed endpoint shared by every command
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: ApiClient,
}

impl Dashboard {
    /// Production wiring: reqwest transport and a token file
    pub fn from_config(config: &Config) -> Result<Self> {
        let token_path = config.session.token_path()?;
        tracing::debug!("Token file: {:?}", token_path);
        Ok(Self::with_parts(
            Arc::new(ReqwestHttpClient::new()),
            Box::new(FileTokenStorage::new(token_path)),
            Endpoints::new(&config.backend.api_url, &config.backend.ws_url),
        ))
    }

    pub fn with_parts(
        http: Arc<dyn HttpClient>,
        storage: Box<dyn TokenStorage>,
        endpoints: Endpoints,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        Self {
            api: ApiClient::new(http, endpoints, session),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    pub fn panel(&self, confirm: Box<dyn Confirm>) -> TablePanel {
        TablePanel::new(self.api.clone(), confirm)
    }

    pub fn feed_client(&self) -> FeedClient {
        FeedClient::new(self.api.endpoints().feed())
    }

    /// Fail unless the dashboard view would be shown
    pub fn require_session(&self) -> Result<()> {
        match router::guard(Route::Dashboard, self.session().is_authenticated()) {
            Route::Dashboard => Ok(()),
            Route::Login => Err(PulseboardError::NotLoggedIn),
        }
    }
}
