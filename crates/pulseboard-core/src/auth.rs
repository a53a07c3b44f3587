//! Login form state

use crate::api::ApiClient;
use crate::router::Route;

/// Shown for every failed login, whatever the cause
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Credentials form that exchanges a username and password for a session token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGate {
    pub username: String,
    pub password: String,
    error: String,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            error: String::new(),
        }
    }

    /// Display text of the last failure; empty when there is none
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Submit the credentials.
    ///
    /// On success the token is stored in the client's session and the
    /// dashboard route is returned. On any failure the fixed error message is
    /// set and the session is left unchanged.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Route> {
        tracing::debug!("Submitting login for user '{}'", self.username);
        match api.login(&self.username, &self.password).await {
            Ok(token) => {
                api.session().set_token(&token);
                self.error.clear();
                tracing::info!("Logged in as '{}'", self.username);
                Some(Route::Dashboard)
            }
            Err(e) => {
                tracing::warn!("Login for '{}' failed: {}", self.username, e);
                self.error = LOGIN_FAILED.to_string();
                None
            }
        }
    }
}
