//! Backend API client
//!
//! Endpoints:
//!
//! | Method | Path                              | Auth   |
//! |--------|-----------------------------------|--------|
//! | POST   | `/login?username=&password=`      | none   |
//! | GET    | `/csv`                            | Bearer |
//! | PUT    | `/csv/{index}`                    | Bearer |
//! | DELETE | `/csv/{index}`                    | Bearer |
//! | POST   | `/restore`                        | Bearer |
//! | WS     | `/ws/random-numbers`              | none   |

use std::sync::Arc;

use serde::Deserialize;

use crate::io::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::session::SessionStore;
use crate::table::{Mutation, Row};
use crate::{DashboardError, Result};

/// Path of the live feed socket
pub const FEED_PATH: &str = "/ws/random-numbers";

/// URL builder for the backend and feed endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_url: String,
    ws_url: String,
}

impl Endpoints {
    pub fn new(api_url: &str, ws_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            ws_url: ws_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn login(&self) -> String {
        format!("{}/login", self.api_url)
    }

    pub fn rows(&self) -> String {
        format!("{}/csv", self.api_url)
    }

    pub fn row(&self, index: usize) -> String {
        format!("{}/csv/{}", self.api_url, index)
    }

    pub fn restore(&self) -> String {
        format!("{}/restore", self.api_url)
    }

    pub fn feed(&self) -> String {
        format!("{}{}", self.ws_url, FEED_PATH)
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Typed access to the backend, authorizing requests from the shared session
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            endpoints,
            session,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Exchange credentials for a token. The session is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let request = HttpRequest::new(Method::Post, self.endpoints.login())
            .query("username", username)
            .query("password", password);
        let response = self.send(request).await?;
        let parsed: LoginResponse = serde_json::from_str(&response.body)?;
        Ok(parsed.token)
    }

    /// Fetch the full row snapshot
    pub async fn fetch_rows(&self) -> Result<Vec<Row>> {
        let request = self.authorized(Method::Get, self.endpoints.rows());
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Replace the row at `index`
    pub async fn update_row(&self, index: usize, row: &Row) -> Result<()> {
        let body = serde_json::to_string(row)?;
        let request = self
            .authorized(Method::Put, self.endpoints.row(index))
            .json_body(body);
        self.send(request).await.map(|_| ())
    }

    pub async fn delete_row(&self, index: usize) -> Result<()> {
        let request = self.authorized(Method::Delete, self.endpoints.row(index));
        self.send(request).await.map(|_| ())
    }

    /// Ask the backend to restore its backup copy of the table
    pub async fn restore_backup(&self) -> Result<()> {
        let request = self.authorized(Method::Post, self.endpoints.restore());
        self.send(request).await.map(|_| ())
    }

    /// Send a prepared table mutation
    pub async fn execute(&self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::Update { index, row } => self.update_row(*index, row).await,
            Mutation::Delete { index } => self.delete_row(*index).await,
            Mutation::Restore => self.restore_backup().await,
        }
    }

    fn authorized(&self, method: Method, url: String) -> HttpRequest {
        HttpRequest::new(method, url).bearer(self.session.token())
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.http.send(request).await?;
        if !response.is_success() {
            tracing::debug!("{} {} rejected with status {}", method, url, response.status);
            return Err(DashboardError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}
