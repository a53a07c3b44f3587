//! Error types for the pulseboard client

use pulseboard_core::DashboardError;

/// Errors that can occur in the command-line client
#[derive(Debug, thiserror::Error)]
pub enum PulseboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed connection failed: {0}")]
    Feed(String),

    #[error("Not logged in; run `pulseboard login` first")]
    NotLoggedIn,

    /// The backend refused an action; carries the message shown to the user
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Dashboard(#[from] DashboardError),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, PulseboardError>;
