//! Error types for the dashboard core

/// Errors that can occur while talking to the backend or managing client state
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Row {0} already has a change in flight")]
    RowBusy(usize),

    #[error("Restore already in flight")]
    RestoreBusy,

    #[error("Row {0} is not being edited")]
    NotEditing(usize),

    #[error("Row {0} is not in the current snapshot")]
    RowOutOfRange(usize),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
