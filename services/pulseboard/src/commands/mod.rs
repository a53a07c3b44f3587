//! Subcommand implementations
//!
//! Each command writes its user-facing output to the supplied writer and
//! leaves diagnostics to `tracing`.

pub mod feed;
pub mod session;
pub mod table;

pub use feed::run_feed;
pub use session::{run_login, run_logout};
pub use table::{run_delete, run_edit, run_restore, run_rows};

use crate::error::{PulseboardError, Result};

/// Parse a `column=value` assignment
pub fn parse_assignment(text: &str) -> Result<(String, String)> {
    match text.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(PulseboardError::Config(format!(
            "Expected column=value, got '{}'",
            text
        ))),
    }
}
