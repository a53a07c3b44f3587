//! `login` and `logout`

use std::io::Write;

use pulseboard_core::AuthGate;

use crate::error::{PulseboardError, Result};
use crate::Dashboard;

pub async fn run_login(
    dashboard: &Dashboard,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut gate = AuthGate::with_credentials(username, password);
    match gate.submit(dashboard.api()).await {
        Some(route) => {
            writeln!(out, "Logged in as {}", username)?;
            tracing::debug!("Next view: {}", route.path());
            Ok(())
        }
        None => Err(PulseboardError::Rejected(gate.error().to_string())),
    }
}

pub fn run_logout(dashboard: &Dashboard, out: &mut impl Write) -> Result<()> {
    dashboard.session().logout();
    writeln!(out, "Logged out")?;
    Ok(())
}
