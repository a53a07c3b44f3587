//! Table commands: `rows`, `edit`, `delete`, `restore`
//!
//! Row indices are positions in the full table as printed by `rows`, not
//! positions within a page.

use std::io::Write;

use pulseboard_core::panel::AssumeYes;
use pulseboard_core::{Confirm, DashboardError, TablePanel, TableState};

use crate::error::{PulseboardError, Result};
use crate::Dashboard;

/// Print one page of the table. `page` counts from 1.
pub async fn run_rows(dashboard: &Dashboard, page: usize, out: &mut impl Write) -> Result<()> {
    let mut panel = loaded_panel(dashboard, Box::new(AssumeYes)).await?;
    for _ in 1..page {
        if !panel.next_page() {
            break;
        }
    }
    print_page(panel.state(), out)
}

pub async fn run_edit(
    dashboard: &Dashboard,
    index: usize,
    assignments: &[(String, String)],
    out: &mut impl Write,
) -> Result<()> {
    let mut panel = loaded_panel(dashboard, Box::new(AssumeYes)).await?;
    panel.begin_edit(index)?;
    for (column, value) in assignments {
        panel.update_field(index, column, value.clone())?;
    }
    tracing::debug!("Saving row {}: {:?}", index, panel.edit_buffer());
    panel
        .save(index)
        .await
        .map_err(|e| rejection(&panel, e))?;
    writeln!(out, "Row {} updated", index)?;
    Ok(())
}

pub async fn run_delete(
    dashboard: &Dashboard,
    index: usize,
    confirm: Box<dyn Confirm>,
    out: &mut impl Write,
) -> Result<()> {
    let mut panel = loaded_panel(dashboard, confirm).await?;
    let deleted = panel
        .remove(index)
        .await
        .map_err(|e| rejection(&panel, e))?;
    if deleted {
        writeln!(out, "Row {} deleted", index)?;
    } else {
        writeln!(out, "Delete cancelled")?;
    }
    Ok(())
}

pub async fn run_restore(dashboard: &Dashboard, out: &mut impl Write) -> Result<()> {
    let mut panel = loaded_panel(dashboard, Box::new(AssumeYes)).await?;
    panel.restore().await.map_err(|e| rejection(&panel, e))?;
    writeln!(out, "Backup restored ({} rows)", panel.state().snapshot().len())?;
    Ok(())
}

async fn loaded_panel(dashboard: &Dashboard, confirm: Box<dyn Confirm>) -> Result<TablePanel> {
    dashboard.require_session()?;
    let mut panel = dashboard.panel(confirm);
    panel.refresh().await.map_err(|e| rejection(&panel, e))?;
    Ok(panel)
}

/// Prefer the message the panel shows over the underlying cause
fn rejection(panel: &TablePanel, cause: DashboardError) -> PulseboardError {
    match panel.state().error() {
        Some(message) => {
            tracing::debug!("{}", cause);
            PulseboardError::Rejected(message.to_string())
        }
        None => cause.into(),
    }
}

fn print_page(state: &TableState, out: &mut impl Write) -> Result<()> {
    let columns = state.columns();
    if columns.is_empty() {
        writeln!(out, "No rows")?;
        return Ok(());
    }

    writeln!(out, "#\t{}", columns.join("\t"))?;
    for (index, row) in state.page_rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).unwrap_or_default())
            .collect();
        writeln!(out, "{}\t{}", index, cells.join("\t"))?;
    }

    write!(out, "Page {}", state.page() + 1)?;
    if state.has_prev_page() {
        write!(out, "  (previous: --page {})", state.page())?;
    }
    if state.has_next_page() {
        write!(out, "  (next: --page {})", state.page() + 2)?;
    }
    writeln!(out)?;
    Ok(())
}
