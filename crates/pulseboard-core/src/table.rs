//! Tabular data state: snapshot cache, edit buffer, pagination
//!
//! `TableState` performs no I/O. Mutations are split into a `prepare_*`
//! step that validates and marks the row in flight, and [`TableState::settle`]
//! which applies the backend's verdict. The native panel and the browser
//! table both drive the same transitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DashboardError, Result};

/// Rows shown per page
pub const PAGE_SIZE: usize = 10;

/// Fixed user-facing messages
pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to load data. Please try again.";
    pub const UPDATE_FAILED: &str = "Failed to update row. Please try again.";
    pub const DELETE_FAILED: &str = "Failed to delete row. Please try again.";
    pub const RESTORE_FAILED: &str = "Failed to restore backup. Please try again.";
    pub const ROW_BUSY: &str = "Another change to this row is still in progress.";
    pub const RESTORE_BUSY: &str = "A restore is already in progress.";
    pub const DELETE_PROMPT: &str = "Are you sure you want to delete this row?";
}

/// One backend row: column name to value, in the order the backend sent them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell text for a column; non-string values render as JSON
    pub fn get(&self, column: &str) -> Option<String> {
        self.0.get(column).map(cell_text)
    }

    pub fn set(&mut self, column: &str, value: String) {
        self.0.insert(column.to_string(), Value::String(value));
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, String)> {
        self.0.iter().map(|(k, v)| (k.as_str(), cell_text(v)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A change to send to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Full-row replace of the row at `index`
    Update { index: usize, row: Row },
    Delete { index: usize },
    /// Restore the backend's backup copy
    Restore,
}

impl Mutation {
    fn row_index(&self) -> Option<usize> {
        match self {
            Mutation::Update { index, .. } | Mutation::Delete { index } => Some(*index),
            Mutation::Restore => None,
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Mutation::Update { .. } => messages::UPDATE_FAILED,
            Mutation::Delete { .. } => messages::DELETE_FAILED,
            Mutation::Restore => messages::RESTORE_FAILED,
        }
    }
}

/// Client-side view of the backend table
#[derive(Debug, Clone, Default)]
pub struct TableState {
    snapshot: Vec<Row>,
    editing_index: Option<usize>,
    edit_buffer: Row,
    error: Option<String>,
    page: usize,
    in_flight: BTreeSet<usize>,
    restoring: bool,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[Row] {
        &self.snapshot
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing_index
    }

    pub fn is_editing(&self, index: usize) -> bool {
        self.editing_index == Some(index)
    }

    pub fn edit_buffer(&self) -> &Row {
        &self.edit_buffer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_in_flight(&self, index: usize) -> bool {
        self.in_flight.contains(&index)
    }

    /// Replace the snapshot wholesale; no other state is touched
    pub fn apply_snapshot(&mut self, rows: Vec<Row>) {
        tracing::debug!("Applying snapshot of {} rows", rows.len());
        self.snapshot = rows;
    }

    pub fn fail_refresh(&mut self) {
        self.error = Some(messages::LOAD_FAILED.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Column headers, taken from the first row of the snapshot
    pub fn columns(&self) -> Vec<String> {
        self.snapshot
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<()> {
        let row = self
            .snapshot
            .get(index)
            .ok_or(DashboardError::RowOutOfRange(index))?;
        self.edit_buffer = row.clone();
        self.editing_index = Some(index);
        Ok(())
    }

    pub fn update_field(&mut self, index: usize, column: &str, value: String) -> Result<()> {
        if !self.is_editing(index) {
            return Err(DashboardError::NotEditing(index));
        }
        self.edit_buffer.set(column, value);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing_index = None;
        self.edit_buffer = Row::new();
    }

    /// Validate a save of the row being edited and mark it in flight
    pub fn prepare_save(&mut self, index: usize) -> Result<Mutation> {
        if !self.is_editing(index) {
            return Err(DashboardError::NotEditing(index));
        }
        self.claim_row(index)?;
        Ok(Mutation::Update {
            index,
            row: self.edit_buffer.clone(),
        })
    }

    /// Validate a delete; without confirmation nothing happens
    pub fn prepare_remove(&mut self, index: usize, confirmed: bool) -> Result<Option<Mutation>> {
        self.check_row(index)?;
        if !confirmed {
            tracing::debug!("Delete of row {} not confirmed", index);
            return Ok(None);
        }
        self.claim_row(index)?;
        Ok(Some(Mutation::Delete { index }))
    }

    pub fn prepare_restore(&mut self) -> Result<Mutation> {
        if self.restoring {
            self.error = Some(messages::RESTORE_BUSY.to_string());
            return Err(DashboardError::RestoreBusy);
        }
        self.restoring = true;
        Ok(Mutation::Restore)
    }

    /// Apply the backend's verdict on a prepared mutation.
    ///
    /// Returns true when the snapshot is stale and must be refetched.
    pub fn settle(&mut self, mutation: &Mutation, outcome: &Result<()>) -> bool {
        self.release(mutation);
        match outcome {
            Ok(()) => {
                if let Mutation::Update { index, .. } = mutation {
                    if self.is_editing(*index) {
                        self.cancel_edit();
                    }
                }
                true
            }
            Err(e) => {
                tracing::warn!("{:?} failed: {}", mutation, e);
                self.error = Some(mutation.failure_message().to_string());
                false
            }
        }
    }

    /// Drop the in-flight marker of a mutation that was abandoned
    pub fn release(&mut self, mutation: &Mutation) {
        match mutation.row_index() {
            Some(index) => {
                self.in_flight.remove(&index);
            }
            None => self.restoring = false,
        }
    }

    /// Fail unless `index` addresses a row of the snapshot
    pub fn check_row(&self, index: usize) -> Result<()> {
        if index >= self.snapshot.len() {
            return Err(DashboardError::RowOutOfRange(index));
        }
        Ok(())
    }

    fn claim_row(&mut self, index: usize) -> Result<()> {
        if !self.in_flight.insert(index) {
            self.error = Some(messages::ROW_BUSY.to_string());
            return Err(DashboardError::RowBusy(index));
        }
        Ok(())
    }

    /// Rows of the current page with their absolute snapshot index
    pub fn page_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        let start = self.window_start();
        self.window()
            .iter()
            .enumerate()
            .map(move |(offset, row)| (start + offset, row))
    }

    /// A short page means there is nothing further to show
    pub fn has_next_page(&self) -> bool {
        self.window().len() >= PAGE_SIZE
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 0
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    fn window_start(&self) -> usize {
        self.page.saturating_mul(PAGE_SIZE).min(self.snapshot.len())
    }

    fn window(&self) -> &[Row] {
        let start = self.window_start();
        let end = (start + PAGE_SIZE).min(self.snapshot.len());
        &self.snapshot[start..end]
    }
}
