//! Table panel: drives [`TableState`] against the backend
//!
//! Every operation is an `async fn`. Dropping its future abandons the request
//! and frees the row for the next change.

use crate::api::ApiClient;
use crate::table::{messages, Mutation, Row, TableState};
use crate::Result;

/// Interactive yes/no confirmation, asked before destructive actions
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; for non-interactive use
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Marks a mutation in flight and releases the row if the future is dropped
struct Flight<'a> {
    state: &'a mut TableState,
    mutation: Option<Mutation>,
}

impl<'a> Flight<'a> {
    fn new(state: &'a mut TableState, mutation: Mutation) -> Self {
        Self {
            state,
            mutation: Some(mutation),
        }
    }

    fn mutation(&self) -> Option<&Mutation> {
        self.mutation.as_ref()
    }

    fn settle(mut self, outcome: &Result<()>) -> bool {
        match self.mutation.take() {
            Some(mutation) => self.state.settle(&mutation, outcome),
            None => false,
        }
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        if let Some(mutation) = self.mutation.take() {
            tracing::debug!("Abandoned {:?}", mutation);
            self.state.release(&mutation);
        }
    }
}

/// Editable, paginated view of the backend table
pub struct TablePanel {
    api: ApiClient,
    state: TableState,
    confirm: Box<dyn Confirm>,
}

impl std::fmt::Debug for TablePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablePanel")
            .field("api", &self.api)
            .field("state", &self.state)
            .finish()
    }
}

impl TablePanel {
    pub fn new(api: ApiClient, confirm: Box<dyn Confirm>) -> Self {
        Self {
            api,
            state: TableState::new(),
            confirm,
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Fetch the full snapshot, replacing the cached one
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.fetch_rows().await {
            Ok(rows) => {
                self.state.apply_snapshot(rows);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Fetching rows failed: {}", e);
                self.state.fail_refresh();
                Err(e)
            }
        }
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<()> {
        self.state.begin_edit(index)
    }

    pub fn update_field(&mut self, index: usize, column: &str, value: String) -> Result<()> {
        self.state.update_field(index, column, value)
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// The row being edited, as it will be sent
    pub fn edit_buffer(&self) -> &Row {
        self.state.edit_buffer()
    }

    /// Send the edit buffer for `index`, then refresh on success
    pub async fn save(&mut self, index: usize) -> Result<()> {
        let mutation = self.state.prepare_save(index)?;
        self.run(mutation).await
    }

    /// Delete `index` after confirmation. Returns false when declined.
    pub async fn remove(&mut self, index: usize) -> Result<bool> {
        self.state.check_row(index)?;
        let confirmed = self.confirm.confirm(messages::DELETE_PROMPT);
        match self.state.prepare_remove(index, confirmed)? {
            Some(mutation) => self.run(mutation).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Restore the backend backup, then refresh on success
    pub async fn restore(&mut self) -> Result<()> {
        let mutation = self.state.prepare_restore()?;
        self.run(mutation).await
    }

    pub fn next_page(&mut self) -> bool {
        self.state.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.state.prev_page()
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }

    async fn run(&mut self, mutation: Mutation) -> Result<()> {
        let flight = Flight::new(&mut self.state, mutation);
        let outcome = match flight.mutation() {
            Some(mutation) => self.api.execute(mutation).await,
            None => Ok(()),
        };
        if flight.settle(&outcome) {
            // a failed refresh is recorded in the table error
            let _ = self.refresh().await;
        }
        outcome
    }
}
