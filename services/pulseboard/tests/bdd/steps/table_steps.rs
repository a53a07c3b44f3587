//! BDD step definitions for the table commands

use cucumber::{given, then, when};
use pulseboard::commands;
use pulseboard_core::Confirm;

use crate::backend::sample_rows;
use crate::world::PulseboardWorld;

struct Answer(bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[given(expr = "the backend table has {int} rows")]
fn backend_rows(world: &mut PulseboardWorld, count: usize) {
    world.backend().with_state(|s| {
        s.rows = sample_rows(count);
        s.backup = sample_rows(count);
    });
}

#[given(expr = "the backend has lost all but {int} rows")]
fn backend_lost_rows(world: &mut PulseboardWorld, count: usize) {
    world.backend().with_state(|s| s.rows.truncate(count));
}

#[given("the backend rejects changes")]
fn backend_rejects(world: &mut PulseboardWorld) {
    world.backend().with_state(|s| s.reject_changes = true);
}

#[when(expr = "I list page {int}")]
async fn list_page(world: &mut PulseboardWorld, page: usize) {
    let mut out = Vec::new();
    let result = commands::run_rows(world.dashboard(), page, &mut out).await;
    world.finish(out, result);
}

#[when(expr = "I set {string} to {string} on row {int}")]
async fn edit_row(world: &mut PulseboardWorld, column: String, value: String, index: usize) {
    let mut out = Vec::new();
    let result =
        commands::run_edit(world.dashboard(), index, &[(column, value)], &mut out).await;
    world.finish(out, result);
}

#[when(expr = "I delete row {int} and confirm")]
async fn delete_confirmed(world: &mut PulseboardWorld, index: usize) {
    let mut out = Vec::new();
    let result =
        commands::run_delete(world.dashboard(), index, Box::new(Answer(true)), &mut out).await;
    world.finish(out, result);
}

#[when(expr = "I delete row {int} and decline")]
async fn delete_declined(world: &mut PulseboardWorld, index: usize) {
    let mut out = Vec::new();
    let result =
        commands::run_delete(world.dashboard(), index, Box::new(Answer(false)), &mut out).await;
    world.finish(out, result);
}

#[when("I restore the backup")]
async fn restore_backup(world: &mut PulseboardWorld) {
    let mut out = Vec::new();
    let result = commands::run_restore(world.dashboard(), &mut out).await;
    world.finish(out, result);
}

#[then(expr = "the output lists rows {int} to {int}")]
fn output_lists_rows(world: &mut PulseboardWorld, first: usize, last: usize) {
    let listed: Vec<usize> = world
        .output
        .lines()
        .skip(1)
        .filter_map(|line| line.split('\t').next()?.parse().ok())
        .collect();
    assert_eq!(listed, (first..=last).collect::<Vec<_>>(), "{}", world.output);
}

#[then("the output shows the column headers")]
fn output_headers(world: &mut PulseboardWorld) {
    let header = world.output.lines().next().unwrap_or_default();
    assert_eq!(header, "#\tid\tname\tscore");
}

#[then("the output offers a next page")]
fn offers_next(world: &mut PulseboardWorld) {
    assert!(world.output.contains("(next: --page"), "{}", world.output);
}

#[then("the output offers no next page")]
fn offers_no_next(world: &mut PulseboardWorld) {
    assert!(!world.output.contains("(next: --page"), "{}", world.output);
}

#[then(expr = "backend row {int} has {string} equal to {string}")]
fn backend_row_field(world: &mut PulseboardWorld, index: usize, column: String, value: String) {
    let row = world.backend().with_state(|s| s.rows[index].clone());
    assert_eq!(row[column.as_str()], serde_json::Value::String(value));
}

#[then(expr = "backend row {int} still has {string} as a number")]
fn backend_row_number(world: &mut PulseboardWorld, index: usize, column: String) {
    let row = world.backend().with_state(|s| s.rows[index].clone());
    assert!(row[column.as_str()].is_number(), "{:?}", row);
}

#[then(expr = "the backend table now has {int} rows")]
fn backend_row_count(world: &mut PulseboardWorld, count: usize) {
    let len = world.backend().with_state(|s| s.rows.len());
    assert_eq!(len, count);
}

#[then(expr = "backend row {int} is the former row {int}")]
fn backend_row_shifted(world: &mut PulseboardWorld, index: usize, former: usize) {
    let name = world.backend().with_state(|s| s.rows[index]["name"].clone());
    assert_eq!(name, serde_json::Value::String(format!("row-{}", former)));
}

#[then(expr = "the backend received {string}")]
fn backend_received(world: &mut PulseboardWorld, request: String) {
    let requests = world.backend().with_state(|s| s.requests.clone());
    assert!(requests.contains(&request), "{:?}", requests);
}

#[then(expr = "the backend received no {string} request")]
fn backend_received_no(world: &mut PulseboardWorld, method: String) {
    let requests = world.backend().with_state(|s| s.requests.clone());
    assert!(
        !requests.iter().any(|r| r.starts_with(&method)),
        "{:?}",
        requests
    );
}

#[then(expr = "the table was fetched again after {string}")]
fn refetched_after(world: &mut PulseboardWorld, request: String) {
    let requests = world.backend().with_state(|s| s.requests.clone());
    let position = requests
        .iter()
        .position(|r| *r == request)
        .unwrap_or_else(|| panic!("{} not sent: {:?}", request, requests));
    assert!(
        requests[position + 1..].iter().any(|r| r == "GET /csv"),
        "{:?}",
        requests
    );
}

#[then(expr = "the table was not fetched again after {string}")]
fn not_refetched_after(world: &mut PulseboardWorld, request: String) {
    let requests = world.backend().with_state(|s| s.requests.clone());
    let position = requests
        .iter()
        .position(|r| *r == request)
        .unwrap_or_else(|| panic!("{} not sent: {:?}", request, requests));
    assert!(
        !requests[position + 1..].iter().any(|r| r == "GET /csv"),
        "{:?}",
        requests
    );
}
