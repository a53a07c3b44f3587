//! BDD step definitions for login, logout, and the route guard

use cucumber::{given, then, when};
use pulseboard::commands;
use pulseboard::storage::FileTokenStorage;
use pulseboard::PulseboardError;
use pulseboard_core::TokenStorage;

use crate::backend::StubBackend;
use crate::world::PulseboardWorld;

#[given(expr = "a backend that accepts user {string} with password {string} and issues token {string}")]
async fn backend_with_user(
    world: &mut PulseboardWorld,
    username: String,
    password: String,
    token: String,
) {
    let backend = StubBackend::start().await;
    backend.with_state(|s| s.users.insert(username, (password, token)));
    world.backend = Some(backend);
}

#[given("no saved session")]
fn no_saved_session(world: &mut PulseboardWorld) {
    let path = world.token_file();
    assert!(!path.exists());
}

#[given(expr = "a saved token {string}")]
fn saved_token(world: &mut PulseboardWorld, token: String) {
    let path = world.token_file();
    std::fs::write(path, token).unwrap();
}

#[given(expr = "I am logged in as {string} with password {string}")]
async fn logged_in(world: &mut PulseboardWorld, username: String, password: String) {
    let mut out = Vec::new();
    commands::run_login(world.dashboard(), &username, &password, &mut out)
        .await
        .expect("login failed");
}

#[when(expr = "I log in as {string} with password {string}")]
async fn log_in(world: &mut PulseboardWorld, username: String, password: String) {
    let mut out = Vec::new();
    let result = commands::run_login(world.dashboard(), &username, &password, &mut out).await;
    world.finish(out, result);
}

#[when("I log out")]
fn log_out(world: &mut PulseboardWorld) {
    let mut out = Vec::new();
    let result = commands::run_logout(world.dashboard(), &mut out);
    world.finish(out, result);
}

#[then("the command succeeds")]
fn command_succeeds(world: &mut PulseboardWorld) {
    match world.result.as_ref().expect("no command ran") {
        Ok(()) => {}
        Err(e) => panic!("command failed: {}", e),
    }
}

#[then(expr = "the command fails with {string}")]
fn command_fails_with(world: &mut PulseboardWorld, message: String) {
    match world.result.as_ref().expect("no command ran") {
        Err(PulseboardError::Rejected(actual)) => assert_eq!(actual, &message),
        other => panic!("expected rejection '{}', got {:?}", message, other),
    }
}

#[then("the command fails because I am not logged in")]
fn command_needs_login(world: &mut PulseboardWorld) {
    assert!(matches!(
        world.result.as_ref().expect("no command ran"),
        Err(PulseboardError::NotLoggedIn)
    ));
}

#[then(expr = "the saved token is {string}")]
fn saved_token_is(world: &mut PulseboardWorld, token: String) {
    let storage = FileTokenStorage::new(world.token_file());
    assert_eq!(storage.load(), Some(token));
}

#[then("no token is saved")]
fn no_token_saved(world: &mut PulseboardWorld) {
    let storage = FileTokenStorage::new(world.token_file());
    assert_eq!(storage.load(), None);
    assert!(!world.dashboard().session().is_authenticated());
}

#[then(expr = "the output says {string}")]
fn output_says(world: &mut PulseboardWorld, text: String) {
    assert!(
        world.output.contains(&text),
        "output was:\n{}",
        world.output
    );
}

#[then(expr = "the backend received {int} request(s)")]
fn request_count(world: &mut PulseboardWorld, count: usize) {
    let requests = world.backend().with_state(|s| s.requests.clone());
    assert_eq!(requests.len(), count, "{:?}", requests);
}
