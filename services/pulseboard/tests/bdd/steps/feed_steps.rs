//! BDD step definitions for the live feed

use std::time::Duration;

use cucumber::{given, then, when};
use pulseboard::commands;
use pulseboard::feed::FeedSubscription;

use crate::world::PulseboardWorld;

#[given(expr = "the feed will send {int} samples")]
fn feed_samples(world: &mut PulseboardWorld, count: usize) {
    world.backend().with_state(|s| s.feed_samples = count);
}

#[given(expr = "the feed will send {int} samples after {int} malformed message(s)")]
fn feed_with_garbage(world: &mut PulseboardWorld, count: usize, malformed: usize) {
    world.backend().with_state(|s| {
        s.feed_samples = count;
        s.feed_malformed = malformed;
    });
}

#[given("the feed streams without end")]
fn feed_endless(world: &mut PulseboardWorld) {
    world.backend().with_state(|s| s.feed_endless = true);
}

async fn mount_and_wait(world: &mut PulseboardWorld, count: usize) -> FeedSubscription {
    let mut subscription = world
        .dashboard()
        .feed_client()
        .mount()
        .await
        .expect("mount failed");
    let mut samples = subscription.subscribe();
    tokio::time::timeout(Duration::from_secs(10), async {
        for _ in 0..count {
            samples.recv().await.expect("feed ended early");
        }
    })
    .await
    .expect("samples did not arrive");
    subscription
}

#[when(expr = "I mount the feed and unmount it after {int} samples")]
async fn mount_then_unmount(world: &mut PulseboardWorld, count: usize) {
    let subscription = mount_and_wait(world, count).await;
    tokio::time::timeout(Duration::from_secs(5), subscription.unmount())
        .await
        .expect("unmount hung");
}

#[when(expr = "I mount the feed and drop it after {int} samples")]
async fn mount_then_drop(world: &mut PulseboardWorld, count: usize) {
    let subscription = mount_and_wait(world, count).await;
    drop(subscription);
}

#[then("the backend sees the feed socket closed")]
async fn backend_sees_close(world: &mut PulseboardWorld) {
    let backend = world.backend();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !backend.with_state(|s| s.feed_closed_by_client) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("backend never saw the feed close");
}

#[when("I watch the feed until the server closes it")]
async fn watch_feed(world: &mut PulseboardWorld) {
    let subscription = world
        .dashboard()
        .feed_client()
        .mount()
        .await
        .expect("mount failed");

    tokio::time::timeout(Duration::from_secs(10), async {
        while !subscription.is_closed() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("feed did not close");

    let feed = subscription.feed();
    subscription.unmount().await;
    world.feed = Some(feed.read().await.clone());
}

#[when(expr = "I follow the feed for {int} samples")]
async fn follow_feed(world: &mut PulseboardWorld, limit: usize) {
    let mut out = Vec::new();
    let result = commands::run_feed(world.dashboard(), Some(limit), &mut out).await;
    world.finish(out, result);
}

#[then(expr = "the window holds {int} samples")]
fn window_holds(world: &mut PulseboardWorld, count: usize) {
    let feed = world.feed.as_ref().expect("feed not watched");
    assert_eq!(feed.len(), count);
}

#[then(expr = "the oldest sample in the window is number {int}")]
fn oldest_sample(world: &mut PulseboardWorld, number: i64) {
    let feed = world.feed.as_ref().expect("feed not watched");
    assert_eq!(feed.samples().next().map(|s| s.timestamp), Some(number));
}

#[then(expr = "the newest sample in the window is number {int}")]
fn newest_sample(world: &mut PulseboardWorld, number: i64) {
    let feed = world.feed.as_ref().expect("feed not watched");
    assert_eq!(feed.latest().map(|s| s.timestamp), Some(number));
}

#[then(expr = "{int} message(s) was/were dropped")]
fn dropped(world: &mut PulseboardWorld, count: u64) {
    let feed = world.feed.as_ref().expect("feed not watched");
    assert_eq!(feed.dropped(), count);
}

#[then(expr = "the output has {int} sample lines")]
fn sample_lines(world: &mut PulseboardWorld, count: usize) {
    let lines = world
        .output
        .lines()
        .filter(|l| l.split('\t').count() == 2)
        .count();
    assert_eq!(lines, count, "{}", world.output);
}
