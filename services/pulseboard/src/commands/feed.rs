//! `feed`: follow the live feed in the terminal

use std::io::Write;

use tokio::sync::broadcast::error::RecvError;

use crate::error::Result;
use crate::Dashboard;

/// Print samples as they arrive until `limit` is reached, the server closes
/// the socket, or Ctrl+C is pressed
pub async fn run_feed(
    dashboard: &Dashboard,
    limit: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    dashboard.require_session()?;

    let mut subscription = dashboard.feed_client().mount().await?;
    let mut samples = subscription.subscribe();
    let mut printed = 0usize;

    loop {
        if limit.is_some_and(|n| printed >= n) {
            break;
        }
        tokio::select! {
            sample = samples.recv() => match sample {
                Ok(sample) => {
                    writeln!(out, "{}\t{}", sample.time_of_day(), sample.value)?;
                    printed += 1;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Output fell behind, skipped {} samples", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    let feed = subscription.feed();
    subscription.unmount().await;

    let feed = feed.read().await;
    writeln!(
        out,
        "{} samples received, {} in window, {} dropped",
        feed.received(),
        feed.len(),
        feed.dropped()
    )?;
    Ok(())
}
