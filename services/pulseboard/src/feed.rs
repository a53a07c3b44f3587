//! WebSocket connection to the live feed
//!
//! A mounted feed owns one socket. Samples are decoded into a shared
//! [`LiveFeed`] and re-broadcast to any number of listeners. Unmounting, or
//! dropping the subscription, closes the socket.

use std::sync::Arc;

use futures::StreamExt;
use pulseboard_core::{LiveFeed, Sample};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::error::{PulseboardError, Result};

/// Shared handle to the rolling sample window
pub type FeedHandle = Arc<RwLock<LiveFeed>>;

const BROADCAST_CAPACITY: usize = 256;

/// Opens feed connections against one URL
#[derive(Debug, Clone)]
pub struct FeedClient {
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect and start receiving samples
    pub async fn mount(&self) -> Result<FeedSubscription> {
        tracing::info!("Connecting to feed at {}", self.url);
        let (ws, _response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| PulseboardError::Feed(format!("Connecting to {}: {}", self.url, e)))?;
        tracing::debug!("Feed connected");

        let feed: FeedHandle = Arc::new(RwLock::new(LiveFeed::new()));
        let (tx, rx) = broadcast::channel(BROADCAST_CAPACITY);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(receive_loop(ws, Arc::clone(&feed), tx, cancel.clone()));

        Ok(FeedSubscription {
            feed,
            samples: rx,
            cancel,
            task: Some(task),
        })
    }
}

/// A live feed connection; closing it is tied to its lifetime
pub struct FeedSubscription {
    feed: FeedHandle,
    samples: broadcast::Receiver<Sample>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FeedSubscription {
    pub fn feed(&self) -> FeedHandle {
        Arc::clone(&self.feed)
    }

    /// Receive each accepted sample. The channel closes when the socket does.
    ///
    /// The first receiver handed out also sees samples that arrived before
    /// the call; later ones start from the next sample.
    pub fn subscribe(&mut self) -> broadcast::Receiver<Sample> {
        let fresh = self.samples.resubscribe();
        std::mem::replace(&mut self.samples, fresh)
    }

    pub fn is_closed(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Close the socket and wait for the receiver to stop
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Feed task ended abnormally: {}", e);
            }
        }
        tracing::debug!("Feed unmounted");
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn receive_loop<S>(
    mut ws: tokio_tungstenite::WebSocketStream<S>,
    feed: FeedHandle,
    samples: broadcast::Sender<Sample>,
    cancel: CancellationToken,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Feed cancelled");
                break;
            }
            msg = ws.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let accepted = feed.write().await.ingest_text(text.as_str());
                    if let Some(sample) = accepted {
                        // No listeners is fine
                        let _ = samples.send(sample);
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Feed closed by server: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("Feed error: {}", e);
                    break;
                }
                None => {
                    tracing::info!("Feed stream ended");
                    break;
                }
            }
        }
    }

    if let Err(e) = ws.close(None).await {
        tracing::debug!("Closing feed socket: {}", e);
    }
}
