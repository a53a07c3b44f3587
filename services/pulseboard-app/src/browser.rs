//! Browser bindings: HTTP, `localStorage`, confirm dialogs, and the feed socket
//!
//! Without the `csr` feature (or off wasm32) the same names resolve to inert
//! stand-ins so the components still build and test natively.

use pulseboard_core::Endpoints;

/// Backend base URL baked in at build time
const API_URL: Option<&str> = option_env!("PULSEBOARD_API_URL");
/// Feed base URL baked in at build time
const WS_URL: Option<&str> = option_env!("PULSEBOARD_WS_URL");

/// Backend endpoints, defaulting to the origin the page was served from
pub fn endpoints() -> Endpoints {
    let origin = imp::page_origin();
    let api_url = API_URL.map(str::to_string).unwrap_or_else(|| origin.clone());
    let ws_url = WS_URL
        .map(str::to_string)
        .unwrap_or_else(|| socket_origin(&origin));
    Endpoints::new(&api_url, &ws_url)
}

/// `http(s)://host` -> `ws(s)://host`
pub fn socket_origin(origin: &str) -> String {
    if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        origin.to_string()
    }
}

pub use imp::{confirm, mount_feed, BrowserStorage, GlooHttpClient};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
mod imp {
    use async_trait::async_trait;
    use futures::future::Either;
    use futures::StreamExt;
    use gloo_net::http::Request;
    use gloo_net::websocket::futures::WebSocket;
    use gloo_net::websocket::Message;
    use leptos::prelude::*;
    use pulseboard_core::io::{HttpClient, HttpRequest, HttpResponse, Method};
    use pulseboard_core::session::TOKEN_KEY;
    use pulseboard_core::{DashboardError, LiveFeed, TokenStorage};

    pub fn page_origin() -> String {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }

    /// HTTP client over the browser's `fetch`
    #[derive(Debug, Default, Clone, Copy)]
    pub struct GlooHttpClient;

    #[async_trait(?Send)]
    impl HttpClient for GlooHttpClient {
        async fn send(&self, request: HttpRequest) -> pulseboard_core::Result<HttpResponse> {
            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            if !request.query.is_empty() {
                builder = builder.query(
                    request
                        .query
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str())),
                );
            }
            if let Some(token) = &request.bearer {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }

            let failed =
                |e: gloo_net::Error| DashboardError::Http(format!("{} {}: {}", request.method, request.url, e));
            let response = match request.json_body {
                Some(body) => {
                    builder
                        .header("Content-Type", "application/json")
                        .body(body)
                        .map_err(failed)?
                        .send()
                        .await
                }
                None => builder.send().await,
            }
            .map_err(failed)?;

            let status = response.status();
            let body = response.text().await.map_err(failed)?;
            Ok(HttpResponse { status, body })
        }
    }

    /// Token kept in `localStorage`
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    impl BrowserStorage {
        fn storage() -> pulseboard_core::Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| DashboardError::Storage("localStorage unavailable".to_string()))
        }
    }

    impl TokenStorage for BrowserStorage {
        fn load(&self) -> Option<String> {
            Self::storage().ok()?.get_item(TOKEN_KEY).ok().flatten()
        }

        fn store(&self, token: &str) -> pulseboard_core::Result<()> {
            Self::storage()?
                .set_item(TOKEN_KEY, token)
                .map_err(|e| DashboardError::Storage(format!("{:?}", e)))
        }

        fn clear(&self) -> pulseboard_core::Result<()> {
            Self::storage()?
                .remove_item(TOKEN_KEY)
                .map_err(|e| DashboardError::Storage(format!("{:?}", e)))
        }
    }

    /// Native `window.confirm`; a missing window declines
    pub fn confirm(prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }

    /// Open the feed socket for the lifetime of the current owner.
    ///
    /// Samples go into `feed`; the socket is closed when the owner is
    /// cleaned up or the server ends the stream.
    pub fn mount_feed(url: String, feed: RwSignal<LiveFeed>) {
        let (stop_tx, mut stop_rx) = futures::channel::oneshot::channel::<()>();
        on_cleanup(move || {
            let _ = stop_tx.send(());
        });

        leptos::task::spawn_local(async move {
            let mut ws = match WebSocket::open(&url) {
                Ok(ws) => ws,
                Err(e) => {
                    leptos::logging::warn!("Opening feed {}: {}", url, e);
                    return;
                }
            };

            loop {
                match futures::future::select(&mut stop_rx, ws.next()).await {
                    Either::Left(_) => break,
                    Either::Right((Some(Ok(Message::Text(text))), _)) => {
                        if feed.try_update(|f| f.ingest_text(&text)).is_none() {
                            break;
                        }
                    }
                    Either::Right((Some(Ok(Message::Bytes(_))), _)) => {}
                    Either::Right((Some(Err(e)), _)) => {
                        leptos::logging::warn!("Feed error: {}", e);
                        break;
                    }
                    Either::Right((None, _)) => break,
                }
            }

            if let Err(e) = ws.close(None, None) {
                leptos::logging::warn!("Closing feed: {:?}", e);
            }
        });
    }
}

#[cfg(not(all(feature = "csr", target_arch = "wasm32")))]
mod imp {
    use async_trait::async_trait;
    use leptos::prelude::*;
    use pulseboard_core::io::{HttpClient, HttpRequest, HttpResponse};
    use pulseboard_core::session::MemoryTokenStorage;
    use pulseboard_core::{DashboardError, LiveFeed, TokenStorage};

    pub fn page_origin() -> String {
        "http://localhost:8000".to_string()
    }

    /// Refuses every request outside the browser
    #[derive(Debug, Default, Clone, Copy)]
    pub struct GlooHttpClient;

    #[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
    #[cfg_attr(not(target_arch = "wasm32"), async_trait)]
    impl HttpClient for GlooHttpClient {
        async fn send(&self, request: HttpRequest) -> pulseboard_core::Result<HttpResponse> {
            Err(DashboardError::Http(format!(
                "{} {}: no browser",
                request.method, request.url
            )))
        }
    }

    /// Process-local token storage outside the browser
    #[derive(Debug, Default)]
    pub struct BrowserStorage(MemoryTokenStorage);

    impl TokenStorage for BrowserStorage {
        fn load(&self) -> Option<String> {
            self.0.load()
        }

        fn store(&self, token: &str) -> pulseboard_core::Result<()> {
            self.0.store(token)
        }

        fn clear(&self) -> pulseboard_core::Result<()> {
            self.0.clear()
        }
    }

    pub fn confirm(_prompt: &str) -> bool {
        false
    }

    pub fn mount_feed(_url: String, _feed: RwSignal<LiveFeed>) {}
}
