//! In-process stand-in for the dashboard backend

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct BackendState {
    /// username -> (password, token)
    pub users: HashMap<String, (String, String)>,
    pub rows: Vec<Value>,
    pub backup: Vec<Value>,
    pub reject_changes: bool,
    /// `METHOD /path` of every request, in arrival order
    pub requests: Vec<String>,
    pub feed_samples: usize,
    pub feed_malformed: usize,
    /// Stream samples until the client hangs up instead of closing first
    pub feed_endless: bool,
    pub feed_closed_by_client: bool,
}

impl BackendState {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match bearer {
            Some(token) => self.users.values().any(|(_, t)| t == token),
            None => false,
        }
    }
}

type Shared = Arc<Mutex<BackendState>>;

#[derive(Debug)]
pub struct StubBackend {
    pub state: Shared,
    pub addr: SocketAddr,
    server: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));
        let router = Router::new()
            .route("/login", post(login))
            .route("/csv", get(list_rows))
            .route("/csv/{index}", put(update_row).delete(delete_row))
            .route("/restore", post(restore))
            .route("/ws/random-numbers", get(feed))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            state,
            addr,
            server,
        }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut BackendState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn sample_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"id": i, "name": format!("row-{}", i), "score": i * 10}))
        .collect()
}

fn record(state: &Shared, line: String) -> std::sync::MutexGuard<'_, BackendState> {
    let mut s = state.lock().unwrap();
    s.requests.push(line);
    s
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Query(creds): Query<Credentials>) -> Response {
    let s = record(&state, "POST /login".to_string());
    match s.users.get(&creds.username) {
        Some((password, token)) if *password == creds.password => {
            Json(json!({ "token": token })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        )
            .into_response(),
    }
}

async fn list_rows(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = record(&state, "GET /csv".to_string());
    if !s.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(s.rows.clone()).into_response()
}

async fn update_row(
    State(state): State<Shared>,
    Path(index): Path<usize>,
    headers: HeaderMap,
    Json(row): Json<Value>,
) -> Response {
    let mut s = record(&state, format!("PUT /csv/{}", index));
    if !s.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if s.reject_changes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match s.rows.get_mut(index) {
        Some(slot) => {
            *slot = row;
            Json(json!({"message": "Row updated successfully"})).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_row(
    State(state): State<Shared>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Response {
    let mut s = record(&state, format!("DELETE /csv/{}", index));
    if !s.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if s.reject_changes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if index >= s.rows.len() {
        return StatusCode::NOT_FOUND.into_response();
    }
    s.rows.remove(index);
    Json(json!({"message": "Row deleted successfully"})).into_response()
}

async fn restore(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = record(&state, "POST /restore".to_string());
    if !s.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if s.reject_changes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    s.rows = s.backup.clone();
    Json(json!({"message": "Backup restored successfully"})).into_response()
}

async fn feed(ws: WebSocketUpgrade, State(state): State<Shared>) -> Response {
    let (samples, malformed, endless) = {
        let s = record(&state, "GET /ws/random-numbers".to_string());
        (s.feed_samples, s.feed_malformed, s.feed_endless)
    };
    if endless {
        ws.on_upgrade(move |socket| stream_until_closed(socket, state))
    } else {
        ws.on_upgrade(move |socket| push_samples(socket, samples, malformed))
    }
}

async fn stream_until_closed(mut socket: WebSocket, state: Shared) {
    let mut tick = tokio::time::interval(std::time::Duration::from_millis(5));
    let mut next = 0u64;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let text = json!({"timestamp": next, "value": next as f64 / 10.0}).to_string();
                next += 1;
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    state.lock().unwrap().feed_closed_by_client = true;
}

async fn push_samples(mut socket: WebSocket, samples: usize, malformed: usize) {
    for _ in 0..malformed {
        if socket.send(Message::Text("not json".into())).await.is_err() {
            return;
        }
    }
    for i in 0..samples {
        let text = json!({"timestamp": i, "value": i as f64 / 10.0}).to_string();
        if socket.send(Message::Text(text.into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}
