//! Session context holding the bearer token
//!
//! The store is created once at startup and shared as an `Arc<SessionStore>`
//! with every component that authorizes requests.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Fixed key under which the token is persisted
pub const TOKEN_KEY: &str = "token";

/// Persistence backend for the session token
#[cfg_attr(test, mockall::automock)]
pub trait TokenStorage: Send + Sync {
    /// Load a previously persisted token, if any
    fn load(&self) -> Option<String>;

    /// Persist the token, replacing any previous value
    fn store(&self, token: &str) -> crate::Result<()>;

    /// Remove the persisted token
    fn clear(&self) -> crate::Result<()>;
}

/// Token storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, token: &str) -> crate::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

type Subscriber = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Holds the authentication token and notifies subscribers when it changes
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    token: RwLock<Option<String>>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// Create a store, restoring a token persisted by an earlier run
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let token = storage.load();
        tracing::debug!("Session restored, token present: {}", token.is_some());
        Self {
            storage,
            token: RwLock::new(token),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Current token, if logged in
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Store a new token and notify subscribers
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.store(token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        tracing::info!("Session token updated");
        self.notify(Some(token));
    }

    /// Forget the token and notify subscribers
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear persisted session token: {}", e);
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::info!("Logged out");
        self.notify(None);
    }

    /// Register a callback invoked with the new token after every change
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(subscriber));
    }

    /// Subscribers run outside the lock, so they may call back into the store
    fn notify(&self, token: Option<&str>) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in subscribers {
            subscriber(token);
        }
    }
}
