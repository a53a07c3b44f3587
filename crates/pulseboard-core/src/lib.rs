//! Pulseboard core
//!
//! Session, login, live feed, and table state shared by the native client
//! and the browser dashboard. Nothing in here touches the network directly;
//! transports are injected through [`io::HttpClient`].

pub mod api;
pub mod auth;
pub mod error;
pub mod feed;
pub mod io;
pub mod panel;
pub mod router;
pub mod session;
pub mod table;

pub use api::{ApiClient, Endpoints};
pub use auth::AuthGate;
pub use error::{DashboardError, Result};
pub use feed::{LiveFeed, RollingBuffer, Sample};
pub use panel::{Confirm, TablePanel};
pub use router::Route;
pub use session::{SessionStore, TokenStorage};
pub use table::{Mutation, Row, TableState};
