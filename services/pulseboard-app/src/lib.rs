//! Pulseboard Dashboard - Leptos frontend
//!
//! Login form, live chart, and editable table for the dashboard backend.

pub mod app;
pub mod browser;
pub mod components;

pub use app::App;

/// Entry point for the WASM client
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    leptos::mount::mount_to_body(App);
}
