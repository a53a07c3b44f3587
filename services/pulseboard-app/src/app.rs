//! Main App component

use std::sync::Arc;

use crate::browser::{self, BrowserStorage, GlooHttpClient};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use leptos::prelude::*;
use leptos_router::components::{ProtectedRoute, Redirect, Route, Router, Routes};
use leptos_router::path;
use pulseboard_core::router::Route as View;
use pulseboard_core::{ApiClient, SessionStore};

/// Reactive copy of the session token, kept in step with the [`SessionStore`]
#[derive(Debug, Clone, Copy)]
pub struct AuthToken(pub RwSignal<Option<String>>);

impl AuthToken {
    pub fn is_present(&self) -> bool {
        self.0.with(Option::is_some)
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let session = Arc::new(SessionStore::new(Box::new(BrowserStorage::default())));
    let token = AuthToken(RwSignal::new(session.token()));
    session.subscribe(move |t| {
        let _ = token.0.try_set(t.map(str::to_string));
    });

    provide_context(ApiClient::new(
        Arc::new(GlooHttpClient),
        browser::endpoints(),
        session,
    ));
    provide_context(token);

    view! {
        <main style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
            <Router>
                <Routes fallback=|| view! { <p>"Page not found."</p> }>
                    <Route path=path!("/login") view=LoginPage />
                    <ProtectedRoute
                        path=path!("/dashboard")
                        condition=move || Some(token.is_present())
                        redirect_path=|| View::Login.path()
                        view=DashboardPage
                    />
                    <Route
                        path=path!("/")
                        view=|| view! { <Redirect path=View::Dashboard.path() /> }
                    />
                </Routes>
            </Router>
        </main>
    }
}
