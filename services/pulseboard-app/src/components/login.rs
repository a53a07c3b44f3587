//! Login form component

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use pulseboard_core::{ApiClient, AuthGate};

/// Username and password form; on success moves to the dashboard
#[component]
pub fn LoginPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let api = api.clone();
        let navigate = navigate.clone();
        let mut gate = AuthGate::with_credentials(&username.get_untracked(), &password.get_untracked());
        leptos::task::spawn_local(async move {
            let next = gate.submit(&api).await;
            error.set(gate.error().to_string());
            if let Some(route) = next {
                navigate(route.path(), Default::default());
            }
        });
    };

    view! {
        <section style="max-width: 320px; margin: 4rem auto;">
            <h2>"Login"</h2>
            <form on:submit=on_submit style="display: flex; flex-direction: column; gap: 0.5rem;">
                <input type="text" placeholder="Username" bind:value=username />
                <input type="password" placeholder="Password" bind:value=password />
                <button type="submit">"Login"</button>
            </form>
            <Show when=move || error.with(|e| !e.is_empty())>
                <p style="color: #dc3545;">{move || error.get()}</p>
            </Show>
        </section>
    }
}
