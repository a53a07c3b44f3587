//! Dashboard page: live chart, data table, and logout

use crate::components::data_table::DataTable;
use crate::components::live_chart::LiveChart;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use pulseboard_core::router::Route;
use pulseboard_core::ApiClient;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let navigate = use_navigate();

    let logout = move |_: leptos::ev::MouseEvent| {
        api.session().logout();
        navigate(Route::Login.path(), Default::default());
    };

    view! {
        <header style="display: flex; justify-content: space-between; align-items: center;">
            <h1>"Pulseboard"</h1>
            <button on:click=logout>"Logout"</button>
        </header>
        <LiveChart />
        <DataTable />
    }
}
