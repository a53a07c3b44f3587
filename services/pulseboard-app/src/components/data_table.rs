//! Paginated, editable data table
//!
//! The table state is a plain [`TableState`] inside a signal. Each change is
//! prepared against the state, sent, settled, and followed by a reload when
//! the backend accepted it.

use crate::browser;
use leptos::prelude::*;
use pulseboard_core::table::messages;
use pulseboard_core::{ApiClient, Mutation, Row, TableState};

/// One rendered row of the current page
#[derive(Debug, Clone, PartialEq)]
struct PageRow {
    index: usize,
    cells: Vec<String>,
    editing: bool,
    busy: bool,
}

fn page_view(state: &TableState) -> (Vec<String>, Vec<PageRow>) {
    let columns = state.columns();
    let rows = state
        .page_rows()
        .map(|(index, row)| {
            let source: &Row = if state.is_editing(index) {
                state.edit_buffer()
            } else {
                row
            };
            PageRow {
                index,
                cells: columns
                    .iter()
                    .map(|c| source.get(c).unwrap_or_default())
                    .collect(),
                editing: state.is_editing(index),
                busy: state.is_in_flight(index),
            }
        })
        .collect();
    (columns, rows)
}

async fn reload(api: &ApiClient, table: RwSignal<TableState>) {
    match api.fetch_rows().await {
        Ok(rows) => {
            table.try_update(|t| t.apply_snapshot(rows));
        }
        Err(e) => {
            leptos::logging::warn!("Fetching rows failed: {}", e);
            table.try_update(TableState::fail_refresh);
        }
    }
}

/// Send a prepared change and reload if it went through
fn launch(api: ApiClient, table: RwSignal<TableState>, mutation: Mutation) {
    leptos::task::spawn_local(async move {
        let outcome = api.execute(&mutation).await;
        let stale = table
            .try_update(|t| t.settle(&mutation, &outcome))
            .unwrap_or(false);
        if stale {
            reload(&api, table).await;
        }
    });
}

#[component]
pub fn DataTable() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let table = RwSignal::new(TableState::new());

    {
        let api = api.clone();
        leptos::task::spawn_local(async move { reload(&api, table).await });
    }

    let page = Memo::new(move |_| table.with(page_view));

    let restore = {
        let api = api.clone();
        move |_: leptos::ev::MouseEvent| {
            if let Some(Ok(mutation)) = table.try_update(|t| t.prepare_restore()) {
                launch(api.clone(), table, mutation);
            }
        }
    };

    let render_row = move |row: PageRow, columns: Vec<String>| {
        let index = row.index;
        let save = {
            let api = api.clone();
            move |_: leptos::ev::MouseEvent| {
                if let Some(Ok(mutation)) = table.try_update(|t| t.prepare_save(index)) {
                    launch(api.clone(), table, mutation);
                }
            }
        };
        let remove = {
            let api = api.clone();
            move |_: leptos::ev::MouseEvent| {
                if !matches!(table.try_with_untracked(|t| t.check_row(index)), Some(Ok(()))) {
                    return;
                }
                let confirmed = browser::confirm(messages::DELETE_PROMPT);
                if let Some(Ok(Some(mutation))) =
                    table.try_update(|t| t.prepare_remove(index, confirmed))
                {
                    launch(api.clone(), table, mutation);
                }
            }
        };

        let cells = row
            .cells
            .into_iter()
            .zip(columns)
            .map(|(value, column)| {
                if row.editing {
                    view! {
                        <td style="padding: 0.5rem;">
                            <input
                                value=value
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    table.update(|t| {
                                        let _ = t.update_field(index, &column, value);
                                    });
                                }
                            />
                        </td>
                    }
                    .into_any()
                } else {
                    view! { <td style="padding: 0.5rem;">{value}</td> }.into_any()
                }
            })
            .collect::<Vec<_>>();

        let actions = if row.editing {
            view! {
                <button on:click=save disabled=row.busy>"Save"</button>
                <button on:click=move |_| table.update(TableState::cancel_edit)>"Cancel"</button>
            }
            .into_any()
        } else {
            view! {
                <button on:click=move |_| table.update(|t| { let _ = t.begin_edit(index); })>
                    "Edit"
                </button>
                <button on:click=remove disabled=row.busy>"Delete"</button>
            }
            .into_any()
        };

        view! {
            <tr style="border-bottom: 1px solid #dee2e6;">
                {cells}
                <td style="padding: 0.5rem;">{actions}</td>
            </tr>
        }
    };

    view! {
        <section>
            <h2>"Data"</h2>
            {move || {
                table.with(|t| t.error().map(str::to_string)).map(|message| {
                    view! {
                        <p style="color: #dc3545;">
                            {message}
                            " "
                            <button on:click=move |_| table.update(TableState::dismiss_error)>
                                "Dismiss"
                            </button>
                        </p>
                    }
                })
            }}
            {move || {
                let (columns, rows) = page.get();
                if columns.is_empty() {
                    view! { <p>"No rows."</p> }.into_any()
                } else {
                    let render_row = render_row.clone();
                    view! {
                        <table style="width: 100%; border-collapse: collapse;">
                            <thead>
                                <tr style="border-bottom: 2px solid #dee2e6;">
                                    {columns
                                        .iter()
                                        .map(|c| view! {
                                            <th style="padding: 0.5rem; text-align: left;">{c.clone()}</th>
                                        })
                                        .collect::<Vec<_>>()}
                                    <th style="padding: 0.5rem; text-align: left;">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows
                                    .into_iter()
                                    .map(|row| render_row(row, columns.clone()))
                                    .collect::<Vec<_>>()}
                            </tbody>
                        </table>
                    }
                    .into_any()
                }
            }}
            <nav style="display: flex; gap: 0.5rem; align-items: center; margin-top: 0.5rem;">
                <button
                    on:click=move |_| table.update(|t| { t.prev_page(); })
                    disabled=move || table.with(|t| !t.has_prev_page())
                >
                    "Previous"
                </button>
                <span>{move || format!("Page {}", table.with(TableState::page) + 1)}</span>
                <button
                    on:click=move |_| table.update(|t| { t.next_page(); })
                    disabled=move || table.with(|t| !t.has_next_page())
                >
                    "Next"
                </button>
                <button on:click=restore>"Restore Backup"</button>
            </nav>
        </section>
    }
}
