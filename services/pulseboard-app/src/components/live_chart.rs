//! Live line chart of the feed

use crate::browser;
use leptos::prelude::*;
use pulseboard_core::feed::ChartSeries;
use pulseboard_core::{ApiClient, LiveFeed};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 300.0;

/// Opens the feed while mounted and draws the rolling window as an SVG line
#[component]
pub fn LiveChart() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let feed = RwSignal::new(LiveFeed::new());
    browser::mount_feed(api.endpoints().feed(), feed);

    let series = Memo::new(move |_| feed.with(LiveFeed::series));

    view! {
        <section>
            <h2>"Live Data"</h2>
            <svg
                viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)
                style="width: 100%; border: 1px solid #dee2e6;"
            >
                <polyline
                    fill="none"
                    stroke="rgb(75, 192, 192)"
                    stroke-width="2"
                    points=move || series.with(|s| polyline_points(s, WIDTH, HEIGHT))
                />
            </svg>
            <p style="display: flex; justify-content: space-between; color: #6c757d;">
                <span>{move || series.with(|s| s.points.first().map(|p| p.label.clone()))}</span>
                <span>{move || series.with(|s| s.label)}</span>
                <span>{move || series.with(|s| s.points.last().map(|p| p.label.clone()))}</span>
            </p>
        </section>
    }
}

/// SVG `points` for the series, oldest on the left
pub fn polyline_points(series: &ChartSeries, width: f64, height: f64) -> String {
    let (lo, hi) = series.y_range();
    let step = match series.points.len() {
        0 | 1 => 0.0,
        n => width / (n - 1) as f64,
    };
    series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 * step;
            let y = height - (p.value - lo) / (hi - lo) * height;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
