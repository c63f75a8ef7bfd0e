//! Counters and legend shown around the graph.

use leptos::prelude::*;

use super::force_graph::{GraphStats, NodeKind, Theme};

/// Totals reported by the backend. Renders nothing when absent.
#[component]
pub fn StatsBar(#[prop(into)] stats: Signal<Option<GraphStats>>) -> impl IntoView {
	move || {
		stats.get().map(|s| {
			view! {
				<div class="graph-stats">
					<span class="stat">"IPs: " <strong>{s.total_ips}</strong></span>
					<span class="stat">"Devices: " <strong>{s.total_devices}</strong></span>
					<span class="stat">"Documents: " <strong>{s.total_docs}</strong></span>
					<span class="stat">"Fraud cases: " <strong>{s.total_fraud_cases}</strong></span>
				</div>
			}
		})
	}
}

/// Swatch per node kind in the colors of `theme`.
#[component]
pub fn Legend(#[prop(optional)] theme: Option<Theme>) -> impl IntoView {
	let theme = theme.unwrap_or_default();
	let entries = NodeKind::ALL
		.iter()
		.map(|&kind| {
			let swatch = format!(
				"display: inline-block; width: 10px; height: 10px; border-radius: 50%; \
				 margin-right: 4px; background: {};",
				theme.palette.get(kind).to_css()
			);
			view! {
				<span class="legend-entry">
					<span class="legend-swatch" style=swatch></span>
					{kind.display_name()}
				</span>
			}
		})
		.collect_view();

	view! { <div class="graph-legend">{entries}</div> }
}
