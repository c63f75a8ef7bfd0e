//! fraud-graph: Interactive correlation graph of artifacts shared by fraud cases.
//!
//! This crate provides a WASM-based visualization that links IP addresses,
//! devices, documents and behavior sequences seen across confirmed fraud
//! cases, with a physics-based layout, node dragging, pan/zoom and tooltips.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

use components::force_graph::Theme;
use components::summary::{Legend, StatsBar};

pub use components::force_graph::{
	FraudGraph, GraphConfig, GraphData, GraphLink, GraphNode, GraphStats, GraphView,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("fraud-graph: logging initialized");
}

/// Parse the JSON body of the `<script id=...>` element, if present.
fn load_json_script<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("fraud-graph: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...], stats?: {...} }
fn load_graph_data() -> Option<GraphData> {
	let data: GraphData = load_json_script("graph-data")?;
	info!(
		"fraud-graph: read {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Main application component.
/// Loads graph data and config from the DOM and renders the correlation view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let config: GraphConfig = load_json_script("graph-config").unwrap_or_default();
	let theme = Theme::named(&config.theme);

	let stats = graph_data.stats.clone();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let refresh = RwSignal::new(0u64);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Fraud Correlation Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fraud-graph-page">
			<header class="graph-header">
				<h1>"Fraud Correlation Graph"</h1>
				<button class="refresh" on:click=move |_| refresh.update(|n| *n += 1)>
					"Refresh"
				</button>
			</header>
			<StatsBar stats=Signal::derive(move || stats.clone()) />
			<div class="graph-container">
				<FraudGraph data=graph_signal config=config refresh=refresh />
			</div>
			<Legend theme=theme />
			<p class="subtitle">
				"Drag nodes to reposition (hold Shift to keep them pinned, double-click to release). Scroll to zoom. Drag background to pan."
			</p>
		</div>
	}
}
