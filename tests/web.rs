//! Browser tests for the DOM host. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(unused_crate_dependencies)]

use fraud_graph::components::force_graph::{
	DomHost, FrameStatus, GraphConfig, GraphData, GraphView, LoadOutcome,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	div.style().set_property("width", "600px").unwrap();
	div.style().set_property("height", "300px").unwrap();
	document.body().unwrap().append_child(&div).unwrap();
	div
}

fn pair() -> GraphData {
	GraphData::from_json(
		r#"{"nodes": [{"id": "ip1", "type": "ip"}, {"id": "dev1", "type": "device"}],
			"links": [{"source": "ip1", "target": "dev1"}]}"#,
	)
	.unwrap()
}

fn count(container: &HtmlElement, selector: &str) -> u32 {
	container.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
fn reloads_do_not_stack_canvases() {
	let div = container();
	let mut host = DomHost::new();
	host.attach(div.clone());
	let mut view = GraphView::new(host, GraphConfig::default());

	for _ in 0..3 {
		assert!(matches!(
			view.load_dataset(pair()),
			LoadOutcome::Rendered { nodes: 2, .. }
		));
	}
	assert_eq!(count(&div, "canvas.fraud-graph-canvas"), 1);
	assert_eq!(count(&div, ".fraud-graph-tooltip"), 1);

	view.teardown();
	assert_eq!(count(&div, "canvas"), 0);
	assert_eq!(count(&div, ".fraud-graph-tooltip"), 0);
	div.remove();
}

#[wasm_bindgen_test]
fn detached_container_defers_mount() {
	let mut host = DomHost::new();
	let document = web_sys::window().unwrap().document().unwrap();
	let orphan: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	host.attach(orphan);
	let mut view = GraphView::new(host, GraphConfig::default());

	assert_eq!(view.load_dataset(pair()), LoadOutcome::Deferred);
	let ticket = view.ticket();
	assert_eq!(view.frame(ticket), FrameStatus::Continue);

	let div = container();
	view.host_mut().attach(div.clone());
	let ticket = view.ticket();
	view.frame(ticket);
	assert!(view.is_mounted());
	assert_eq!(count(&div, "canvas"), 1);
	drop(view);
	assert_eq!(count(&div, "canvas"), 0);
	div.remove();
}
