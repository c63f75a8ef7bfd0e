//! Leptos component wrapping the correlation graph canvas.
//!
//! The component renders a container `<div>` and hands it to a
//! [`GraphView`] backed by the DOM host. An animation loop runs via
//! `requestAnimationFrame` while the simulation is hot and stops when it
//! settles; queued input or a resize wakes it again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::config::GraphConfig;
use super::coordinator::{FrameStatus, FrameTicket, GraphView, LoadOutcome};
use super::dom::DomHost;
use super::types::GraphData;

type SharedView = Rc<RefCell<GraphView<DomHost>>>;

#[derive(Default)]
struct FrameLoopInner {
	handle: Cell<Option<i32>>,
	ticket: Cell<Option<FrameTicket>>,
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoopInner {
	fn schedule(&self, ticket: FrameTicket) {
		self.ticket.set(Some(ticket));
		if self.handle.get().is_some() {
			return;
		}
		let callback = self.callback.borrow();
		let (Some(window), Some(cb)) = (web_sys::window(), callback.as_ref()) else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => self.handle.set(Some(handle)),
			Err(e) => warn!("fraud-graph: requestAnimationFrame failed: {:?}", e),
		}
	}

	fn cancel(&self) {
		if let Some(handle) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
		self.ticket.set(None);
	}
}

/// Drives [`GraphView::frame`] from `requestAnimationFrame`.
struct FrameLoop {
	inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
	fn new(view: Weak<RefCell<GraphView<DomHost>>>) -> Self {
		let inner = Rc::new(FrameLoopInner::default());
		let weak_inner = Rc::downgrade(&inner);
		*inner.callback.borrow_mut() = Some(Closure::new(move || {
			let (Some(inner), Some(view)) = (weak_inner.upgrade(), view.upgrade()) else {
				return;
			};
			inner.handle.set(None);
			let Some(ticket) = inner.ticket.take() else {
				return;
			};
			let status = match view.try_borrow_mut() {
				Ok(mut view) => view.frame(ticket),
				Err(_) => FrameStatus::Continue,
			};
			if status == FrameStatus::Continue {
				inner.schedule(ticket);
			}
		}));
		Self { inner }
	}

	/// Drop any pending frame and start over under `ticket`.
	fn restart(&self, ticket: FrameTicket) {
		self.inner.cancel();
		self.inner.schedule(ticket);
	}

	fn cancel(&self) {
		self.inner.cancel();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.inner.cancel();
	}
}

/// Everything one mounted `FraudGraph` owns.
struct GraphRuntime {
	view: SharedView,
	frames: FrameLoop,
	on_resize: Option<Closure<dyn FnMut()>>,
}

impl GraphRuntime {
	fn new(config: GraphConfig) -> Self {
		let view: SharedView = Rc::new(RefCell::new(GraphView::new(DomHost::new(), config)));
		let frames = FrameLoop::new(Rc::downgrade(&view));

		let (wake_view, wake_loop) = (Rc::downgrade(&view), Rc::downgrade(&frames.inner));
		view.borrow().host().set_wake(move || {
			let (Some(view), Some(frames)) = (wake_view.upgrade(), wake_loop.upgrade()) else {
				return;
			};
			if let Ok(view) = view.try_borrow() {
				frames.schedule(view.ticket());
			}
		});

		let (resize_view, resize_loop) = (Rc::downgrade(&view), Rc::downgrade(&frames.inner));
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			let (Some(view), Some(frames)) = (resize_view.upgrade(), resize_loop.upgrade()) else {
				return;
			};
			let Ok(mut view) = view.try_borrow_mut() else {
				return;
			};
			view.resize();
			frames.schedule(view.ticket());
		});
		let on_resize = web_sys::window().and_then(|window| {
			window
				.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
				.map_err(|e| warn!("fraud-graph: resize listener failed: {:?}", e))
				.ok()
				.map(|_| on_resize)
		});

		Self {
			view,
			frames,
			on_resize,
		}
	}

	fn load(&self, container: HtmlElement, data: GraphData) {
		let (outcome, ticket) = {
			let mut view = self.view.borrow_mut();
			view.host_mut().attach(container);
			let outcome = view.load_dataset(data);
			(outcome, view.ticket())
		};
		debug!("fraud-graph: load outcome {:?}", outcome);
		self.start(outcome, ticket);
	}

	fn refresh(&self) {
		let (outcome, ticket) = {
			let mut view = self.view.borrow_mut();
			let outcome = view.refresh();
			(outcome, view.ticket())
		};
		self.start(outcome, ticket);
	}

	fn start(&self, outcome: LoadOutcome, ticket: FrameTicket) {
		match outcome {
			LoadOutcome::Empty => self.frames.cancel(),
			LoadOutcome::Rendered { .. } | LoadOutcome::Deferred => self.frames.restart(ticket),
		}
	}

	fn teardown(&self) {
		self.frames.cancel();
		if let Ok(mut view) = self.view.try_borrow_mut() {
			view.teardown();
			view.host_mut().detach();
		}
	}
}

impl Drop for GraphRuntime {
	fn drop(&mut self) {
		if let (Some(cb), Some(window)) = (self.on_resize.take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.teardown();
	}
}

/// Renders the interactive fraud correlation graph.
///
/// Every change of `data` replaces the graph; a change of `refresh` re-runs
/// the layout with the current data. The component fills its parent.
#[component]
pub fn FraudGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: Option<GraphConfig>,
	#[prop(optional, into)] refresh: Option<Signal<u64>>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let runtime = StoredValue::new_local(GraphRuntime::new(config.unwrap_or_default()));

	Effect::new(move |_| {
		let data = data.get();
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		runtime.with_value(|rt| rt.load(container, data));
	});

	if let Some(refresh) = refresh {
		Effect::new(move |previous: Option<u64>| {
			let generation = refresh.get();
			if previous.is_some_and(|p| p != generation) {
				runtime.with_value(|rt| rt.refresh());
			}
			generation
		});
	}

	on_cleanup(move || {
		runtime.try_with_value(|rt| rt.teardown());
	});

	view! {
		<div
			node_ref=container_ref
			class="fraud-graph"
			style="position: relative; width: 100%; height: 100%; min-height: 400px;"
		/>
	}
}
