//! Browser implementation of [`SurfaceHost`].
//!
//! Elements are appended to a container element; event listeners translate
//! mouse, wheel and touch events into [`InputEvent`]s on a shared queue and
//! poke a wake callback so an idle frame loop starts again.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, Document, Event, EventTarget,
	HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, WheelEvent,
};

use super::error::{SurfaceError, SurfaceResult};
use super::interaction::{InputEvent, MOUSE_POINTER};
use super::render;
use super::scene::{Frame, TooltipContent};
use super::surface::SurfaceHost;
use super::theme::Theme;

/// Wheel delta multipliers relative to pixel mode, per `WheelEvent.deltaMode`.
const WHEEL_LINE: f64 = 25.0;
const WHEEL_PAGE: f64 = 500.0;

/// Input shared between the listeners and the host.
#[derive(Clone, Default)]
struct InputQueue {
	events: Rc<RefCell<Vec<InputEvent>>>,
	wake: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl InputQueue {
	fn push(&self, event: InputEvent) {
		self.events.borrow_mut().push(event);
		let wake = self.wake.borrow().clone();
		if let Some(wake) = wake {
			wake();
		}
	}
}

/// A registered DOM listener. Dropping it without [`SurfaceHost::unlisten`]
/// leaves a dangling callback in the page.
pub struct DomListener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// Draws into a container element of the current document.
#[derive(Default)]
pub struct DomHost {
	container: Option<HtmlElement>,
	input: InputQueue,
}

impl DomHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the element graphs are mounted into.
	pub fn attach(&mut self, container: HtmlElement) {
		self.container = Some(container);
	}

	pub fn detach(&mut self) {
		self.container = None;
	}

	/// Called after every queued input event.
	pub fn set_wake(&self, wake: impl Fn() + 'static) {
		*self.input.wake.borrow_mut() = Some(Rc::new(wake));
	}

	fn document(&self) -> SurfaceResult<Document> {
		web_sys::window()
			.and_then(|w| w.document())
			.ok_or(SurfaceError::ContainerUnavailable)
	}

	fn container(&self) -> SurfaceResult<&HtmlElement> {
		self.container
			.as_ref()
			.filter(|c| c.is_connected())
			.ok_or(SurfaceError::ContainerUnavailable)
	}

	fn context(canvas: &HtmlElement) -> SurfaceResult<CanvasRenderingContext2d> {
		canvas
			.dyn_ref::<HtmlCanvasElement>()
			.ok_or(SurfaceError::ContextUnavailable)?
			.get_context("2d")?
			.ok_or(SurfaceError::ContextUnavailable)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SurfaceError::ContextUnavailable)
	}

	fn add_listener(
		&self,
		canvas: &HtmlElement,
		event: &'static str,
		translate: Translate,
	) -> SurfaceResult<DomListener> {
		let queue = self.input.clone();
		let target = canvas.clone();
		let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let rect = target.get_bounding_client_rect();
			for input in translate(&ev, (rect.left(), rect.top())) {
				queue.push(input);
			}
		});

		let options = AddEventListenerOptions::new();
		options.set_passive(false);
		let target: EventTarget = canvas.clone().into();
		target.add_event_listener_with_callback_and_add_event_listener_options(
			event,
			callback.as_ref().unchecked_ref::<js_sys::Function>(),
			&options,
		)?;
		Ok(DomListener {
			target,
			event,
			callback,
		})
	}
}

/// Turns a DOM event into input, given the canvas origin in client pixels.
type Translate = fn(&Event, (f64, f64)) -> Vec<InputEvent>;

const TRANSLATORS: [(&str, Translate); 10] = [
	("mousedown", mouse_down),
	("mousemove", mouse_move),
	("mouseup", mouse_up),
	("mouseleave", mouse_leave),
	("dblclick", double_click),
	("wheel", wheel),
	("touchstart", touch_start),
	("touchmove", touch_move),
	("touchend", touch_end),
	("touchcancel", touch_end),
];

fn mouse_position(ev: &Event, (left, top): (f64, f64)) -> Option<(&MouseEvent, f64, f64)> {
	let mouse = ev.dyn_ref::<MouseEvent>()?;
	Some((
		mouse,
		mouse.client_x() as f64 - left,
		mouse.client_y() as f64 - top,
	))
}

fn mouse_down(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	mouse_position(ev, origin)
		.map(|(_, x, y)| InputEvent::PointerDown {
			pointer: MOUSE_POINTER,
			x,
			y,
		})
		.into_iter()
		.collect()
}

fn mouse_move(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	mouse_position(ev, origin)
		.map(|(_, x, y)| InputEvent::PointerMove {
			pointer: MOUSE_POINTER,
			x,
			y,
		})
		.into_iter()
		.collect()
}

fn mouse_up(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	mouse_position(ev, origin)
		.map(|(mouse, x, y)| InputEvent::PointerUp {
			pointer: MOUSE_POINTER,
			x,
			y,
			keep_pinned: mouse.shift_key(),
		})
		.into_iter()
		.collect()
}

fn mouse_leave(_: &Event, _: (f64, f64)) -> Vec<InputEvent> {
	vec![InputEvent::PointerLeave]
}

fn double_click(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	mouse_position(ev, origin)
		.map(|(_, x, y)| InputEvent::DoubleClick { x, y })
		.into_iter()
		.collect()
}

fn wheel(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	let Some(wheel) = ev.dyn_ref::<WheelEvent>() else {
		return Vec::new();
	};
	ev.prevent_default();
	let scale = match wheel.delta_mode() {
		WheelEvent::DOM_DELTA_LINE => WHEEL_LINE,
		WheelEvent::DOM_DELTA_PAGE => WHEEL_PAGE,
		_ => 1.0,
	};
	mouse_position(ev, origin)
		.map(|(_, x, y)| InputEvent::Wheel {
			x,
			y,
			delta_y: wheel.delta_y() * scale,
		})
		.into_iter()
		.collect()
}

/// One event per changed touch.
fn touches(
	ev: &Event,
	(left, top): (f64, f64),
	make: impl Fn(i32, f64, f64) -> InputEvent,
) -> Vec<InputEvent> {
	let Some(touch_ev) = ev.dyn_ref::<TouchEvent>() else {
		return Vec::new();
	};
	ev.prevent_default();
	let list = touch_ev.changed_touches();
	(0..list.length())
		.filter_map(|i| list.get(i))
		.map(|t| {
			make(
				t.identifier(),
				t.client_x() as f64 - left,
				t.client_y() as f64 - top,
			)
		})
		.collect()
}

fn touch_start(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	touches(ev, origin, |pointer, x, y| InputEvent::PointerDown { pointer, x, y })
}

fn touch_move(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	touches(ev, origin, |pointer, x, y| InputEvent::PointerMove { pointer, x, y })
}

fn touch_end(ev: &Event, origin: (f64, f64)) -> Vec<InputEvent> {
	touches(ev, origin, |pointer, x, y| InputEvent::PointerUp {
		pointer,
		x,
		y,
		keep_pinned: false,
	})
}

impl SurfaceHost for DomHost {
	type Element = HtmlElement;
	type Listener = DomListener;

	fn container_size(&self) -> Option<(f64, f64)> {
		let container = self.container().ok()?;
		Some((
			container.client_width() as f64,
			container.client_height() as f64,
		))
	}

	fn create_canvas(&mut self, width: f64, height: f64) -> SurfaceResult<HtmlElement> {
		let canvas: HtmlCanvasElement = self
			.document()?
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| SurfaceError::Dom("created element is not a canvas".into()))?;
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		canvas.set_class_name("fraud-graph-canvas");
		let _ = canvas
			.style()
			.set_css_text("display: block; cursor: grab; touch-action: none;");

		let canvas: HtmlElement = canvas.into();
		self.container()?.append_child(&canvas)?;
		Ok(canvas)
	}

	fn create_tooltip(&mut self, theme: &Theme) -> SurfaceResult<HtmlElement> {
		let tooltip: HtmlElement = self
			.document()?
			.create_element("div")?
			.dyn_into()
			.map_err(|_| SurfaceError::Dom("created element is not an HTML element".into()))?;
		tooltip.set_class_name("fraud-graph-tooltip");
		let _ = tooltip.style().set_css_text(&format!(
			"position: absolute; visibility: hidden; pointer-events: none; \
			 background: {}; color: {}; padding: 8px; border-radius: 4px; \
			 font-size: 12px; z-index: 10;",
			theme.tooltip.background.to_css(),
			theme.tooltip.text.to_css(),
		));

		let container = self.container()?;
		let _ = container.style().set_property("position", "relative");
		container.append_child(&tooltip)?;
		Ok(tooltip)
	}

	fn resize_canvas(&mut self, canvas: &HtmlElement, width: f64, height: f64) {
		if let Some(canvas) = canvas.dyn_ref::<HtmlCanvasElement>() {
			canvas.set_width(width as u32);
			canvas.set_height(height as u32);
		}
	}

	fn remove_element(&mut self, element: HtmlElement) {
		element.remove();
	}

	fn listen(&mut self, canvas: &HtmlElement) -> SurfaceResult<Vec<DomListener>> {
		let mut listeners = Vec::with_capacity(TRANSLATORS.len());
		for (event, translate) in TRANSLATORS {
			match self.add_listener(canvas, event, translate) {
				Ok(listener) => listeners.push(listener),
				Err(e) => {
					for listener in listeners {
						self.unlisten(listener);
					}
					return Err(e);
				}
			}
		}
		Ok(listeners)
	}

	fn unlisten(&mut self, listener: DomListener) {
		if let Err(e) = listener.target.remove_event_listener_with_callback(
			listener.event,
			listener.callback.as_ref().unchecked_ref::<js_sys::Function>(),
		) {
			warn!("fraud-graph: failed to remove {} listener: {:?}", listener.event, e);
		}
	}

	fn paint(&mut self, canvas: &HtmlElement, frame: &Frame) -> SurfaceResult<()> {
		let ctx = Self::context(canvas)?;
		render::paint(&ctx, frame);
		Ok(())
	}

	fn show_tooltip(&mut self, tooltip: &HtmlElement, content: &TooltipContent, x: f64, y: f64) {
		let Ok(document) = self.document() else {
			return;
		};
		tooltip.set_text_content(None);

		let title = std::iter::once((content.title.clone(), true))
			.chain(content.detail_lines().into_iter().map(|line| (line, false)));
		for (text, bold) in title {
			let Ok(line) = document.create_element("div") else {
				continue;
			};
			line.set_text_content(Some(&text));
			if bold {
				let _ = line.set_attribute("style", "font-weight: bold;");
			}
			let _ = tooltip.append_child(&line);
		}

		let style = tooltip.style();
		let _ = style.set_property("left", &format!("{x}px"));
		let _ = style.set_property("top", &format!("{y}px"));
		let _ = style.set_property("visibility", "visible");
	}

	fn hide_tooltip(&mut self, tooltip: &HtmlElement) {
		let _ = tooltip.style().set_property("visibility", "hidden");
	}

	fn take_input(&mut self) -> Vec<InputEvent> {
		std::mem::take(&mut *self.input.events.borrow_mut())
	}
}
