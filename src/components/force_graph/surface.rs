//! Lifecycle of the drawing surface: canvas, tooltip overlay and listeners.
//!
//! [`SurfaceHost`] is the seam between the layout core and whatever actually
//! draws. The browser implementation lives in `dom`; tests use a recording
//! double. [`RenderSurface`] tracks which host resources one mounted graph
//! owns, so that disposing it releases exactly those and nothing else.

use log::warn;

use super::config::RenderConfig;
use super::error::{SurfaceError, SurfaceResult};
use super::interaction::InputEvent;
use super::model::Node;
use super::scene::{Frame, TooltipContent};
use super::simulation::Simulation;
use super::theme::Theme;
use super::transform::ViewTransform;

/// Host environment a graph is drawn into.
pub trait SurfaceHost {
	/// Handle to a created element (canvas or tooltip).
	type Element;
	/// Handle to a registered event listener.
	type Listener;

	/// Size of the container in pixels, or `None` while it is not attached.
	fn container_size(&self) -> Option<(f64, f64)>;

	fn create_canvas(&mut self, width: f64, height: f64) -> SurfaceResult<Self::Element>;

	/// Create the (hidden) tooltip overlay.
	fn create_tooltip(&mut self, theme: &Theme) -> SurfaceResult<Self::Element>;

	fn resize_canvas(&mut self, canvas: &Self::Element, width: f64, height: f64);

	/// Detach an element created by this host.
	fn remove_element(&mut self, element: Self::Element);

	/// Register pointer listeners on the canvas. Their events are queued for
	/// [`SurfaceHost::take_input`].
	fn listen(&mut self, canvas: &Self::Element) -> SurfaceResult<Vec<Self::Listener>>;

	fn unlisten(&mut self, listener: Self::Listener);

	fn paint(&mut self, canvas: &Self::Element, frame: &Frame) -> SurfaceResult<()>;

	/// Show the tooltip with its top-left corner at `(x, y)` in container pixels.
	fn show_tooltip(&mut self, tooltip: &Self::Element, content: &TooltipContent, x: f64, y: f64);

	fn hide_tooltip(&mut self, tooltip: &Self::Element);

	/// Drain input queued since the last call.
	fn take_input(&mut self) -> Vec<InputEvent>;
}

/// Host resources owned by one mounted graph.
pub struct RenderSurface<H: SurfaceHost> {
	canvas: Option<H::Element>,
	tooltip: Option<H::Element>,
	listeners: Vec<H::Listener>,
	size: (f64, f64),
	rendered_nodes: usize,
	rendered_links: usize,
}

impl<H: SurfaceHost> RenderSurface<H> {
	/// Create the canvas, the shared tooltip and (if `interactive`) the listeners.
	///
	/// A container reporting a zero dimension gets the fallback size. On error
	/// everything created so far is removed again.
	pub fn mount(
		host: &mut H,
		theme: &Theme,
		render: &RenderConfig,
		interactive: bool,
	) -> SurfaceResult<Self> {
		let (w, h) = host
			.container_size()
			.ok_or(SurfaceError::ContainerUnavailable)?;
		let size = (
			if w > 0.0 { w } else { render.fallback_width },
			if h > 0.0 { h } else { render.fallback_height },
		);

		let canvas = host.create_canvas(size.0, size.1)?;
		let mut surface = Self {
			canvas: Some(canvas),
			tooltip: None,
			listeners: Vec::new(),
			size,
			rendered_nodes: 0,
			rendered_links: 0,
		};

		let wired = host.create_tooltip(theme).and_then(|tooltip| {
			surface.tooltip = Some(tooltip);
			match (&surface.canvas, interactive) {
				(Some(canvas), true) => host.listen(canvas),
				_ => Ok(Vec::new()),
			}
		});
		match wired {
			Ok(listeners) => {
				surface.listeners = listeners;
				Ok(surface)
			}
			Err(e) => {
				surface.dispose(host);
				Err(e)
			}
		}
	}

	pub fn is_mounted(&self) -> bool {
		self.canvas.is_some()
	}

	pub fn size(&self) -> (f64, f64) {
		self.size
	}

	pub fn rendered_nodes(&self) -> usize {
		self.rendered_nodes
	}

	pub fn rendered_links(&self) -> usize {
		self.rendered_links
	}

	pub fn resize(&mut self, host: &mut H, width: f64, height: f64) {
		self.size = (width, height);
		if let Some(canvas) = &self.canvas {
			host.resize_canvas(canvas, width, height);
		}
	}

	/// Repaint from the current simulation state.
	pub fn update(
		&mut self,
		host: &mut H,
		sim: &Simulation,
		transform: ViewTransform,
		theme: &Theme,
		render: &RenderConfig,
	) {
		let Some(canvas) = &self.canvas else {
			return;
		};
		let frame = Frame::build(sim, transform, self.size, theme, render);
		self.rendered_nodes = frame.nodes.len();
		self.rendered_links = frame.links.len();
		if let Err(e) = host.paint(canvas, &frame) {
			warn!("fraud-graph: paint failed: {}", e);
		}
	}

	/// Paint the empty-state message.
	pub fn show_placeholder(&mut self, host: &mut H, theme: &Theme, render: &RenderConfig) {
		let Some(canvas) = &self.canvas else {
			return;
		};
		self.rendered_nodes = 0;
		self.rendered_links = 0;
		let frame = Frame::placeholder(self.size, theme, render);
		if let Err(e) = host.paint(canvas, &frame) {
			warn!("fraud-graph: paint failed: {}", e);
		}
	}

	/// Show the tooltip for `node`, offset from the pointer at screen `(x, y)`.
	pub fn show_tooltip(
		&mut self,
		host: &mut H,
		node: &Node,
		(x, y): (f64, f64),
		render: &RenderConfig,
	) {
		let Some(tooltip) = &self.tooltip else {
			return;
		};
		let (ox, oy) = render.tooltip_offset;
		host.show_tooltip(tooltip, &TooltipContent::for_node(node), x + ox, y + oy);
	}

	pub fn hide_tooltip(&self, host: &mut H) {
		if let Some(tooltip) = &self.tooltip {
			host.hide_tooltip(tooltip);
		}
	}

	/// Remove every element and listener this surface registered. Idempotent.
	pub fn dispose(&mut self, host: &mut H) {
		for listener in self.listeners.drain(..) {
			host.unlisten(listener);
		}
		if let Some(tooltip) = self.tooltip.take() {
			host.remove_element(tooltip);
		}
		if let Some(canvas) = self.canvas.take() {
			host.remove_element(canvas);
		}
		self.rendered_nodes = 0;
		self.rendered_links = 0;
	}
}
