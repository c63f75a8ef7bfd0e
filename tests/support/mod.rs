//! Recording `SurfaceHost` double for driving `GraphView` natively.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use fraud_graph::components::force_graph::scene::{Frame, TooltipContent};
use fraud_graph::components::force_graph::{InputEvent, SurfaceError, SurfaceHost, Theme};

/// Number of listeners `RecordingHost::listen` registers per canvas.
pub const LISTENERS_PER_CANVAS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
	Canvas,
	Tooltip,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShownTooltip {
	pub content: TooltipContent,
	pub x: f64,
	pub y: f64,
}

#[derive(Default)]
pub struct RecordingHost {
	/// `None` simulates a container that is not attached yet.
	pub container: Option<(f64, f64)>,
	next_id: u64,
	pub live: BTreeMap<u64, ElementKind>,
	pub listeners: BTreeSet<u64>,
	pub canvas_sizes: BTreeMap<u64, (f64, f64)>,
	pub queued: Vec<InputEvent>,
	pub paints: usize,
	pub last_frame: Option<Frame>,
	pub tooltip: Option<ShownTooltip>,
}

impl RecordingHost {
	pub fn with_container(width: f64, height: f64) -> Self {
		Self {
			container: Some((width, height)),
			..Self::default()
		}
	}

	pub fn count(&self, kind: ElementKind) -> usize {
		self.live.values().filter(|k| **k == kind).count()
	}

	pub fn push(&mut self, event: InputEvent) {
		self.queued.push(event);
	}

	fn next(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}
}

impl SurfaceHost for RecordingHost {
	type Element = u64;
	type Listener = u64;

	fn container_size(&self) -> Option<(f64, f64)> {
		self.container
	}

	fn create_canvas(&mut self, width: f64, height: f64) -> Result<u64, SurfaceError> {
		if self.container.is_none() {
			return Err(SurfaceError::ContainerUnavailable);
		}
		let id = self.next();
		self.live.insert(id, ElementKind::Canvas);
		self.canvas_sizes.insert(id, (width, height));
		Ok(id)
	}

	fn create_tooltip(&mut self, _theme: &Theme) -> Result<u64, SurfaceError> {
		let id = self.next();
		self.live.insert(id, ElementKind::Tooltip);
		Ok(id)
	}

	fn resize_canvas(&mut self, canvas: &u64, width: f64, height: f64) {
		self.canvas_sizes.insert(*canvas, (width, height));
	}

	fn remove_element(&mut self, element: u64) {
		assert!(self.live.remove(&element).is_some(), "element {element} removed twice");
		self.canvas_sizes.remove(&element);
		if self.count(ElementKind::Tooltip) == 0 {
			self.tooltip = None;
		}
	}

	fn listen(&mut self, canvas: &u64) -> Result<Vec<u64>, SurfaceError> {
		assert_eq!(self.live.get(canvas), Some(&ElementKind::Canvas));
		Ok((0..LISTENERS_PER_CANVAS)
			.map(|_| {
				let id = self.next();
				self.listeners.insert(id);
				id
			})
			.collect())
	}

	fn unlisten(&mut self, listener: u64) {
		assert!(self.listeners.remove(&listener), "listener {listener} removed twice");
	}

	fn paint(&mut self, canvas: &u64, frame: &Frame) -> Result<(), SurfaceError> {
		assert_eq!(self.live.get(canvas), Some(&ElementKind::Canvas));
		self.paints += 1;
		self.last_frame = Some(frame.clone());
		Ok(())
	}

	fn show_tooltip(&mut self, tooltip: &u64, content: &TooltipContent, x: f64, y: f64) {
		assert_eq!(self.live.get(tooltip), Some(&ElementKind::Tooltip));
		self.tooltip = Some(ShownTooltip {
			content: content.clone(),
			x,
			y,
		});
	}

	fn hide_tooltip(&mut self, _tooltip: &u64) {
		self.tooltip = None;
	}

	fn take_input(&mut self) -> Vec<InputEvent> {
		std::mem::take(&mut self.queued)
	}
}
