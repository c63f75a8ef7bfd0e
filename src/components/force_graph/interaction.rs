//! Pointer state machine: drag, pan, zoom and hover.
//!
//! The controller never mutates the simulation or the transform itself. It
//! turns raw [`InputEvent`]s into [`Command`]s which the coordinator applies
//! between ticks, so every mutation of shared state happens in one place.

use super::config::ZoomConfig;
use super::model::NodeIdx;
use super::simulation::Simulation;
use super::transform::ViewTransform;

/// Identifies one pointer. Each touch gets its own id; the mouse is [`MOUSE_POINTER`].
pub type PointerId = i32;

pub const MOUSE_POINTER: PointerId = -1;

/// Raw input in canvas-relative screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
	PointerDown {
		pointer: PointerId,
		x: f64,
		y: f64,
	},
	PointerMove {
		pointer: PointerId,
		x: f64,
		y: f64,
	},
	PointerUp {
		pointer: PointerId,
		x: f64,
		y: f64,
		/// Keep a dragged node pinned where it was dropped (Shift held).
		keep_pinned: bool,
	},
	/// The pointer left the canvas.
	PointerLeave,
	Wheel {
		x: f64,
		y: f64,
		delta_y: f64,
	},
	DoubleClick {
		x: f64,
		y: f64,
	},
}

/// A state change requested by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	/// Pin `node` at world `(x, y)`.
	Pin { node: NodeIdx, x: f64, y: f64 },
	/// Clear the pin of `node`.
	Release { node: NodeIdx },
	SetAlphaTarget(f64),
	/// Give the simulation a burst of energy.
	SetAlpha(f64),
	SetTransform(ViewTransform),
	/// Show the tooltip for `node` near screen point `(x, y)`.
	ShowTooltip { node: NodeIdx, x: f64, y: f64 },
	HideTooltip,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
	pub node: NodeIdx,
	pub pointer: PointerId,
	/// Node position minus pointer position, in world units.
	pub offset: (f64, f64),
	/// Pointer-down position, in screen pixels.
	pub start: (f64, f64),
	/// The node was already pinned when the drag began.
	pub was_pinned: bool,
	pub moved: bool,
}

impl DragSession {
	/// Commands ending this drag. A click that never moved a pinned node
	/// leaves it pinned so a double-click can still release it.
	fn finish(self, keep_pinned: bool) -> Vec<Command> {
		let mut commands = Vec::with_capacity(2);
		if !keep_pinned && (self.moved || !self.was_pinned) {
			commands.push(Command::Release { node: self.node });
		}
		commands.push(Command::SetAlphaTarget(0.0));
		commands
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSession {
	pub pointer: PointerId,
	/// Last pointer position, in screen pixels.
	pub last: (f64, f64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionState {
	#[default]
	Idle,
	Dragging(DragSession),
	PanZoom(PanSession),
}

#[derive(Clone, Debug)]
pub struct InteractionController {
	state: InteractionState,
	hovered: Option<NodeIdx>,
	zoom: ZoomConfig,
	drag_alpha_target: f64,
	hit_padding: f64,
}

impl InteractionController {
	pub fn new(zoom: ZoomConfig, drag_alpha_target: f64, hit_padding: f64) -> Self {
		Self {
			state: InteractionState::Idle,
			hovered: None,
			zoom,
			drag_alpha_target,
			hit_padding,
		}
	}

	pub fn state(&self) -> InteractionState {
		self.state
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, InteractionState::Dragging(_))
	}

	/// Translate one input event into commands.
	pub fn handle(
		&mut self,
		event: InputEvent,
		sim: &Simulation,
		transform: &ViewTransform,
	) -> Vec<Command> {
		match (self.state, event) {
			(InteractionState::Idle, InputEvent::PointerDown { pointer, x, y }) => {
				let (wx, wy) = transform.screen_to_world(x, y);
				match self.hit(sim, wx, wy) {
					Some(node) => {
						let (nx, ny, was_pinned) = sim
							.node(node)
							.map_or((wx, wy, false), |n| (n.x, n.y, n.is_pinned()));
						self.state = InteractionState::Dragging(DragSession {
							node,
							pointer,
							offset: (nx - wx, ny - wy),
							start: (x, y),
							was_pinned,
							moved: false,
						});
						vec![
							Command::Pin { node, x: nx, y: ny },
							Command::SetAlphaTarget(self.drag_alpha_target),
						]
					}
					None => {
						self.state = InteractionState::PanZoom(PanSession {
							pointer,
							last: (x, y),
						});
						Vec::new()
					}
				}
			}
			// One gesture at a time.
			(_, InputEvent::PointerDown { .. }) => Vec::new(),

			(InteractionState::Dragging(drag), InputEvent::PointerMove { pointer, x, y })
				if pointer == drag.pointer =>
			{
				if (x, y) != drag.start {
					self.state = InteractionState::Dragging(DragSession {
						moved: true,
						..drag
					});
				}
				let (wx, wy) = transform.screen_to_world(x, y);
				vec![Command::Pin {
					node: drag.node,
					x: wx + drag.offset.0,
					y: wy + drag.offset.1,
				}]
			}
			(InteractionState::PanZoom(pan), InputEvent::PointerMove { pointer, x, y })
				if pointer == pan.pointer =>
			{
				let (dx, dy) = (x - pan.last.0, y - pan.last.1);
				self.state = InteractionState::PanZoom(PanSession {
					pointer,
					last: (x, y),
				});
				vec![Command::SetTransform(transform.panned(dx, dy))]
			}
			(InteractionState::Idle, InputEvent::PointerMove { x, y, .. }) => {
				self.hover(sim, transform, x, y)
			}
			(_, InputEvent::PointerMove { .. }) => Vec::new(),

			(
				InteractionState::Dragging(drag),
				InputEvent::PointerUp {
					pointer,
					keep_pinned,
					..
				},
			) if pointer == drag.pointer => {
				self.state = InteractionState::Idle;
				drag.finish(keep_pinned)
			}
			(InteractionState::PanZoom(pan), InputEvent::PointerUp { pointer, .. })
				if pointer == pan.pointer =>
			{
				self.state = InteractionState::Idle;
				Vec::new()
			}
			(_, InputEvent::PointerUp { .. }) => Vec::new(),

			(state, InputEvent::PointerLeave) => {
				self.state = InteractionState::Idle;
				self.hovered = None;
				let mut commands = match state {
					InteractionState::Dragging(drag) => drag.finish(false),
					_ => Vec::new(),
				};
				commands.push(Command::HideTooltip);
				commands
			}

			(InteractionState::Dragging(_), InputEvent::Wheel { .. }) => Vec::new(),
			(_, InputEvent::Wheel { x, y, delta_y }) => {
				let next = transform.zoomed_at(x, y, delta_y, &self.zoom);
				if next == *transform {
					Vec::new()
				} else {
					vec![Command::SetTransform(next)]
				}
			}

			(InteractionState::Idle, InputEvent::DoubleClick { x, y }) => {
				let (wx, wy) = transform.screen_to_world(x, y);
				match self.hit(sim, wx, wy) {
					Some(node) if sim.node(node).is_some_and(|n| n.is_pinned()) => vec![
						Command::Release { node },
						Command::SetAlpha(self.drag_alpha_target),
					],
					_ => Vec::new(),
				}
			}
			(_, InputEvent::DoubleClick { .. }) => Vec::new(),
		}
	}

	fn hit(&self, sim: &Simulation, wx: f64, wy: f64) -> Option<NodeIdx> {
		sim.find(wx, wy, self.hit_padding)
	}

	fn hover(
		&mut self,
		sim: &Simulation,
		transform: &ViewTransform,
		x: f64,
		y: f64,
	) -> Vec<Command> {
		let (wx, wy) = transform.screen_to_world(x, y);
		match self.hit(sim, wx, wy) {
			Some(node) => {
				self.hovered = Some(node);
				vec![Command::ShowTooltip { node, x, y }]
			}
			None if self.hovered.take().is_some() => vec![Command::HideTooltip],
			None => Vec::new(),
		}
	}
}
