//! Owns one graph view: dataset, simulation, surface and input wiring.
//!
//! `GraphView` is driven from outside by an animation-frame loop. Every frame
//! it drains queued input, applies the resulting commands, advances the
//! simulation by one tick and repaints. A reload or teardown bumps the view's
//! generation; frames scheduled under an older [`FrameTicket`] are no-ops.

use log::{debug, info, warn};

use super::config::GraphConfig;
use super::error::SurfaceError;
use super::interaction::{Command, InputEvent, InteractionController, InteractionState};
use super::model::normalize;
use super::simulation::Simulation;
use super::surface::{RenderSurface, SurfaceHost};
use super::theme::Theme;
use super::transform::ViewTransform;
use super::types::{GraphData, GraphStats};

/// Permission to run one frame, valid until the next reload or teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
	generation: u64,
}

/// Result of loading (or refreshing) a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The graph is mounted and animating.
	Rendered {
		nodes: usize,
		links: usize,
		dropped_links: usize,
	},
	/// No nodes; the placeholder is shown.
	Empty,
	/// The container is not ready; mounting is retried on the next frame.
	Deferred,
}

/// What the frame loop should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
	/// Schedule another frame.
	Continue,
	/// Nothing is animating; wait for input before scheduling again.
	Idle,
	/// The ticket belongs to a disposed instance. Do not reschedule it.
	Stale,
}

struct Layout {
	sim: Simulation,
	controller: InteractionController,
	transform: ViewTransform,
}

struct Session<H: SurfaceHost> {
	surface: RenderSurface<H>,
	/// `None` in the empty state.
	layout: Option<Layout>,
	dirty: bool,
}

/// One graph view bound to a host.
pub struct GraphView<H: SurfaceHost> {
	host: H,
	config: GraphConfig,
	theme: Theme,
	interactive: bool,
	dataset: Option<GraphData>,
	session: Option<Session<H>>,
	/// A mount was deferred and is retried every frame.
	pending: bool,
	generation: u64,
}

impl<H: SurfaceHost> GraphView<H> {
	pub fn new(host: H, config: GraphConfig) -> Self {
		let theme = Theme::named(&config.theme);
		Self {
			host,
			config,
			theme,
			interactive: true,
			dataset: None,
			session: None,
			pending: false,
			generation: 0,
		}
	}

	/// Build a view that draws but registers no input listeners.
	pub fn non_interactive(host: H, config: GraphConfig) -> Self {
		let mut view = Self::new(host, config);
		view.interactive = false;
		view
	}

	/// Replace the current graph with `data`.
	///
	/// The previous instance (canvas, tooltip, listeners, simulation) is
	/// disposed first, so repeated loads never accumulate elements.
	pub fn load_dataset(&mut self, data: GraphData) -> LoadOutcome {
		self.dispose_session();
		self.dataset = Some(data);
		self.build()
	}

	/// Re-run the layout from scratch with the current dataset.
	pub fn refresh(&mut self) -> LoadOutcome {
		self.dispose_session();
		self.build()
	}

	/// Dispose every element, listener and the simulation. The dataset is kept
	/// so a later [`GraphView::refresh`] can rebuild it.
	pub fn teardown(&mut self) {
		if self.session.is_some() || self.pending {
			info!("fraud-graph: teardown");
		}
		self.dispose_session();
	}

	/// Ticket for the next frame of the current instance.
	pub fn ticket(&self) -> FrameTicket {
		FrameTicket {
			generation: self.generation,
		}
	}

	/// Run one frame: input, one simulation tick, repaint.
	pub fn frame(&mut self, ticket: FrameTicket) -> FrameStatus {
		if ticket.generation != self.generation {
			return FrameStatus::Stale;
		}
		if self.pending {
			match self.build() {
				LoadOutcome::Deferred => return FrameStatus::Continue,
				LoadOutcome::Empty => return FrameStatus::Idle,
				LoadOutcome::Rendered { .. } => {}
			}
		}

		for event in self.host.take_input() {
			self.handle_input(event);
		}

		let Some(session) = self.session.as_mut() else {
			return FrameStatus::Idle;
		};
		let Some(layout) = session.layout.as_mut() else {
			return FrameStatus::Idle;
		};
		if layout.sim.step() {
			session.dirty = true;
		}
		if session.dirty {
			session.surface.update(
				&mut self.host,
				&layout.sim,
				layout.transform,
				&self.theme,
				&self.config.render,
			);
			session.dirty = false;
		}

		if layout.sim.is_running() {
			FrameStatus::Continue
		} else {
			FrameStatus::Idle
		}
	}

	/// Feed one input event through the interaction controller.
	pub fn handle_input(&mut self, event: InputEvent) {
		let Some(layout) = self.session.as_mut().and_then(|s| s.layout.as_mut()) else {
			return;
		};
		let commands = layout
			.controller
			.handle(event, &layout.sim, &layout.transform);
		for command in commands {
			self.dispatch(command);
		}
	}

	/// Apply a command to the simulation, transform or tooltip.
	///
	/// Commands against a disposed instance or an unknown node are ignored.
	pub fn dispatch(&mut self, command: Command) {
		let Some(session) = self.session.as_mut() else {
			return;
		};
		let Some(layout) = session.layout.as_mut() else {
			return;
		};
		match command {
			Command::Pin { node, x, y } => {
				layout.sim.pin(node, x, y);
				session.dirty = true;
			}
			Command::Release { node } => {
				layout.sim.unpin(node);
				session.dirty = true;
			}
			Command::SetAlphaTarget(target) => layout.sim.reheat(target),
			Command::SetAlpha(alpha) => layout.sim.set_alpha(alpha),
			Command::SetTransform(transform) => {
				layout.transform = transform.clamped(&self.config.zoom);
				session.dirty = true;
			}
			Command::ShowTooltip { node, x, y } => {
				if let Some(n) = layout.sim.node(node) {
					session
						.surface
						.show_tooltip(&mut self.host, n, (x, y), &self.config.render);
				}
			}
			Command::HideTooltip => session.surface.hide_tooltip(&mut self.host),
		}
	}

	/// Follow a container size change. The center force retargets the new center.
	pub fn resize(&mut self) {
		let Some(session) = self.session.as_mut() else {
			return;
		};
		let Some((w, h)) = self.host.container_size() else {
			return;
		};
		let render = &self.config.render;
		let (w, h) = (
			if w > 0.0 { w } else { render.fallback_width },
			if h > 0.0 { h } else { render.fallback_height },
		);
		if session.surface.size() == (w, h) {
			return;
		}
		session.surface.resize(&mut self.host, w, h);
		match session.layout.as_mut() {
			Some(layout) => {
				layout.sim.set_center(w / 2.0, h / 2.0);
				let alpha = layout.sim.alpha().max(self.config.forces.drag_alpha_target);
				layout.sim.set_alpha(alpha);
				session.dirty = true;
			}
			None => session
				.surface
				.show_placeholder(&mut self.host, &self.theme, render),
		}
		debug!("fraud-graph: resized to {}x{}", w, h);
	}

	pub fn dataset(&self) -> Option<&GraphData> {
		self.dataset.as_ref()
	}

	/// Pass-through counters of the current dataset.
	pub fn stats(&self) -> Option<&GraphStats> {
		self.dataset.as_ref().and_then(|d| d.stats.as_ref())
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.layout().map(|l| &l.sim)
	}

	pub fn transform(&self) -> Option<ViewTransform> {
		self.layout().map(|l| l.transform)
	}

	pub fn interaction_state(&self) -> Option<InteractionState> {
		self.layout().map(|l| l.controller.state())
	}

	/// Nodes drawn by the last paint.
	pub fn rendered_node_count(&self) -> usize {
		self.session
			.as_ref()
			.map_or(0, |s| s.surface.rendered_nodes())
	}

	/// Links drawn by the last paint.
	pub fn rendered_link_count(&self) -> usize {
		self.session
			.as_ref()
			.map_or(0, |s| s.surface.rendered_links())
	}

	/// Whether a surface is currently mounted.
	pub fn is_mounted(&self) -> bool {
		self.session.is_some()
	}

	/// Whether a mount is waiting for the container.
	pub fn is_pending(&self) -> bool {
		self.pending
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	fn layout(&self) -> Option<&Layout> {
		self.session.as_ref().and_then(|s| s.layout.as_ref())
	}

	fn dispose_session(&mut self) {
		if let Some(mut session) = self.session.take() {
			session.surface.dispose(&mut self.host);
		}
		// Input queued against the old canvas must not reach the next instance.
		let stale = self.host.take_input();
		if !stale.is_empty() {
			debug!("fraud-graph: dropped {} queued input events", stale.len());
		}
		self.pending = false;
		self.generation += 1;
	}

	fn build(&mut self) -> LoadOutcome {
		// Mount before normalizing: the simulation is seeded from the canvas size.
		let mut surface = match RenderSurface::mount(
			&mut self.host,
			&self.theme,
			&self.config.render,
			self.interactive,
		) {
			Ok(surface) => surface,
			Err(e) => {
				if !self.pending {
					match e {
						SurfaceError::ContainerUnavailable => {
							debug!("fraud-graph: container not ready, deferring mount")
						}
						other => warn!("fraud-graph: mount failed, retrying: {}", other),
					}
				}
				self.pending = true;
				return LoadOutcome::Deferred;
			}
		};
		self.pending = false;

		let empty = GraphData::default();
		let data = self.dataset.as_ref().unwrap_or(&empty);
		let model = normalize(&data.nodes, &data.links);

		if model.is_empty() {
			surface.show_placeholder(&mut self.host, &self.theme, &self.config.render);
			self.session = Some(Session {
				surface,
				layout: None,
				dirty: false,
			});
			info!("fraud-graph: no nodes to display");
			return LoadOutcome::Empty;
		}

		let outcome = LoadOutcome::Rendered {
			nodes: model.nodes.len(),
			links: model.links.len(),
			dropped_links: model.dropped_links,
		};
		let (w, h) = surface.size();
		let sim = Simulation::new(model.nodes, model.links, w, h, self.config.forces.clone());
		let controller = InteractionController::new(
			self.config.zoom.clone(),
			self.config.forces.drag_alpha_target,
			self.config.render.hit_padding,
		);
		let transform = ViewTransform::IDENTITY;
		surface.update(
			&mut self.host,
			&sim,
			transform,
			&self.theme,
			&self.config.render,
		);
		info!(
			"fraud-graph: loaded {} nodes and {} links",
			sim.nodes().len(),
			sim.links().len()
		);
		self.session = Some(Session {
			surface,
			layout: Some(Layout {
				sim,
				controller,
				transform,
			}),
			dirty: false,
		});
		outcome
	}
}

impl<H: SurfaceHost> Drop for GraphView<H> {
	fn drop(&mut self) {
		self.dispose_session();
	}
}
