//! Display list built from the simulation each frame.
//!
//! A [`Frame`] is everything a painter needs and nothing more: shapes in world
//! coordinates plus the transform that maps them to the screen. Building it is
//! pure, so drawing rules are tested without a canvas.

use super::config::RenderConfig;
use super::model::Node;
use super::simulation::Simulation;
use super::theme::{Color, Theme};
use super::transform::ViewTransform;

#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub width: f64,
	pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: Color,
	pub stroke: Color,
	pub stroke_width: f64,
}

/// Text centered horizontally on `x`, baseline at `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelShape {
	pub x: f64,
	pub y: f64,
	pub text: String,
}

/// Centered message shown instead of the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
	pub text: String,
	pub color: Color,
	pub font: String,
}

/// One frame worth of drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub width: f64,
	pub height: f64,
	pub background: Color,
	pub transform: ViewTransform,
	/// Drawn first, under the nodes.
	pub links: Vec<LinkShape>,
	pub nodes: Vec<NodeShape>,
	pub labels: Vec<LabelShape>,
	pub label_font: String,
	pub label_color: Color,
	pub placeholder: Option<Placeholder>,
}

impl Frame {
	/// Display list for the current simulation state.
	pub fn build(
		sim: &Simulation,
		transform: ViewTransform,
		(width, height): (f64, f64),
		theme: &Theme,
		render: &RenderConfig,
	) -> Self {
		let nodes = sim.nodes();

		let links = sim
			.links()
			.iter()
			.map(|link| {
				let (s, t) = (&nodes[link.source], &nodes[link.target]);
				LinkShape {
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
					width: link.strength * render.link_width_per_strength,
					color: theme.edge.get(link.kind).with_alpha(render.link_opacity),
				}
			})
			.collect();

		let node_shapes = nodes
			.iter()
			.map(|node| NodeShape {
				x: node.x,
				y: node.y,
				radius: node.size,
				fill: theme.palette.get(node.kind),
				stroke: theme.node.border_color,
				stroke_width: render.node_stroke_width,
			})
			.collect();

		let labels = nodes
			.iter()
			.map(|node| LabelShape {
				x: node.x,
				y: node.y + node.size + render.label_offset,
				text: truncate_label(&node.label, render.label_max_chars, render.label_keep_chars),
			})
			.collect();

		Self {
			width,
			height,
			background: theme.background,
			transform,
			links,
			nodes: node_shapes,
			labels,
			label_font: render.label_font.clone(),
			label_color: theme.node.label_color,
			placeholder: None,
		}
	}

	/// The empty-state frame: background and a centered message.
	pub fn placeholder((width, height): (f64, f64), theme: &Theme, render: &RenderConfig) -> Self {
		Self {
			width,
			height,
			background: theme.background,
			transform: ViewTransform::IDENTITY,
			links: Vec::new(),
			nodes: Vec::new(),
			labels: Vec::new(),
			label_font: render.label_font.clone(),
			label_color: theme.node.label_color,
			placeholder: Some(Placeholder {
				text: render.empty_message.clone(),
				color: theme.placeholder,
				font: render.placeholder_font.clone(),
			}),
		}
	}
}

/// Shorten labels longer than `max_chars` to their first `keep_chars` plus `...`.
///
/// Counts characters, not bytes.
pub fn truncate_label(label: &str, max_chars: usize, keep_chars: usize) -> String {
	if label.chars().count() <= max_chars {
		return label.to_string();
	}
	let mut out: String = label.chars().take(keep_chars).collect();
	out.push_str("...");
	out
}

/// What the hover tooltip says about a node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	/// Full label, shown bold.
	pub title: String,
	pub kind: &'static str,
	pub fraud_count: u32,
}

impl TooltipContent {
	pub fn for_node(node: &Node) -> Self {
		Self {
			title: node.label.clone(),
			kind: node.kind.display_name(),
			fraud_count: node.fraud_count,
		}
	}

	/// The two plain lines under the title.
	pub fn detail_lines(&self) -> [String; 2] {
		[
			format!("Type: {}", self.kind),
			format!("Fraud cases: {}", self.fraud_count),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::ForceConfig;
	use crate::components::force_graph::model::normalize;
	use crate::components::force_graph::types::{GraphLink, GraphNode, LinkKind, NodeKind};

	#[test]
	fn truncation_keeps_short_labels() {
		assert_eq!(truncate_label("Device: DEV_X1", 15, 12), "Device: DEV_X1");
		assert_eq!(truncate_label("exactly15chars!", 15, 12), "exactly15chars!");
		assert_eq!(truncate_label("IP: 203.0.113.254", 15, 12), "IP: 203.0.11...");
		assert_eq!(truncate_label("Gerät-äöü-ßßßßßß", 15, 12), "Gerät-äöü-ßß...");
	}

	#[test]
	fn frame_styles_follow_kind_and_strength() {
		let mut ip = GraphNode::new("ip1", NodeKind::Ip);
		ip.size = Some(20.0);
		let mut link = GraphLink::new("ip1", "dev1");
		link.kind = Some(LinkKind::AssetAsset);
		link.strength = Some(1.5);
		let model = normalize(&[ip, GraphNode::new("dev1", NodeKind::Device)], &[link]);
		let sim = Simulation::new(model.nodes, model.links, 800.0, 400.0, ForceConfig::default());

		let theme = Theme::light();
		let render = RenderConfig::default();
		let frame = Frame::build(&sim, ViewTransform::IDENTITY, (800.0, 400.0), &theme, &render);

		assert_eq!(frame.nodes.len(), 2);
		assert_eq!(frame.nodes[0].radius, 20.0);
		assert_eq!(frame.nodes[0].fill, theme.palette.ip);
		assert_eq!(frame.nodes[1].fill, theme.palette.device);
		assert_eq!(frame.nodes[0].stroke_width, 2.0);

		assert_eq!(frame.links.len(), 1);
		assert_eq!(frame.links[0].width, 3.0);
		assert_eq!(frame.links[0].color, theme.edge.asset_asset.with_alpha(0.6));

		let node = &sim.nodes()[0];
		assert_eq!(frame.labels[0].y, node.y + 20.0 + 18.0);
		assert_eq!(frame.labels[0].text, "ip1");
		assert!(frame.placeholder.is_none());
	}

	#[test]
	fn placeholder_frame_has_no_shapes() {
		let render = RenderConfig::default();
		let frame = Frame::placeholder((800.0, 400.0), &Theme::light(), &render);
		assert!(frame.nodes.is_empty() && frame.links.is_empty());
		assert_eq!(
			frame.placeholder.map(|p| p.text),
			Some(render.empty_message)
		);
	}

	#[test]
	fn tooltip_lines() {
		let mut raw = GraphNode::new("DEV_X1", NodeKind::Device);
		raw.label = Some("Device: DEV_X1".into());
		raw.fraud_count = Some(3);
		let model = normalize(&[raw], &[]);

		let tooltip = TooltipContent::for_node(&model.nodes[0]);
		assert_eq!(tooltip.title, "Device: DEV_X1");
		assert_eq!(tooltip.detail_lines(), ["Type: Device".to_string(), "Fraud cases: 3".to_string()]);
	}
}
