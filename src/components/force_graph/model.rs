//! Validation and normalization of raw datasets into the simulation arena.
//!
//! Nodes live in a flat `Vec<Node>`; links refer to them by index. Nothing in
//! here can fail: bad input degrades to fewer nodes or links, never an error.

use std::collections::HashMap;

use log::warn;

use super::types::{GraphLink, GraphNode, LinkKind, NodeKind};

/// Index of a node in the arena.
pub type NodeIdx = usize;

/// Visual radius used when a node carries no usable size.
pub const DEFAULT_NODE_SIZE: f64 = 12.0;

/// Strength used when a link carries no usable strength.
pub const DEFAULT_LINK_STRENGTH: f64 = 1.0;

/// A node in the simulation arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	/// Visual radius in world units.
	pub size: f64,
	pub fraud_count: u32,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x coordinate. Overrides integration on this axis while set.
	pub fx: Option<f64>,
	/// Pinned y coordinate.
	pub fy: Option<f64>,
}

impl Node {
	/// Whether either axis is currently pinned.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link between two arena indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIdx,
	pub target: NodeIdx,
	pub kind: LinkKind,
	pub strength: f64,
}

/// Output of [`normalize`].
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
	/// Links dropped because an endpoint id was unknown.
	pub dropped_links: usize,
	/// Node records dropped because their id was already taken.
	pub duplicate_nodes: usize,
}

impl GraphModel {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Validate raw records and resolve link endpoints to arena indices.
///
/// An empty node list yields an empty model (every link counts as dropped).
/// For duplicate ids the first record wins. Links keep their input order.
pub fn normalize(raw_nodes: &[GraphNode], raw_links: &[GraphLink]) -> GraphModel {
	if raw_nodes.is_empty() {
		return GraphModel {
			dropped_links: raw_links.len(),
			..GraphModel::default()
		};
	}

	let mut id_to_idx: HashMap<&str, NodeIdx> = HashMap::with_capacity(raw_nodes.len());
	let mut nodes = Vec::with_capacity(raw_nodes.len());
	let mut duplicate_nodes = 0;

	for raw in raw_nodes {
		if id_to_idx.contains_key(raw.id.as_str()) {
			duplicate_nodes += 1;
			continue;
		}
		id_to_idx.insert(raw.id.as_str(), nodes.len());
		nodes.push(Node {
			id: raw.id.clone(),
			kind: raw.kind,
			label: raw
				.label
				.as_deref()
				.filter(|l| !l.is_empty())
				.unwrap_or(raw.id.as_str())
				.to_string(),
			size: raw
				.size
				.filter(|s| s.is_finite() && *s > 0.0)
				.unwrap_or(DEFAULT_NODE_SIZE),
			fraud_count: raw.fraud_count.unwrap_or(0),
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		});
	}

	let mut links = Vec::with_capacity(raw_links.len());
	let mut dropped_links = 0;
	for raw in raw_links {
		match (
			id_to_idx.get(raw.source.id()),
			id_to_idx.get(raw.target.id()),
		) {
			(Some(&source), Some(&target)) => links.push(Link {
				source,
				target,
				kind: raw.kind.unwrap_or_default(),
				strength: raw
					.strength
					.filter(|s| s.is_finite() && *s > 0.0)
					.unwrap_or(DEFAULT_LINK_STRENGTH),
			}),
			_ => dropped_links += 1,
		}
	}

	if duplicate_nodes > 0 {
		warn!("fraud-graph: ignored {} nodes with duplicate ids", duplicate_nodes);
	}
	if dropped_links > 0 {
		warn!(
			"fraud-graph: dropped {} links with unknown endpoints",
			dropped_links
		);
	}

	GraphModel {
		nodes,
		links,
		dropped_links,
		duplicate_nodes,
	}
}
