//! Dataset structures received from the risk-scoring backend.
//!
//! These mirror the JSON payload as delivered: ids are plain strings, optional
//! fields stay optional, and nothing is validated here. Validation and defaults
//! happen in [`super::model::normalize`].

use serde::{Deserialize, Deserializer};

/// Category of a correlated artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// IP address seen on a confirmed fraud case.
	Ip,
	/// Device identifier.
	Device,
	/// Document hash.
	Doc,
	/// Behavioral-sequence pattern.
	Sequence,
	/// Anything the backend sends that is not one of the above.
	#[default]
	#[serde(other)]
	Other,
}

impl NodeKind {
	/// All kinds in legend order.
	pub const ALL: [NodeKind; 5] = [
		NodeKind::Ip,
		NodeKind::Device,
		NodeKind::Doc,
		NodeKind::Sequence,
		NodeKind::Other,
	];

	/// Human-readable name shown in the tooltip and legend.
	pub fn display_name(self) -> &'static str {
		match self {
			NodeKind::Ip => "IP address",
			NodeKind::Device => "Device",
			NodeKind::Doc => "Document",
			NodeKind::Sequence => "Behavior sequence",
			NodeKind::Other => "Other",
		}
	}
}

/// Relationship category of a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum LinkKind {
	/// Two assets that appeared together in the same fraud case.
	#[serde(rename = "asset-asset")]
	AssetAsset,
	#[default]
	#[serde(other)]
	Other,
}

/// A node record as sent by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Links refer to nodes by this id.
	pub id: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	/// Display label; the id is shown when absent.
	#[serde(default)]
	pub label: Option<String>,
	/// Visual radius in world units.
	#[serde(default)]
	pub size: Option<f64>,
	/// Number of confirmed fraud cases this artifact appeared in.
	#[serde(default)]
	pub fraud_count: Option<u32>,
}

impl GraphNode {
	/// Convenience constructor for a node with only an id and kind.
	pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			kind,
			label: None,
			size: None,
			fraud_count: None,
		}
	}
}

/// Endpoint of a link: either a bare node id or an embedded node object.
///
/// Payloads that were already passed through a layout engine carry the whole
/// node object instead of its id; only the `id` field of such objects is read.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
	Id(String),
	Node { id: String },
}

impl LinkEndpoint {
	/// The node id this endpoint refers to.
	pub fn id(&self) -> &str {
		match self {
			LinkEndpoint::Id(id) | LinkEndpoint::Node { id } => id,
		}
	}
}

impl From<&str> for LinkEndpoint {
	fn from(id: &str) -> Self {
		LinkEndpoint::Id(id.to_string())
	}
}

/// A link record as sent by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	pub source: LinkEndpoint,
	pub target: LinkEndpoint,
	#[serde(rename = "type", default)]
	pub kind: Option<LinkKind>,
	#[serde(default)]
	pub strength: Option<f64>,
}

impl GraphLink {
	/// A link between two ids with every optional field left unset.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: LinkEndpoint::Id(source.into()),
			target: LinkEndpoint::Id(target.into()),
			kind: None,
			strength: None,
		}
	}
}

/// Aggregate counters shown next to the graph. Passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphStats {
	#[serde(default)]
	pub total_ips: u64,
	#[serde(default)]
	pub total_devices: u64,
	#[serde(default)]
	pub total_docs: u64,
	#[serde(default)]
	pub total_fraud_cases: u64,
}

/// Complete dataset: nodes, links and optional stats.
///
/// Missing or `null` node/link arrays deserialize as empty, so a malformed
/// payload degrades to the empty-graph state instead of failing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default, deserialize_with = "null_as_empty")]
	pub nodes: Vec<GraphNode>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub links: Vec<GraphLink>,
	#[serde(default)]
	pub stats: Option<GraphStats>,
}

impl GraphData {
	/// Parse a dataset from its JSON text.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_backend_payload() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{"id": "45.55.100.1", "label": "IP: 45.55.100.1", "type": "ip", "fraud_count": 2, "size": 14},
					{"id": "DEV_X1", "label": "Device: DEV_X1", "type": "device"}
				],
				"links": [
					{"source": "45.55.100.1", "target": "DEV_X1", "type": "asset-asset", "strength": 1}
				],
				"stats": {"total_ips": 1, "total_devices": 1, "total_docs": 0, "total_fraud_cases": 2}
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].kind, NodeKind::Ip);
		assert_eq!(data.nodes[0].fraud_count, Some(2));
		assert_eq!(data.nodes[1].size, None);
		assert_eq!(data.links[0].kind, Some(LinkKind::AssetAsset));
		assert_eq!(data.stats.unwrap().total_fraud_cases, 2);
	}

	#[test]
	fn missing_or_null_arrays_are_empty() {
		let data = GraphData::from_json(r#"{"links": null}"#).unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
		assert!(data.stats.is_none());
	}

	#[test]
	fn unknown_kinds_fall_back_to_other() {
		let data = GraphData::from_json(
			r#"{"nodes": [{"id": "x", "type": "email"}, {"id": "y"}],
				"links": [{"source": "x", "target": "y", "type": "asset-sequence"}]}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].kind, NodeKind::Other);
		assert_eq!(data.nodes[1].kind, NodeKind::Other);
		assert_eq!(data.links[0].kind, Some(LinkKind::Other));
	}

	#[test]
	fn endpoints_accept_embedded_nodes() {
		let data = GraphData::from_json(
			r#"{"nodes": [], "links": [{"source": {"id": "a", "x": 3.5}, "target": "b"}]}"#,
		)
		.unwrap();
		assert_eq!(data.links[0].source.id(), "a");
		assert_eq!(data.links[0].target, LinkEndpoint::from("b"));
	}
}
