//! Force-directed correlation graph of fraud artifacts.
//!
//! Renders IPs, devices, documents and behavior sequences that were seen
//! together in confirmed fraud cases, with:
//! - Link, charge, center and collision forces (Barnes–Hut above a node threshold)
//! - Node dragging with pinning, pan and clamped zoom
//! - Kind-colored nodes, truncated labels and a hover tooltip
//!
//! The layout core (`model`, `simulation`, `interaction`, `scene`,
//! `coordinator`) has no DOM dependency; the browser sits behind
//! [`SurfaceHost`], implemented by [`DomHost`].
//!
//! # Example
//!
//! ```ignore
//! use fraud_graph::{FraudGraph, GraphData};
//!
//! let data = GraphData::from_json(r#"{"nodes": [{"id": "ip1", "type": "ip"}], "links": []}"#)?;
//! view! { <FraudGraph data=Signal::derive(move || data.clone()) /> }
//! ```

mod component;
pub mod config;
mod coordinator;
mod dom;
pub mod error;
pub mod interaction;
pub mod model;
mod quadtree;
mod render;
pub mod scene;
pub mod simulation;
pub mod surface;
pub mod theme;
pub mod transform;
mod types;

pub use component::FraudGraph;
pub use config::{ForceConfig, GraphConfig, RenderConfig, ZoomConfig};
pub use coordinator::{FrameStatus, FrameTicket, GraphView, LoadOutcome};
pub use dom::DomHost;
pub use error::SurfaceError;
pub use interaction::{Command, InputEvent, InteractionState};
pub use surface::SurfaceHost;
pub use theme::Theme;
pub use transform::ViewTransform;
pub use types::{GraphData, GraphLink, GraphNode, GraphStats, LinkEndpoint, LinkKind, NodeKind};
