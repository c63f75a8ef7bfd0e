//! Tunable parameters for layout, zoom and drawing.
//!
//! Every value has a default matching the reference behavior of the fraud
//! correlation view, so an empty `{}` (or no config at all) reproduces it.
//! All structs deserialize with `#[serde(default)]`; a partial config only
//! overrides the fields it names.

use serde::Deserialize;

use super::types::LinkKind;

/// Force model parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Rest length of `asset-asset` links.
	pub asset_link_distance: f64,
	/// Rest length of every other link.
	pub link_distance: f64,
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Barnes–Hut opening criterion. `0.0` forces exact summation.
	pub charge_theta: f64,
	/// Distance below which charge stops growing, avoiding blow-ups.
	pub charge_distance_min: f64,
	/// Node count above which charge switches from direct summation to the quadtree.
	pub barnes_hut_threshold: usize,
	/// Fraction of the centroid offset removed each tick.
	pub center_strength: f64,
	/// Added to a node's size to get its collision radius.
	pub collision_padding: f64,
	pub collision_strength: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// `alpha_target` while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Radius scale of the initial phyllotaxis placement.
	pub initial_radius: f64,
}

impl ForceConfig {
	/// Rest length for a link of the given kind.
	pub fn link_distance_for(&self, kind: LinkKind) -> f64 {
		match kind {
			LinkKind::AssetAsset => self.asset_link_distance,
			LinkKind::Other => self.link_distance,
		}
	}
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			asset_link_distance: 150.0,
			link_distance: 100.0,
			charge_strength: -400.0,
			charge_theta: 0.9,
			charge_distance_min: 1.0,
			barnes_hut_threshold: 300,
			center_strength: 1.0,
			collision_padding: 5.0,
			collision_strength: 1.0,
			velocity_decay: 0.4,
			alpha_min,
			// Reaches alpha_min after ~300 ticks from alpha = 1.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
			initial_radius: 10.0,
		}
	}
}

/// Pan/zoom limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Exponent applied per pixel of wheel delta: `k *= 2^(-delta * sensitivity)`.
	pub wheel_sensitivity: f64,
}

impl ZoomConfig {
	/// Clamp a scale into `[min_scale, max_scale]`. NaN maps to 1.0 (clamped).
	pub fn clamp(&self, k: f64) -> f64 {
		let k = if k.is_nan() { 1.0 } else { k };
		// Not f64::clamp: a config with min > max must not panic.
		k.max(self.min_scale).min(self.max_scale)
	}
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.2,
			max_scale: 4.0,
			wheel_sensitivity: 0.002,
		}
	}
}

/// Drawing parameters that are not colors (colors live in the theme).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
	/// Labels longer than this many characters are truncated.
	pub label_max_chars: usize,
	/// Characters kept before the ellipsis when truncating.
	pub label_keep_chars: usize,
	/// Distance below the node edge to the label baseline.
	pub label_offset: f64,
	pub label_font: String,
	/// Link stroke width per unit of link strength.
	pub link_width_per_strength: f64,
	pub link_opacity: f64,
	pub node_stroke_width: f64,
	/// Tooltip offset from the pointer, in screen pixels.
	pub tooltip_offset: (f64, f64),
	pub empty_message: String,
	pub placeholder_font: String,
	/// Canvas size used when the container reports a zero dimension.
	pub fallback_width: f64,
	pub fallback_height: f64,
	/// Extra hit radius around nodes, in world units.
	pub hit_padding: f64,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			label_max_chars: 15,
			label_keep_chars: 12,
			label_offset: 18.0,
			label_font: "500 11px sans-serif".into(),
			link_width_per_strength: 2.0,
			link_opacity: 0.6,
			node_stroke_width: 2.0,
			tooltip_offset: (10.0, -10.0),
			empty_message: "No data to display. Record a confirmed fraud case first.".into(),
			placeholder_font: "16px sans-serif".into(),
			fallback_width: 800.0,
			fallback_height: 400.0,
			hit_padding: 0.0,
		}
	}
}

/// Complete configuration for a graph view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub forces: ForceConfig,
	pub zoom: ZoomConfig,
	pub render: RenderConfig,
	/// Theme preset name, see [`super::theme::Theme::named`].
	pub theme: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			forces: ForceConfig::default(),
			zoom: ZoomConfig::default(),
			render: RenderConfig::default(),
			theme: "light".into(),
		}
	}
}
