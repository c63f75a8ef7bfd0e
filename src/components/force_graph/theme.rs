//! Visual theming for the correlation graph.
//!
//! Node and link colors are keyed by kind so an analyst can read the category
//! of an artifact at a glance; the per-kind palette is the same in every theme.

use log::warn;

use super::types::{LinkKind, NodeKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill color per node kind.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePalette {
	pub ip: Color,
	pub device: Color,
	pub doc: Color,
	pub sequence: Color,
	pub other: Color,
}

impl NodePalette {
	/// Red IPs, blue devices, amber documents, green sequences, gray for the rest.
	pub fn fraud() -> Self {
		Self {
			ip: Color::rgb(0xef, 0x44, 0x44),
			device: Color::rgb(0x3b, 0x82, 0xf6),
			doc: Color::rgb(0xf5, 0x9e, 0x0b),
			sequence: Color::rgb(0x10, 0xb9, 0x81),
			other: Color::rgb(0x6b, 0x72, 0x80),
		}
	}

	pub fn get(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Ip => self.ip,
			NodeKind::Device => self.device,
			NodeKind::Doc => self.doc,
			NodeKind::Sequence => self.sequence,
			NodeKind::Other => self.other,
		}
	}
}

/// Link stroke color per link kind.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub asset_asset: Color,
	pub other: Color,
}

impl EdgeStyle {
	pub fn get(&self, kind: LinkKind) -> Color {
		match kind {
			LinkKind::AssetAsset => self.asset_asset,
			LinkKind::Other => self.other,
		}
	}
}

/// Node visual style.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Stroke drawn around every node
	pub border_color: Color,
	/// Label text under each node
	pub label_color: Color,
}

/// Hover tooltip overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipStyle {
	pub background: Color,
	pub text: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	/// Empty-state message color
	pub placeholder: Color,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub tooltip: TooltipStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// White canvas, dark labels (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(255, 255, 255),
			placeholder: Color::rgb(0x66, 0x66, 0x66),
			edge: EdgeStyle {
				asset_asset: Color::rgb(0x94, 0xa3, 0xb8),
				other: Color::rgb(0xcb, 0xd5, 0xe1),
			},
			node: NodeStyle {
				border_color: Color::rgb(255, 255, 255),
				label_color: Color::rgb(0x1f, 0x29, 0x37),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(0, 0, 0, 0.8),
				text: Color::rgb(255, 255, 255),
			},
			palette: NodePalette::fraud(),
		}
	}

	/// Dark canvas for control-room screens
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Color::rgb(18, 20, 28),
			placeholder: Color::rgb(140, 150, 165),
			edge: EdgeStyle {
				asset_asset: Color::rgb(100, 120, 150),
				other: Color::rgb(60, 72, 92),
			},
			node: NodeStyle {
				border_color: Color::rgb(18, 20, 28),
				label_color: Color::rgb(210, 215, 225),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(240, 242, 246, 0.92),
				text: Color::rgb(18, 20, 28),
			},
			palette: NodePalette::fraud(),
		}
	}

	/// Look up a preset by name, falling back to [`Theme::light`].
	pub fn named(name: &str) -> Self {
		match name {
			"light" | "" => Self::light(),
			"midnight" => Self::midnight(),
			other => {
				warn!("fraud-graph: unknown theme {:?}, using light", other);
				Self::light()
			}
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_serialisation() {
		assert_eq!(Color::rgb(0xef, 0x44, 0x44).to_css(), "#ef4444");
		assert_eq!(
			Color::rgb(0, 0, 0).with_alpha(0.8).to_css(),
			"rgba(0, 0, 0, 0.8)"
		);
	}

	#[test]
	fn palette_is_keyed_by_kind() {
		let theme = Theme::default();
		assert_eq!(theme.palette.get(NodeKind::Device).to_css(), "#3b82f6");
		assert_eq!(theme.palette.get(NodeKind::Sequence).to_css(), "#10b981");
		assert_eq!(theme.edge.get(LinkKind::AssetAsset).to_css(), "#94a3b8");
		assert_eq!(theme.edge.get(LinkKind::Other).to_css(), "#cbd5e1");
	}

	#[test]
	fn unknown_names_fall_back_to_light() {
		assert_eq!(Theme::named("midnight").name, "midnight");
		assert_eq!(Theme::named("neon"), Theme::light());
	}
}
