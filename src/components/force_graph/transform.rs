//! Pan/zoom transform between world (simulation) and screen coordinates.

use super::config::ZoomConfig;

/// `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Translate by a screen-space delta.
	pub fn panned(self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			k: self.k,
		}
	}

	/// Zoom around the screen point `(sx, sy)`, keeping the world point under it fixed.
	///
	/// Positive `delta_y` (wheel down) zooms out. The new scale is clamped into
	/// the configured range; a clamped zoom still keeps the anchor fixed.
	pub fn zoomed_at(self, sx: f64, sy: f64, delta_y: f64, zoom: &ZoomConfig) -> Self {
		let factor = 2f64.powf(-delta_y * zoom.wheel_sensitivity);
		self.scaled_at(sx, sy, self.k * factor, zoom)
	}

	/// Set the scale to `k` (clamped) around the screen point `(sx, sy)`.
	pub fn scaled_at(self, sx: f64, sy: f64, k: f64, zoom: &ZoomConfig) -> Self {
		let new_k = zoom.clamp(k);
		let ratio = new_k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k: new_k,
		}
	}

	/// The same transform with its scale forced into range.
	pub fn clamped(self, zoom: &ZoomConfig) -> Self {
		Self {
			k: zoom.clamp(self.k),
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_and_world_are_inverse() {
		let t = ViewTransform {
			x: 40.0,
			y: -12.0,
			k: 2.5,
		};
		let (wx, wy) = t.screen_to_world(300.0, 150.0);
		let (sx, sy) = t.world_to_screen(wx, wy);
		assert!((sx - 300.0).abs() < 1e-9);
		assert!((sy - 150.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_the_anchor_fixed() {
		let zoom = ZoomConfig::default();
		let t = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 1.0,
		};
		let before = t.screen_to_world(200.0, 100.0);
		let z = t.zoomed_at(200.0, 100.0, -120.0, &zoom);
		assert!(z.k > 1.0);
		let after = z.screen_to_world(200.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn zoom_is_clamped() {
		let zoom = ZoomConfig::default();
		let mut t = ViewTransform::IDENTITY;
		for _ in 0..200 {
			t = t.zoomed_at(0.0, 0.0, -500.0, &zoom);
		}
		assert_eq!(t.k, 4.0);
		for _ in 0..200 {
			t = t.zoomed_at(0.0, 0.0, 500.0, &zoom);
		}
		assert_eq!(t.k, 0.2);
	}

	#[test]
	fn pan_moves_only_the_offset() {
		let t = ViewTransform::IDENTITY.panned(5.0, -7.0);
		assert_eq!(t, ViewTransform { x: 5.0, y: -7.0, k: 1.0 });
	}
}
