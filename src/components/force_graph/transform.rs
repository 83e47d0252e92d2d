//! Pan/zoom state and screen <-> world mapping.

use super::graph::Point;

/// Smallest allowed scale.
pub const ZOOM_MIN: f64 = 0.1;
/// Largest allowed scale.
pub const ZOOM_MAX: f64 = 5.0;

/// Maps world coordinates to screen coordinates as `screen = world * k + (x, y)`.
///
/// The scale is kept within [`ZOOM_MIN`, `ZOOM_MAX`] by the only two mutators,
/// [`ViewTransform::apply_zoom`] and [`ViewTransform::apply_pan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	x: f64,
	y: f64,
	k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Horizontal screen offset.
	pub fn x(&self) -> f64 {
		self.x
	}

	/// Vertical screen offset.
	pub fn y(&self) -> f64 {
		self.y
	}

	/// Scale factor.
	pub fn k(&self) -> f64 {
		self.k
	}

	/// Inverse of [`ViewTransform::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> Point {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Where a world point is drawn.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> Point {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Sets the scale to `new_k` (clamped) while keeping the world point under
	/// `anchor` fixed on screen.
	pub fn apply_zoom(&mut self, anchor: Point, new_k: f64) {
		if !new_k.is_finite() {
			return;
		}
		let (wx, wy) = self.screen_to_world(anchor.0, anchor.1);
		self.k = new_k.clamp(ZOOM_MIN, ZOOM_MAX);
		self.x = anchor.0 - wx * self.k;
		self.y = anchor.1 - wy * self.k;
	}

	/// Translates by a screen-space delta; not scaled by `k`.
	pub fn apply_pan(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.x += dx;
			self.y += dy;
		}
	}
}
