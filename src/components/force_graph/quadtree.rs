//! Barnes–Hut quadtree for the many-body (charge) force.
//!
//! Cells are stored in a flat arena; children are always allocated after their
//! parent, so aggregating counts and centroids is a single reverse pass.

use super::simulation::{Jiggle, repulsion};

/// Coincident points stop subdividing past this depth and share a leaf.
const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug)]
struct Cell {
	x0: f64,
	y0: f64,
	size: f64,
	children: Option<[usize; 4]>,
	points: Vec<usize>,
	count: usize,
	cx: f64,
	cy: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			children: None,
			points: Vec::new(),
			count: 0,
			cx: 0.0,
			cy: 0.0,
		}
	}

	fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x0 && x <= self.x0 + self.size && y >= self.y0 && y <= self.y0 + self.size
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		let right = x >= self.x0 + half;
		let bottom = y >= self.y0 + half;
		(bottom as usize) << 1 | right as usize
	}
}

/// Spatial index over a snapshot of node positions.
#[derive(Clone, Debug)]
pub struct QuadTree {
	cells: Vec<Cell>,
}

impl QuadTree {
	/// Build a tree over `points` (index = node index).
	pub fn build(points: &[(f64, f64)]) -> Self {
		if points.is_empty() {
			return Self { cells: Vec::new() };
		}

		let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
		let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		let size = (x1 - x0).max(y1 - y0).max(1.0);

		let mut tree = Self {
			cells: vec![Cell::new(x0, y0, size)],
		};
		for i in 0..points.len() {
			tree.insert(0, i, points, 0);
		}
		tree.aggregate(points);
		tree
	}

	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	fn insert(&mut self, cell: usize, point: usize, points: &[(f64, f64)], depth: usize) {
		let (x, y) = points[point];
		if let Some(children) = self.cells[cell].children {
			let q = self.cells[cell].quadrant(x, y);
			self.insert(children[q], point, points, depth + 1);
			return;
		}

		let leaf = &mut self.cells[cell];
		let coincident = leaf.points.first().is_some_and(|&p| points[p] == (x, y));
		if leaf.points.is_empty() || coincident || depth >= MAX_DEPTH {
			leaf.points.push(point);
			return;
		}

		let existing = std::mem::take(&mut leaf.points);
		let (cx0, cy0, half) = (leaf.x0, leaf.y0, leaf.size / 2.0);
		let base = self.cells.len();
		self.cells.push(Cell::new(cx0, cy0, half));
		self.cells.push(Cell::new(cx0 + half, cy0, half));
		self.cells.push(Cell::new(cx0, cy0 + half, half));
		self.cells.push(Cell::new(cx0 + half, cy0 + half, half));
		self.cells[cell].children = Some([base, base + 1, base + 2, base + 3]);

		for p in existing {
			self.insert(cell, p, points, depth);
		}
		self.insert(cell, point, points, depth);
	}

	fn aggregate(&mut self, points: &[(f64, f64)]) {
		for c in (0..self.cells.len()).rev() {
			let (count, sx, sy) = match self.cells[c].children {
				Some(children) => children.iter().fold((0, 0.0, 0.0), |(n, sx, sy), &ch| {
					let child = &self.cells[ch];
					let w = child.count as f64;
					(n + child.count, sx + child.cx * w, sy + child.cy * w)
				}),
				None => self.cells[c].points.iter().fold((0, 0.0, 0.0), |(n, sx, sy), &p| {
					(n + 1, sx + points[p].0, sy + points[p].1)
				}),
			};
			let cell = &mut self.cells[c];
			cell.count = count;
			if count > 0 {
				cell.cx = sx / count as f64;
				cell.cy = sy / count as f64;
			}
		}
	}

	/// Velocity change on node `i` from every other point.
	///
	/// `strength_alpha` is the per-node charge already multiplied by alpha.
	/// Cells that do not contain `i` and satisfy `size² / theta² < distance²`
	/// are treated as a single aggregate charge at their centroid.
	pub fn apply(
		&self,
		i: usize,
		points: &[(f64, f64)],
		strength_alpha: f64,
		theta2: f64,
		distance_min2: f64,
		jiggle: &mut Jiggle,
	) -> (f64, f64) {
		let (xi, yi) = points[i];
		let (mut vx, mut vy) = (0.0, 0.0);
		let mut stack = Vec::new();
		if !self.is_empty() {
			stack.push(0);
		}

		while let Some(c) = stack.pop() {
			let cell = &self.cells[c];
			if cell.count == 0 {
				continue;
			}
			match cell.children {
				Some(children) => {
					let (dx, dy) = (cell.cx - xi, cell.cy - yi);
					let l = dx * dx + dy * dy;
					if !cell.contains(xi, yi) && cell.size * cell.size / theta2 < l {
						let (ax, ay) = repulsion(
							dx,
							dy,
							strength_alpha * cell.count as f64,
							distance_min2,
							jiggle,
						);
						vx += ax;
						vy += ay;
					} else {
						stack.extend_from_slice(&children);
					}
				}
				None => {
					for &j in &cell.points {
						if j == i {
							continue;
						}
						let (ax, ay) = repulsion(
							points[j].0 - xi,
							points[j].1 - yi,
							strength_alpha,
							distance_min2,
							jiggle,
						);
						vx += ax;
						vy += ay;
					}
				}
			}
		}

		(vx, vy)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scattered(n: usize) -> Vec<(f64, f64)> {
		(0..n)
			.map(|i| {
				let t = i as f64;
				((t * 37.0) % 401.0 + (t * 0.13).sin() * 9.0, (t * 91.0) % 397.0)
			})
			.collect()
	}

	fn direct(i: usize, points: &[(f64, f64)], strength_alpha: f64) -> (f64, f64) {
		let mut jiggle = Jiggle::default();
		points
			.iter()
			.enumerate()
			.filter(|&(j, _)| j != i)
			.fold((0.0, 0.0), |(vx, vy), (_, &(x, y))| {
				let (ax, ay) = repulsion(
					x - points[i].0,
					y - points[i].1,
					strength_alpha,
					1.0,
					&mut jiggle,
				);
				(vx + ax, vy + ay)
			})
	}

	#[test]
	fn zero_theta_matches_direct_summation() {
		let points = scattered(120);
		let tree = QuadTree::build(&points);
		let mut jiggle = Jiggle::default();

		for i in [0, 17, 64, 119] {
			let (tx, ty) = tree.apply(i, &points, -400.0, 0.0, 1.0, &mut jiggle);
			let (dx, dy) = direct(i, &points, -400.0);
			assert!((tx - dx).abs() < 1e-9, "node {i}: {tx} vs {dx}");
			assert!((ty - dy).abs() < 1e-9, "node {i}: {ty} vs {dy}");
		}
	}

	#[test]
	fn approximation_stays_close_to_direct_summation() {
		let points = scattered(400);
		let tree = QuadTree::build(&points);
		let mut jiggle = Jiggle::default();

		let (mut error, mut total) = (0.0, 0.0);
		for i in 0..points.len() {
			let (tx, ty) = tree.apply(i, &points, -400.0, 0.5 * 0.5, 1.0, &mut jiggle);
			let (dx, dy) = direct(i, &points, -400.0);
			error += ((tx - dx).powi(2) + (ty - dy).powi(2)).sqrt();
			total += (dx * dx + dy * dy).sqrt();
		}
		assert!(error / total < 0.05, "relative error {}", error / total);
	}

	#[test]
	fn coincident_points_share_a_leaf() {
		let points = vec![(5.0, 5.0); 4];
		let tree = QuadTree::build(&points);
		assert_eq!(tree.cells.len(), 1);
		assert_eq!(tree.cells[0].count, 4);

		let mut jiggle = Jiggle::default();
		let (vx, vy) = tree.apply(0, &points, -400.0, 0.81, 1.0, &mut jiggle);
		assert!(vx.is_finite() && vy.is_finite());
	}

	#[test]
	fn empty_tree_applies_nothing() {
		let tree = QuadTree::build(&[]);
		assert!(tree.is_empty());
	}
}
