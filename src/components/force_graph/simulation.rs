//! Force-directed layout engine.
//!
//! A velocity-Verlet style integrator over four forces: link springs, many-body
//! charge, centering and collision. The simulation "energy" `alpha` decays
//! geometrically toward `alpha_target`; once it falls under `alpha_min` the
//! simulation reports itself settled and [`Simulation::step`] stops advancing
//! until something reheats it.
//!
//! Each tick runs in a fixed order:
//! 1. decay `alpha`
//! 2. link, charge, center and collision forces (velocities / positions)
//! 3. integrate: pinned axes snap to their pin, free axes apply damped velocity

use std::f64::consts::PI;

use log::debug;

use super::config::ForceConfig;
use super::model::{Link, Node, NodeIdx};
use super::quadtree::QuadTree;

/// Deterministic tiny perturbation used to separate coincident points.
#[derive(Clone, Debug, Default)]
pub(crate) struct Jiggle {
	seed: f64,
}

impl Jiggle {
	pub(crate) fn next(&mut self) -> f64 {
		self.seed += 1.0;
		let x = (self.seed * 12.9898 + self.seed * 78.233).sin() * 43758.5453;
		let v = (x - x.floor() - 0.5) * 1e-6;
		if v == 0.0 { 1e-7 } else { v }
	}
}

/// Velocity change toward `(dx, dy)` for an inverse-distance charge.
///
/// Negative `strength_alpha` repels. Distances under `sqrt(distance_min2)` are
/// softened so the result stays bounded.
pub(crate) fn repulsion(
	dx: f64,
	dy: f64,
	strength_alpha: f64,
	distance_min2: f64,
	jiggle: &mut Jiggle,
) -> (f64, f64) {
	let dx = if dx == 0.0 { jiggle.next() } else { dx };
	let dy = if dy == 0.0 { jiggle.next() } else { dy };
	let mut l = dx * dx + dy * dy;
	if l < distance_min2 {
		l = (distance_min2 * l).sqrt();
	}
	let w = strength_alpha / l;
	(dx * w, dy * w)
}

/// Golden-angle increment for the initial phyllotaxis placement.
fn initial_angle() -> f64 {
	PI * (3.0 - 5.0f64.sqrt())
}

/// The layout engine. Owns the node and link arenas for one dataset.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<Node>,
	links: Vec<Link>,
	forces: ForceConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	/// Per link: share of the correction applied to the target.
	link_bias: Vec<f64>,
	/// Per link: spring constant, `1 / min(degree(source), degree(target))`.
	link_spring: Vec<f64>,
	jiggle: Jiggle,
}

impl Simulation {
	/// Seed a simulation for a canvas of `width` × `height`.
	///
	/// Nodes are placed on a phyllotaxis spiral around the canvas center with
	/// zero velocity; `alpha` starts at 1.
	pub fn new(
		mut nodes: Vec<Node>,
		links: Vec<Link>,
		width: f64,
		height: f64,
		forces: ForceConfig,
	) -> Self {
		let center = (width / 2.0, height / 2.0);
		for (i, node) in nodes.iter_mut().enumerate() {
			let radius = forces.initial_radius * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle();
			node.x = center.0 + radius * angle.cos();
			node.y = center.1 + radius * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}

		let mut degree = vec![0usize; nodes.len()];
		for link in &links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_bias = links
			.iter()
			.map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
			.collect();
		let link_spring = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
			.collect();

		Self {
			running: !nodes.is_empty(),
			nodes,
			links,
			forces,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			ticks: 0,
			link_bias,
			link_spring,
			jiggle: Jiggle::default(),
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn alpha_min(&self) -> f64 {
		self.forces.alpha_min
	}

	/// Whether [`Simulation::step`] will advance on its next call.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Number of ticks performed since creation.
	pub fn tick_count(&self) -> u64 {
		self.ticks
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Move the point the center force pulls toward (canvas resize).
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Set `alpha_target`. Raising it above `alpha_min` resumes a settled simulation.
	pub fn reheat(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
		if self.alpha_target > self.forces.alpha_min && !self.nodes.is_empty() {
			self.running = true;
		}
	}

	/// Set the current energy directly, resuming if it is at least `alpha_min`.
	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
		self.running = self.alpha >= self.forces.alpha_min && !self.nodes.is_empty();
	}

	/// Halt scheduling. Positions are left as they are.
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Pin a node at `(x, y)`. The node jumps there immediately.
	pub fn pin(&mut self, idx: NodeIdx, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Release a pinned node back to the integrator.
	pub fn unpin(&mut self, idx: NodeIdx) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Topmost node whose disc (radius `size + padding`) contains the world point.
	///
	/// Later nodes are drawn over earlier ones, so the search runs backwards.
	pub fn find(&self, x: f64, y: f64, padding: f64) -> Option<NodeIdx> {
		self.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - x, node.y - y);
			let r = node.size + padding;
			dx * dx + dy * dy <= r * r
		})
	}

	/// Advance one tick if the simulation is running.
	///
	/// Returns whether a tick happened. Marks the simulation settled once
	/// `alpha` drops under `alpha_min`.
	pub fn step(&mut self) -> bool {
		if !self.running || self.nodes.is_empty() {
			return false;
		}
		self.tick();
		if self.alpha < self.forces.alpha_min {
			self.running = false;
			debug!("fraud-graph: simulation settled after {} ticks", self.ticks);
		}
		true
	}

	/// Advance exactly one tick, regardless of the running state.
	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.forces.alpha_decay;
		self.alpha = self.alpha.clamp(0.0, 1.0);

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();
		self.integrate();

		self.ticks += 1;
	}

	fn apply_links(&mut self) {
		for (i, link) in self.links.iter().enumerate() {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.jiggle.next();
			}
			if y == 0.0 {
				y = self.jiggle.next();
			}
			let l = (x * x + y * y).sqrt();
			let distance = self.forces.link_distance_for(link.kind);
			let k = (l - distance) / l * self.alpha * self.link_spring[i];
			x *= k;
			y *= k;

			// A pinned endpoint cannot move, so its share goes to the other one.
			let bias = match (s.is_pinned(), t.is_pinned()) {
				(true, false) => 1.0,
				(false, true) => 0.0,
				_ => self.link_bias[i],
			};

			let target = &mut self.nodes[link.target];
			target.vx -= x * bias;
			target.vy -= y * bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - bias);
			source.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength_alpha = self.forces.charge_strength * self.alpha;
		if strength_alpha == 0.0 || self.nodes.len() < 2 {
			return;
		}
		let points: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
		let distance_min2 = self.forces.charge_distance_min.powi(2);

		if points.len() > self.forces.barnes_hut_threshold {
			let tree = QuadTree::build(&points);
			let theta2 = self.forces.charge_theta.powi(2);
			for i in 0..points.len() {
				let (vx, vy) = tree.apply(
					i,
					&points,
					strength_alpha,
					theta2,
					distance_min2,
					&mut self.jiggle,
				);
				self.nodes[i].vx += vx;
				self.nodes[i].vy += vy;
			}
		} else {
			for i in 0..points.len() {
				let (xi, yi) = points[i];
				let (mut vx, mut vy) = (0.0, 0.0);
				for (j, &(xj, yj)) in points.iter().enumerate() {
					if i == j {
						continue;
					}
					let (ax, ay) = repulsion(
						xj - xi,
						yj - yi,
						strength_alpha,
						distance_min2,
						&mut self.jiggle,
					);
					vx += ax;
					vy += ay;
				}
				self.nodes[i].vx += vx;
				self.nodes[i].vy += vy;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let dx = (sx / n - self.center.0) * self.forces.center_strength;
		let dy = (sy / n - self.center.1) * self.forces.center_strength;
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn apply_collision(&mut self) {
		let padding = self.forces.collision_padding;
		let strength = self.forces.collision_strength;
		let n = self.nodes.len();

		for i in 0..n {
			let ri = self.nodes[i].size + padding;
			let ri2 = ri * ri;
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;

			for j in (i + 1)..n {
				let other = &self.nodes[j];
				let rj = other.size + padding;
				let r = ri + rj;
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.jiggle.next();
					l += x * x;
				}
				if y == 0.0 {
					y = self.jiggle.next();
					l += y * y;
				}
				let d = l.sqrt();
				let k = (r - d) / d * strength;
				x *= k;
				y *= k;

				let rj2 = rj * rj;
				let share = match (self.nodes[i].is_pinned(), other.is_pinned()) {
					(true, false) => 0.0,
					(false, true) => 1.0,
					_ => rj2 / (ri2 + rj2),
				};
				let a = &mut self.nodes[i];
				a.vx += x * share;
				a.vy += y * share;
				let b = &mut self.nodes[j];
				b.vx -= x * (1.0 - share);
				b.vy -= y * (1.0 - share);
			}
		}
	}

	fn integrate(&mut self) {
		let retain = 1.0 - self.forces.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= retain;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= retain;
					node.y += node.vy;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::normalize;
	use crate::components::force_graph::types::{GraphLink, GraphNode, LinkKind, NodeKind};

	fn simulation(ids: &[&str], links: &[(&str, &str)], forces: ForceConfig) -> Simulation {
		let nodes: Vec<GraphNode> = ids
			.iter()
			.map(|id| GraphNode::new(*id, NodeKind::Device))
			.collect();
		let links: Vec<GraphLink> = links.iter().map(|(s, t)| GraphLink::new(*s, *t)).collect();
		let model = normalize(&nodes, &links);
		Simulation::new(model.nodes, model.links, 800.0, 400.0, forces)
	}

	fn run_to_rest(sim: &mut Simulation) -> u64 {
		let mut guard = 0;
		while sim.step() {
			guard += 1;
			assert!(guard < 10_000, "simulation never settled");
		}
		sim.tick_count()
	}

	fn distance(a: &Node, b: &Node) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn empty_simulation_never_ticks() {
		let mut sim = Simulation::new(Vec::new(), Vec::new(), 800.0, 400.0, ForceConfig::default());
		assert!(!sim.is_running());
		assert!(!sim.step());
		sim.tick();
		sim.reheat(0.3);
		assert!(!sim.step());
		assert_eq!(sim.tick_count(), 0);
	}

	#[test]
	fn alpha_decays_monotonically_within_bounds() {
		let mut sim = simulation(&["a", "b", "c"], &[("a", "b")], ForceConfig::default());
		let mut previous = sim.alpha();
		while sim.step() {
			assert!(sim.alpha() < previous);
			assert!((0.0..=1.0).contains(&sim.alpha()));
			previous = sim.alpha();
		}
	}

	#[test]
	fn static_graph_converges() {
		let ids = ["ip1", "ip2", "dev1", "dev2", "dev3", "doc1", "seq1", "seq2"];
		let links = [
			("ip1", "dev1"),
			("ip1", "dev2"),
			("ip2", "dev2"),
			("ip2", "dev3"),
			("dev1", "doc1"),
			("dev3", "seq1"),
		];
		let mut sim = simulation(&ids, &links, ForceConfig::default());

		let mut last_move: f64 = 0.0;
		while sim.is_running() {
			let last_positions: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
			sim.step();
			last_move = sim
				.nodes()
				.iter()
				.zip(&last_positions)
				.map(|(n, &(x, y))| ((n.x - x).powi(2) + (n.y - y).powi(2)).sqrt())
				.fold(0.0, f64::max);
		}

		assert!(sim.tick_count() <= 400, "took {} ticks", sim.tick_count());
		assert!(sim.alpha() < sim.alpha_min());
		assert!(last_move < 0.5, "still moving {last_move} per tick");

		let settled: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert!(!sim.step());
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(settled, after);
	}

	fn settled_pair_distance(kind: LinkKind) -> f64 {
		let forces = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = simulation(&["a", "b"], &[("a", "b")], forces);
		sim.links[0].kind = kind;
		run_to_rest(&mut sim);
		distance(&sim.nodes()[0], &sim.nodes()[1])
	}

	#[test]
	fn links_settle_near_their_rest_length() {
		let asset = settled_pair_distance(LinkKind::AssetAsset);
		let other = settled_pair_distance(LinkKind::Other);
		assert!((asset - 150.0).abs() < 10.0, "asset-asset link at {asset}");
		assert!((other - 100.0).abs() < 10.0, "other link at {other}");
	}

	#[test]
	fn charge_pushes_unlinked_nodes_apart() {
		let mut sim = simulation(&["a", "b"], &[], ForceConfig::default());
		let before = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..20 {
			sim.step();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > before * 2.0);
	}

	#[test]
	fn centroid_is_pulled_to_canvas_center() {
		let mut sim = simulation(&["a", "b", "c"], &[("a", "b")], ForceConfig::default());
		for node in &mut sim.nodes {
			node.x += 300.0;
		}
		sim.step();
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		// Only the velocity step can move the centroid after centering.
		assert!((cx - 400.0).abs() < 50.0, "centroid at {cx}");
	}

	#[test]
	fn collision_separates_overlapping_nodes() {
		let forces = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = simulation(&["a", "b"], &[], forces);
		sim.nodes[1].x = sim.nodes[0].x + 1.0;
		sim.nodes[1].y = sim.nodes[0].y;
		run_to_rest(&mut sim);

		let min_gap = (sim.nodes()[0].size + 5.0) * 2.0;
		let gap = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!(gap > min_gap * 0.9, "nodes still overlap: {gap} < {min_gap}");
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut sim = simulation(&["a", "b", "c"], &[("a", "b"), ("b", "c")], ForceConfig::default());
		sim.pin(1, 10.0, 20.0);
		for _ in 0..50 {
			sim.step();
			let pinned = &sim.nodes()[1];
			assert_eq!((pinned.x, pinned.y), (10.0, 20.0));
		}
		sim.unpin(1);
		assert!(!sim.nodes()[1].is_pinned());
	}

	#[test]
	fn reheat_resumes_a_settled_simulation() {
		let mut sim = simulation(&["a", "b"], &[("a", "b")], ForceConfig::default());
		run_to_rest(&mut sim);
		assert!(!sim.is_running());

		sim.reheat(0.3);
		assert!(sim.is_running());
		assert!(sim.alpha_target() > sim.alpha_min());
		let alpha = sim.alpha();
		assert!(sim.step());
		assert!(sim.alpha() > alpha);

		sim.reheat(0.0);
		run_to_rest(&mut sim);
		assert!(sim.alpha() < sim.alpha_min());
	}

	#[test]
	fn reheat_below_alpha_min_keeps_it_settled() {
		let mut sim = simulation(&["a"], &[], ForceConfig::default());
		run_to_rest(&mut sim);
		sim.reheat(0.0);
		assert!(!sim.is_running());
	}

	#[test]
	fn stop_halts_scheduling() {
		let mut sim = simulation(&["a", "b"], &[], ForceConfig::default());
		sim.stop();
		assert!(!sim.step());
		assert_eq!(sim.tick_count(), 0);
	}

	#[test]
	fn barnes_hut_path_matches_direct_path_at_zero_theta() {
		let ids: Vec<String> = (0..40).map(|i| format!("n{i}")).collect();
		let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
		let direct = ForceConfig {
			barnes_hut_threshold: usize::MAX,
			..ForceConfig::default()
		};
		let tree = ForceConfig {
			barnes_hut_threshold: 0,
			charge_theta: 0.0,
			..ForceConfig::default()
		};
		let mut a = simulation(&refs, &[("n0", "n1")], direct);
		let mut b = simulation(&refs, &[("n0", "n1")], tree);
		for _ in 0..5 {
			a.tick();
			b.tick();
		}
		for (na, nb) in a.nodes().iter().zip(b.nodes()) {
			assert!((na.x - nb.x).abs() < 1e-6);
			assert!((na.y - nb.y).abs() < 1e-6);
		}
	}

	#[test]
	fn find_prefers_the_topmost_node() {
		let mut sim = simulation(&["a", "b"], &[], ForceConfig::default());
		sim.pin(0, 100.0, 100.0);
		sim.pin(1, 105.0, 100.0);
		assert_eq!(sim.find(102.0, 100.0, 0.0), Some(1));
		assert_eq!(sim.find(90.0, 100.0, 0.0), Some(0));
		assert_eq!(sim.find(300.0, 300.0, 0.0), None);
	}
}
