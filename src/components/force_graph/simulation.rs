//! Force simulation for graph layout.
//!
//! Each [`Simulation::tick`] is one relaxation step: link springs, pairwise
//! charge, centring, integration, then cooling of `alpha`. The engine does no
//! scheduling of its own; the caller keeps ticking while it reports
//! [`SimulationStatus::Running`].

use std::f64::consts::PI;

use log::debug;

use super::graph::{Graph, Point};

/// Radius step of the seed spiral.
const INITIAL_RADIUS: f64 = 10.0;

/// Tunables of the force layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Pairwise charge strength (negative = repulsion).
	pub charge: f64,
	/// Fraction of the centroid offset corrected per tick.
	pub center_strength: f64,
	/// Velocity multiplier applied after every integration step.
	pub velocity_decay: f64,
	/// The layout is idle once alpha falls below this with no target.
	pub alpha_min: f64,
	/// Fraction of the distance to the alpha target closed per tick.
	pub alpha_decay: f64,
	/// Distances below this are clamped in the charge force.
	pub distance_min: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 50.0,
			charge: -100.0,
			center_strength: 1.0,
			velocity_decay: 0.6,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			distance_min: 1.0,
			drag_alpha_target: 0.3,
		}
	}
}

/// Whether the layout wants more ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
	/// Still moving.
	Running,
	/// Settled.
	Idle,
}

/// Force layout engine. Holds the cooling state; positions live in [`Graph`].
#[derive(Clone, Debug)]
pub struct Simulation {
	config: SimulationConfig,
	alpha: f64,
	alpha_target: f64,
	width: f64,
	height: f64,
	seed: u32,
}

impl Simulation {
	/// A hot engine (alpha 1) with no canvas size yet.
	pub fn new(config: SimulationConfig) -> Self {
		Self {
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			width: 0.0,
			height: 0.0,
			seed: 1,
		}
	}

	/// The tunables in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Temperature alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Running while hot or held warm by an alpha target.
	pub fn status(&self) -> SimulationStatus {
		if self.alpha >= self.config.alpha_min || self.alpha_target > 0.0 {
			SimulationStatus::Running
		} else {
			SimulationStatus::Idle
		}
	}

	/// Shorthand for [`SimulationStatus::Running`].
	pub fn is_running(&self) -> bool {
		self.status() == SimulationStatus::Running
	}

	/// Places every node that has no position yet on a spiral around the
	/// canvas centre, so no two seeded nodes coincide.
	pub fn initialize(&mut self, graph: &mut Graph, width: f64, height: f64) {
		self.resize(width, height);
		let (cx, cy) = self.center().unwrap_or((0.0, 0.0));
		let angle_step = PI * (3.0 - 5.0_f64.sqrt());

		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			if node.position.is_some() {
				continue;
			}
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * angle_step;
			node.position = Some((cx + radius * angle.cos(), cy + radius * angle.sin()));
			node.velocity = (0.0, 0.0);
		}
	}

	/// Moves the centring point to the middle of the new canvas.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Reheats the layout.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
	}

	/// Sets the temperature the layout decays toward; negative means 0.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.max(0.0);
	}

	/// Advances the layout by one step and reports whether more ticks are wanted.
	/// Idle simulations are left untouched.
	pub fn tick(&mut self, graph: &mut Graph) -> SimulationStatus {
		if !self.is_running() {
			return SimulationStatus::Idle;
		}

		self.apply_link_force(graph);
		self.apply_charge_force(graph);
		self.apply_center_force(graph);
		self.integrate(graph);

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		let status = self.status();
		if status == SimulationStatus::Idle {
			debug!("simulation settled (alpha {:.5})", self.alpha);
		}
		status
	}

	fn center(&self) -> Option<(f64, f64)> {
		(self.width > 0.0 && self.height > 0.0).then(|| (self.width / 2.0, self.height / 2.0))
	}

	/// Tiny pseudo-random offset for coincident points.
	fn jiggle(&mut self) -> f64 {
		self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		(f64::from(self.seed) / 4_294_967_296.0 - 0.5) * 1e-6
	}

	/// A tiny non-zero vector to stand in for a separation whose length is
	/// zero or not finite.
	fn jiggle_vector(&mut self) -> Point {
		loop {
			let v = (self.jiggle(), self.jiggle());
			if v.0 != 0.0 || v.1 != 0.0 {
				return v;
			}
		}
	}

	/// Springs pull linked nodes toward `link_distance`. The correction is
	/// split by degree so that hubs move less than leaves.
	fn apply_link_force(&mut self, graph: &mut Graph) {
		let alpha = self.alpha;
		let rest = self.config.link_distance;

		for i in 0..graph.resolved_links().len() {
			let link = graph.resolved_links()[i];
			if link.source == link.target {
				continue;
			}
			let nodes = graph.nodes();
			let (Some((sx, sy)), Some((tx, ty))) =
				(nodes[link.source].position, nodes[link.target].position)
			else {
				continue;
			};

			let (mut dx, mut dy) = (tx - sx, ty - sy);
			let mut d = (dx * dx + dy * dy).sqrt();
			if !(d > 0.0 && d.is_finite()) {
				(dx, dy) = self.jiggle_vector();
				d = (dx * dx + dy * dy).sqrt();
			}

			let (ds, dt) = (graph.degree(link.source), graph.degree(link.target));
			let strength = 1.0 / ds.min(dt).max(1) as f64;
			let bias = ds as f64 / (ds + dt) as f64;
			let k = (d - rest) / d * alpha * strength;
			let (fx, fy) = (dx * k, dy * k);

			let nodes = graph.nodes_mut();
			let target = &mut nodes[link.target].velocity;
			target.0 -= fx * bias;
			target.1 -= fy * bias;
			let source = &mut nodes[link.source].velocity;
			source.0 += fx * (1.0 - bias);
			source.1 += fy * (1.0 - bias);
		}
	}

	/// Direct O(n²) repulsion. A quad-tree (Barnes-Hut) approximation would
	/// replace the inner loop here for large graphs.
	fn apply_charge_force(&mut self, graph: &mut Graph) {
		let strength = self.config.charge * self.alpha;
		if strength == 0.0 {
			return;
		}
		let min_sq = self.config.distance_min * self.config.distance_min;
		let n = graph.len();

		for i in 0..n {
			let Some((xi, yi)) = graph.nodes()[i].position else {
				continue;
			};
			for j in (i + 1)..n {
				let Some((xj, yj)) = graph.nodes()[j].position else {
					continue;
				};
				let (mut dx, mut dy) = (xj - xi, yj - yi);
				let mut l = dx * dx + dy * dy;
				if !(l > 0.0 && l.is_finite()) {
					(dx, dy) = self.jiggle_vector();
					l = dx * dx + dy * dy;
				}
				if l < min_sq {
					l = (min_sq * l).sqrt();
				}
				let w = strength / l;

				let nodes = graph.nodes_mut();
				nodes[i].velocity.0 += dx * w;
				nodes[i].velocity.1 += dy * w;
				nodes[j].velocity.0 -= dx * w;
				nodes[j].velocity.1 -= dy * w;
			}
		}
	}

	/// Shifts every placed node so the centroid moves toward the canvas centre.
	fn apply_center_force(&self, graph: &mut Graph) {
		let Some((cx, cy)) = self.center() else {
			return;
		};
		let (mut sx, mut sy, mut count) = (0.0, 0.0, 0usize);
		for (x, y) in graph.nodes().iter().filter_map(|n| n.position) {
			sx += x;
			sy += y;
			count += 1;
		}
		if count == 0 {
			return;
		}

		let strength = self.config.center_strength;
		let shift_x = (cx - sx / count as f64) * strength;
		let shift_y = (cy - sy / count as f64) * strength;
		for node in graph.nodes_mut() {
			if let Some(p) = node.position.as_mut() {
				p.0 += shift_x;
				p.1 += shift_y;
			}
		}
	}

	fn integrate(&self, graph: &mut Graph) {
		let decay = self.config.velocity_decay;
		for node in graph.nodes_mut() {
			if let Some(fixed) = node.fixed {
				node.position = Some(fixed);
				node.velocity = (0.0, 0.0);
			} else if let Some((x, y)) = node.position {
				let (vx, vy) = node.velocity;
				node.position = Some((x + vx, y + vy));
				node.velocity = (vx * decay, vy * decay);
			}
		}
	}
}

impl Default for Simulation {
	fn default() -> Self {
		Self::new(SimulationConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn distance(graph: &Graph, a: &str, b: &str) -> f64 {
		let (ax, ay) = graph.node(a).unwrap().position.unwrap();
		let (bx, by) = graph.node(b).unwrap().position.unwrap();
		((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
	}

	fn run_until_idle(sim: &mut Simulation, graph: &mut Graph, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while sim.is_running() && ticks < max_ticks {
			sim.tick(graph);
			ticks += 1;
		}
		ticks
	}

	#[test]
	fn two_linked_nodes_settle_at_link_distance() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a").at(0.0, 0.0), GraphNode::new("b").at(100.0, 0.0)],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::new(SimulationConfig {
			charge: 0.0,
			..Default::default()
		});
		sim.initialize(&mut graph, 800.0, 600.0);

		run_until_idle(&mut sim, &mut graph, 10_000);

		assert!(sim.alpha() < 0.001);
		assert_eq!(sim.status(), SimulationStatus::Idle);
		let d = distance(&graph, "a", "b");
		assert!((d - 50.0).abs() <= 1.0, "distance {d}");
	}

	#[test]
	fn settles_in_about_three_hundred_ticks() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
			links: vec![],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		let ticks = run_until_idle(&mut sim, &mut graph, 10_000);

		assert!((295..=305).contains(&ticks), "ticks {ticks}");
		assert_eq!(sim.tick(&mut graph), SimulationStatus::Idle);
	}

	#[test]
	fn initialize_seeds_distinct_positions_around_center() {
		let data = GraphData {
			nodes: (0..20).map(|i| GraphNode::new(i.to_string())).collect(),
			links: vec![],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		let positions: Vec<_> = graph.nodes().iter().map(|n| n.position.unwrap()).collect();
		for (i, a) in positions.iter().enumerate() {
			for b in &positions[i + 1..] {
				assert_ne!(a, b);
			}
		}
		let (x, y) = positions[0];
		assert!((x - 400.0).abs() < 20.0 && (y - 300.0).abs() < 20.0);
	}

	#[test]
	fn coincident_nodes_are_pushed_apart() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a").at(10.0, 10.0), GraphNode::new("b").at(10.0, 10.0)],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		for _ in 0..50 {
			sim.tick(&mut graph);
		}

		let d = distance(&graph, "a", "b");
		assert!(d.is_finite());
		assert!(d > 1.0, "distance {d}");
	}

	#[test]
	fn vanishing_separation_keeps_layout_finite() {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a").at(0.0, 0.0),
				GraphNode::new("b").at(1e-170, 0.0),
				GraphNode::new("c").at(100.0, 100.0),
			],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		for _ in 0..20 {
			sim.tick(&mut graph);
			for node in graph.nodes() {
				let (x, y) = node.position.unwrap();
				assert!(x.is_finite() && y.is_finite(), "{} at ({x}, {y})", node.id);
			}
		}
		assert!(distance(&graph, "a", "b") > 1.0);
	}

	#[test]
	fn overflowing_separation_keeps_layout_finite() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a").at(-1e200, 0.0), GraphNode::new("b").at(1e200, 0.0)],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		sim.tick(&mut graph);

		for node in graph.nodes() {
			let (vx, vy) = node.velocity;
			assert!(vx.is_finite() && vy.is_finite(), "{} velocity ({vx}, {vy})", node.id);
		}
	}

	#[test]
	fn fixed_node_is_pinned_and_loses_velocity() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a").at(0.0, 0.0), GraphNode::new("b").at(30.0, 0.0)],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);
		graph.node_mut("a").unwrap().fixed = Some((5.0, 7.0));

		for _ in 0..10 {
			sim.tick(&mut graph);
			let a = graph.node("a").unwrap();
			assert_eq!(a.position, Some((5.0, 7.0)));
			assert_eq!(a.velocity, (0.0, 0.0));
		}
	}

	#[test]
	fn alpha_target_keeps_simulation_running() {
		let mut graph = Graph::from_data(&GraphData {
			nodes: vec![GraphNode::new("a")],
			links: vec![],
		});
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);
		run_until_idle(&mut sim, &mut graph, 10_000);
		assert!(!sim.is_running());

		sim.set_alpha_target(0.3);
		assert!(sim.is_running());
		for _ in 0..1_000 {
			assert_eq!(sim.tick(&mut graph), SimulationStatus::Running);
		}
		assert!((sim.alpha() - 0.3).abs() < 1e-3);

		sim.set_alpha_target(0.0);
		run_until_idle(&mut sim, &mut graph, 10_000);
		assert!(!sim.is_running());
	}

	#[test]
	fn restart_reheats() {
		let mut graph = Graph::default();
		let mut sim = Simulation::default();
		run_until_idle(&mut sim, &mut graph, 10_000);

		sim.restart();

		assert_eq!(sim.alpha(), 1.0);
		assert!(sim.is_running());
	}

	#[test]
	fn dangling_link_contributes_no_force() {
		let data = GraphData {
			nodes: vec![GraphNode::new("A").at(400.0, 300.0)],
			links: vec![GraphLink::new("A", "missing")],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		for _ in 0..20 {
			sim.tick(&mut graph);
		}

		let a = graph.node("A").unwrap();
		assert_eq!(a.position, Some((400.0, 300.0)));
		assert_eq!(a.velocity, (0.0, 0.0));
	}

	#[test]
	fn zero_sized_canvas_skips_centering() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a").at(-40.0, 12.0)],
			links: vec![],
		};
		let mut graph = Graph::from_data(&data);
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 0.0, -5.0);

		sim.tick(&mut graph);

		assert_eq!(graph.node("a").unwrap().position, Some((-40.0, 12.0)));
	}

	#[test]
	fn empty_graph_ticks_without_panicking() {
		let mut graph = Graph::default();
		let mut sim = Simulation::default();
		sim.initialize(&mut graph, 800.0, 600.0);

		assert_eq!(sim.tick(&mut graph), SimulationStatus::Running);
	}
}
