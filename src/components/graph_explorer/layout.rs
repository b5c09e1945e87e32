//! Placement of newly revealed nodes.
//!
//! When a node expands, its fresh neighbors all start on top of it. A short
//! force simulation over the displayed subgraph spreads them out while every
//! node the user has already seen stays pinned where it is.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scene::Scene;

/// Tuning for the placement simulation.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Radius of the ring fresh nodes are seeded on, in pixels.
	pub seed_radius: f64,
	/// Number of simulation steps.
	pub iterations: usize,
	/// Simulated seconds per step.
	pub step: f32,
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			seed_radius: 60.0,
			iterations: 120,
			step: 0.016,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Settled positions for `fresh` nodes. Nodes not in `fresh` are anchored.
pub fn settle(scene: &Scene, fresh: &[String], config: &LayoutConfig) -> HashMap<String, (i32, i32)> {
	if fresh.is_empty() {
		return HashMap::new();
	}
	let fresh_set: HashSet<&str> = fresh.iter().map(String::as_str).collect();
	let mut graph: ForceGraph<String, ()> = ForceGraph::new(SimulationParameters {
		force_charge: config.force_charge,
		force_spring: config.force_spring,
		force_max: config.force_max,
		node_speed: config.node_speed,
		damping_factor: config.damping_factor,
	});

	let mut id_to_idx = HashMap::new();
	let mut seeded = 0usize;
	for node in scene.nodes() {
		let is_fresh = fresh_set.contains(node.id.as_str());
		let (mut x, mut y) = (node.x as f64, node.y as f64);
		if is_fresh {
			// Seed on a ring so no two fresh nodes coincide.
			let angle = seeded as f64 * TAU / fresh.len() as f64;
			x += config.seed_radius * angle.cos();
			y += config.seed_radius * angle.sin();
			seeded += 1;
		}
		let idx = graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: 10.0,
			is_anchor: !is_fresh,
			user_data: node.id.clone(),
		});
		id_to_idx.insert(node.id.clone(), idx);
	}

	for arc in scene.arcs() {
		if arc.source == arc.destination {
			continue;
		}
		if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&arc.source), id_to_idx.get(&arc.destination)) {
			graph.add_edge(src, tgt, EdgeData::default());
		}
	}

	for _ in 0..config.iterations {
		graph.update(config.step);
	}

	let mut settled = HashMap::new();
	graph.visit_nodes(|node| {
		if fresh_set.contains(node.data.user_data.as_str()) {
			let (x, y) = (node.x(), node.y());
			if x.is_finite() && y.is_finite() {
				settled.insert(node.data.user_data.clone(), (x.round() as i32, y.round() as i32));
			}
		}
	});
	settled
}
