//! An exploration session over one graph store.
//!
//! The [`Explorer`] ties the pieces together: it reads the store through
//! [`GraphAccess`], keeps the [`Scene`], feeds mouse events to the
//! [`InteractionController`] and runs one [`MotionAnimator`] per moving node.
//!
//! It also plays the part of the update and toggle services. Requests the
//! controller issues while handling an event are queued and handled right
//! after it, in order, the same way a server response would come back
//! through the event loop.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use super::access::{Direction, GraphAccess};
use super::error::ExplorerError;
use super::interaction::{
	EventDisposition, InteractionController, PointerInput, ToggleService, UpdateService, Viewport,
};
use super::layout::{self, LayoutConfig};
use super::model::{ArcState, ExpandState, NodeState};
use super::motion::MotionAnimator;
use super::scene::{Renderer, Scene};

/// Session-wide settings.
#[derive(Clone, Debug)]
pub struct ExplorerConfig {
	/// How long a node takes to glide to a new position.
	pub animation_ms: f64,
	pub layout: LayoutConfig,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			animation_ms: 500.0,
			layout: LayoutConfig::default(),
		}
	}
}

/// Requests raised by the controller during one event.
#[derive(Debug, Default)]
struct PendingRequests {
	commits: Vec<(String, i32, i32)>,
	toggles: Vec<String>,
}

impl UpdateService for PendingRequests {
	fn commit_node_position(&mut self, node: &NodeState) {
		self.commits.push((node.id.clone(), node.x, node.y));
	}
}

impl ToggleService for PendingRequests {
	fn request_toggle(&mut self, node: &NodeState) {
		self.toggles.push(node.id.clone());
	}
}

/// Interactive view over a graph store.
pub struct Explorer<G: GraphAccess> {
	graph: G,
	scene: Scene,
	controller: InteractionController,
	motion: HashMap<String, MotionAnimator>,
	/// Last committed position of every node the user has moved.
	positions: HashMap<String, (i32, i32)>,
	/// Nodes the toggle service considers expanded.
	expanded: HashSet<String>,
	pending: PendingRequests,
	config: ExplorerConfig,
}

impl<G: GraphAccess> Explorer<G> {
	/// Opens a session with the home node expanded in the middle of the
	/// container. Its neighbors start gliding out at `now`.
	pub fn new(
		graph: G,
		renderer: Box<dyn Renderer>,
		viewport: Viewport,
		config: ExplorerConfig,
		now: f64,
	) -> Result<Self, ExplorerError> {
		let home = graph.home_node()?;
		let mut explorer = Self {
			graph,
			scene: Scene::new(renderer),
			controller: InteractionController::new(viewport),
			motion: HashMap::new(),
			positions: HashMap::new(),
			expanded: HashSet::new(),
			pending: PendingRequests::default(),
			config,
		};
		let center = (viewport.container_width / 2, viewport.container_height / 2);
		explorer
			.scene
			.add_node(NodeState::from_node(&home, center.0, center.1))?;
		explorer.scene.notify_node_changed(&home.id);
		explorer.expand(&home.id, now)?;
		info!("explorer: opened at home node `{}`", home.id);
		Ok(explorer)
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn graph(&self) -> &G {
		&self.graph
	}

	pub fn viewport(&self) -> Viewport {
		self.controller.viewport()
	}

	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.controller.set_viewport(viewport);
	}

	/// Node holding pointer capture, if a press is in progress.
	pub fn captured(&self) -> Option<&str> {
		self.controller.captured()
	}

	pub fn node_at(&self, x: i32, y: i32) -> Option<&str> {
		self.scene.node_at(x, y).map(|node| node.id.as_str())
	}

	pub fn is_animating(&self) -> bool {
		!self.motion.is_empty()
	}

	pub fn mouse_down(&mut self, id: &str, input: PointerInput) -> EventDisposition {
		let disposition = self.controller.mouse_down(&mut self.scene, id, input);
		if disposition == EventDisposition::PreventDefault && self.motion.remove(id).is_some() {
			debug!("explorer: press on `{}` cancelled its motion", id);
		}
		disposition
	}

	pub fn mouse_move(&mut self, input: PointerInput) -> EventDisposition {
		let disposition = self.controller.mouse_move(&mut self.scene, input, &mut self.pending);
		self.drain_commits();
		disposition
	}

	pub fn mouse_up(&mut self, input: PointerInput, now: f64) -> Result<EventDisposition, ExplorerError> {
		let mut toggles = PendingRequests::default();
		let disposition = self
			.controller
			.mouse_up(&mut self.scene, input, &mut self.pending, &mut toggles);
		self.pending.toggles.append(&mut toggles.toggles);
		self.drain_commits();
		for id in std::mem::take(&mut self.pending.toggles) {
			self.toggle(&id, now)?;
		}
		Ok(disposition)
	}

	fn drain_commits(&mut self) {
		for (id, x, y) in self.pending.commits.drain(..) {
			debug!("explorer: committed `{}` at ({}, {})", id, x, y);
			self.positions.insert(id, (x, y));
		}
	}

	/// Handles a toggle request for `id`.
	///
	/// A node this session has expanded is acknowledged as collapsed; the
	/// controller already pruned its leaves. Any other node gets expanded.
	pub fn toggle(&mut self, id: &str, now: f64) -> Result<(), ExplorerError> {
		if self.expanded.remove(id) {
			info!("explorer: `{}` is now {}", id, ExpandState::Collapsed.as_str());
			return Ok(());
		}
		self.expand(id, now)
	}

	/// Marks `id` expanded and displays every arc incident to it, together
	/// with any neighbor not yet on screen.
	pub fn expand(&mut self, id: &str, now: f64) -> Result<(), ExplorerError> {
		let Some(node) = self.graph.resolve_node(id)? else {
			warn!("explorer: `{}` vanished from the store", id);
			return Ok(());
		};
		let Some(origin) = self.scene.node_mut(id).map(|state| {
			state.expand = ExpandState::Expanded;
			(state.x, state.y)
		}) else {
			return Ok(());
		};
		self.expanded.insert(id.to_string());

		let mut fresh = Vec::new();
		for label in self.graph.edge_labels()? {
			for direction in Direction::ALL {
				for edge in self.graph.incident_edges(&node, &label, direction)? {
					let other = self.graph.opposite(&node, &edge)?;
					if self.scene.node(&other.id).is_none() {
						self.scene
							.add_node(NodeState::from_node(&other, origin.0, origin.1))?;
						fresh.push(other.id.clone());
					}
					if self.scene.arc(&edge.id).is_none() {
						self.scene.add_arc(ArcState::from_edge(&edge))?;
					}
				}
			}
		}

		self.scene.notify_node_changed(id);
		for other in &fresh {
			self.scene.notify_node_changed(other);
		}
		let placed = layout::settle(&self.scene, &fresh, &self.config.layout);
		for other in &fresh {
			let target = self
				.positions
				.get(other)
				.or_else(|| placed.get(other))
				.copied()
				.unwrap_or(origin);
			self.move_node(other, target.0, target.1, now);
		}
		info!("explorer: expanded `{}`, {} new neighbors", id, fresh.len());
		Ok(())
	}

	/// Glides `id` from where it is now to `(x, y)`. Replaces any motion
	/// already running on that node.
	pub fn move_node(&mut self, id: &str, x: i32, y: i32, now: f64) {
		let Some(node) = self.scene.node(id) else {
			return;
		};
		let motion = MotionAnimator::new((node.x, node.y), (x, y), self.config.animation_ms, now);
		self.motion.insert(id.to_string(), motion);
	}

	/// Advances every running motion to `now`.
	pub fn tick(&mut self, now: f64) {
		let mut finished = Vec::new();
		for (id, motion) in &self.motion {
			let Some(node) = self.scene.node_mut(id) else {
				finished.push(id.clone());
				continue;
			};
			(node.x, node.y) = motion.sample(now);
			self.scene.notify_node_changed(id);
			if motion.is_finished(now) {
				finished.push(id.clone());
			}
		}
		for id in finished {
			self.motion.remove(&id);
		}
	}

	/// Releases the backing store. The scene stays as it is.
	pub fn release(&mut self) {
		self.motion.clear();
		self.controller.release_capture();
		self.graph.release();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_explorer::access::MemoryGraph;
	use crate::components::graph_explorer::error::GraphError;
	use crate::components::graph_explorer::scene::HeadlessRenderer;
	use crate::components::graph_explorer::types::{GraphData, GraphLink, GraphNode};

	fn data(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			home: nodes.first().map(|id| id.to_string()),
			nodes: nodes
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					content: None,
					kind: "node".to_string(),
					icon_url: None,
				})
				.collect(),
			links: links
				.iter()
				.map(|(source, target)| GraphLink {
					id: Some(format!("{source}{target}")),
					source: source.to_string(),
					target: target.to_string(),
					label: "link".to_string(),
				})
				.collect(),
		}
	}

	fn open(nodes: &[&str], links: &[(&str, &str)]) -> Explorer<MemoryGraph> {
		let graph = MemoryGraph::from_data(&data(nodes, links)).unwrap();
		Explorer::new(
			graph,
			Box::new(HeadlessRenderer::default()),
			Viewport::fullscreen(1200, 900),
			ExplorerConfig::default(),
			0.0,
		)
		.unwrap()
	}

	fn click(explorer: &mut Explorer<MemoryGraph>, id: &str, now: f64) {
		let node = explorer.scene().node(id).unwrap();
		let input = PointerInput::at(node.x, node.y);
		explorer.mouse_down(id, input);
		explorer.mouse_up(input, now).unwrap();
	}

	#[test]
	fn opens_with_home_neighborhood() {
		let explorer = open(&["h", "a", "b", "far"], &[("h", "a"), ("b", "h"), ("a", "far")]);
		let scene = explorer.scene();

		assert_eq!(scene.len(), 3);
		assert_eq!(scene.arc_count(), 2);
		assert_eq!(scene.node("h").unwrap().expand, ExpandState::Expanded);
		assert_eq!(scene.node("a").unwrap().expand, ExpandState::Collapsed);
		assert!(scene.node("far").is_none());
		assert_eq!((scene.node("h").unwrap().x, scene.node("h").unwrap().y), (600, 450));
	}

	#[test]
	fn new_neighbors_glide_out_from_their_parent() {
		let mut explorer = open(&["h", "a"], &[("h", "a")]);
		assert!(explorer.is_animating());
		let start = {
			let a = explorer.scene().node("a").unwrap();
			(a.x, a.y)
		};
		assert_eq!(start, (600, 450));

		explorer.tick(10_000.0);
		assert!(!explorer.is_animating());
		let arc = explorer.scene().arc("ha").unwrap();
		assert!(arc.geometry.is_some());
	}

	#[test]
	fn opening_late_still_animates() {
		let graph = MemoryGraph::from_data(&data(&["h", "a"], &[("h", "a")])).unwrap();
		let mut explorer = Explorer::new(
			graph,
			Box::new(HeadlessRenderer::default()),
			Viewport::fullscreen(1200, 900),
			ExplorerConfig::default(),
			90_000.0,
		)
		.unwrap();

		explorer.tick(90_100.0);
		assert!(explorer.is_animating());
		assert!((explorer.motion["a"].progress(90_100.0) - 0.2).abs() < 1e-9);
	}

	#[test]
	fn click_on_collapsed_node_expands_it() {
		let mut explorer = open(&["h", "a", "far"], &[("h", "a"), ("a", "far")]);
		explorer.tick(10_000.0);

		click(&mut explorer, "a", 20_000.0);
		let scene = explorer.scene();
		assert_eq!(scene.node("a").unwrap().expand, ExpandState::Expanded);
		assert!(scene.node("far").is_some());
		assert!(scene.arc("afar").is_some());
	}

	#[test]
	fn click_on_expanded_node_collapses_and_prunes() {
		let mut explorer = open(&["h", "a", "b", "far"], &[("h", "a"), ("h", "b"), ("b", "far")]);
		explorer.tick(10_000.0);
		click(&mut explorer, "b", 20_000.0);
		explorer.tick(30_000.0);
		assert_eq!(explorer.scene().len(), 4);

		click(&mut explorer, "h", 40_000.0);
		let scene = explorer.scene();
		assert_eq!(scene.node("h").unwrap().expand, ExpandState::Collapsed);
		assert!(scene.node("a").is_none(), "collapsed leaf is pruned");
		assert!(scene.node("b").is_some(), "expanded neighbor stays");

		// A second click expands again.
		click(&mut explorer, "h", 50_000.0);
		assert!(explorer.scene().node("a").is_some());
	}

	#[test]
	fn committed_positions_survive_collapse() {
		let mut explorer = open(&["h", "a"], &[("h", "a")]);
		explorer.tick(10_000.0);
		let a = explorer.scene().node("a").unwrap();
		let (ax, ay) = (a.x, a.y);

		explorer.mouse_down("a", PointerInput::at(ax, ay));
		explorer.mouse_move(PointerInput::at(100, 120));
		explorer.mouse_up(PointerInput::at(100, 120), 11_000.0).unwrap();
		let dragged = explorer.scene().node("a").unwrap();
		let dropped_at = (dragged.x, dragged.y);

		click(&mut explorer, "h", 12_000.0);
		assert!(explorer.scene().node("a").is_none());
		click(&mut explorer, "h", 13_000.0);
		explorer.tick(20_000.0);
		let back = explorer.scene().node("a").unwrap();
		assert_eq!((back.x, back.y), dropped_at);
	}

	#[test]
	fn restarting_a_motion_starts_from_the_current_point() {
		let mut explorer = open(&["h"], &[]);
		explorer.move_node("h", 0, 450, 0.0);
		explorer.tick(250.0);
		assert_eq!(explorer.scene().node("h").unwrap().x, 300);

		explorer.move_node("h", 300, 0, 250.0);
		explorer.tick(250.0);
		assert_eq!((explorer.scene().node("h").unwrap().x, explorer.scene().node("h").unwrap().y), (300, 450));
		explorer.tick(750.0);
		assert_eq!((explorer.scene().node("h").unwrap().x, explorer.scene().node("h").unwrap().y), (300, 0));
		assert!(!explorer.is_animating());
	}

	#[test]
	fn pressing_a_moving_node_stops_its_motion() {
		let mut explorer = open(&["h"], &[]);
		explorer.move_node("h", 0, 0, 0.0);
		explorer.mouse_down("h", PointerInput::at(600, 450));
		assert!(!explorer.is_animating());
	}

	#[test]
	fn release_closes_the_store() {
		let mut explorer = open(&["h", "a"], &[("h", "a")]);
		explorer.release();
		assert_eq!(explorer.graph().home_node(), Err(GraphError::Released));
		assert_eq!(
			explorer.toggle("a", 0.0),
			Err(ExplorerError::Graph(GraphError::Released))
		);
	}
}
