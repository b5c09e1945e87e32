//! The set of currently displayed nodes and arcs.
//!
//! [`Scene`] is the single owner of every [`NodeState`] and [`ArcState`]. It
//! keeps the arc-id sets on both endpoints in step with its arc table, and it
//! decides when the [`Renderer`] has to redraw something: a changed node
//! drags all of its arcs along with it.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use super::error::SceneError;
use super::model::{ArcGeometry, ArcState, NodeState};

/// Produces the on-screen representation of nodes and arcs.
pub trait Renderer {
	/// Draws or refreshes `node` and returns its rendered `(width, height)`.
	fn render_node(&mut self, node: &NodeState) -> (i32, i32);

	/// Draws or refreshes `arc`. Its geometry is already up to date.
	fn render_arc(&mut self, arc: &ArcState);

	fn detach_node(&mut self, id: &str);

	fn detach_arc(&mut self, id: &str);
}

/// Renderer for environments without a display. Every node measures the same.
#[derive(Clone, Copy, Debug)]
pub struct HeadlessRenderer {
	pub width: i32,
	pub height: i32,
}

impl Default for HeadlessRenderer {
	fn default() -> Self {
		Self {
			width: 80,
			height: 24,
		}
	}
}

impl Renderer for HeadlessRenderer {
	fn render_node(&mut self, _node: &NodeState) -> (i32, i32) {
		(self.width, self.height)
	}

	fn render_arc(&mut self, _arc: &ArcState) {}

	fn detach_node(&mut self, _id: &str) {}

	fn detach_arc(&mut self, _id: &str) {}
}

/// Displayed subgraph plus its renderer.
pub struct Scene {
	nodes: BTreeMap<String, NodeState>,
	arcs: BTreeMap<String, ArcState>,
	renderer: Box<dyn Renderer>,
}

impl Scene {
	pub fn new(renderer: Box<dyn Renderer>) -> Self {
		Self {
			nodes: BTreeMap::new(),
			arcs: BTreeMap::new(),
			renderer,
		}
	}

	pub fn add_node(&mut self, node: NodeState) -> Result<(), SceneError> {
		if self.nodes.contains_key(&node.id) {
			return Err(SceneError::DuplicateNode(node.id));
		}
		debug!("scene: add node `{}`", node.id);
		self.nodes.insert(node.id.clone(), node);
		Ok(())
	}

	/// Removes a node and every arc attached to it. Arcs go first so no arc
	/// ever points at a missing node.
	pub fn remove_node(&mut self, id: &str) {
		let Some(arcs) = self.nodes.get(id).map(NodeState::arc_ids) else {
			return;
		};
		for arc in arcs {
			self.remove_arc(&arc);
		}
		self.nodes.remove(id);
		self.renderer.detach_node(id);
		debug!("scene: removed node `{}`", id);
	}

	pub fn add_arc(&mut self, arc: ArcState) -> Result<(), SceneError> {
		if self.arcs.contains_key(&arc.id) {
			return Err(SceneError::DuplicateArc(arc.id));
		}
		for endpoint in [&arc.source, &arc.destination] {
			if !self.nodes.contains_key(endpoint) {
				return Err(SceneError::UnknownEndpoint {
					arc: arc.id.clone(),
					node: endpoint.clone(),
				});
			}
		}
		if let Some(source) = self.nodes.get_mut(&arc.source) {
			source.add_out_arc(arc.id.clone());
		}
		if let Some(destination) = self.nodes.get_mut(&arc.destination) {
			destination.add_in_arc(arc.id.clone());
		}
		debug!(
			"scene: add arc `{}` ({} -[{}]-> {})",
			arc.id, arc.source, arc.label, arc.destination
		);
		let id = arc.id.clone();
		self.arcs.insert(id.clone(), arc);
		self.update_arc(&id);
		Ok(())
	}

	pub fn remove_arc(&mut self, id: &str) {
		let Some(arc) = self.arcs.remove(id) else {
			return;
		};
		for endpoint in [&arc.source, &arc.destination] {
			if let Some(node) = self.nodes.get_mut(endpoint) {
				node.remove_arc(id);
			}
		}
		self.renderer.detach_arc(id);
	}

	/// Re-renders a node, caches its measured size, then refreshes every arc
	/// attached to it.
	pub fn notify_node_changed(&mut self, id: &str) {
		let Some(node) = self.nodes.get_mut(id) else {
			return;
		};
		let (width, height) = self.renderer.render_node(node);
		node.width = width;
		node.height = height;
		for arc in node.arc_ids() {
			self.update_arc(&arc);
		}
	}

	fn update_arc(&mut self, id: &str) {
		let Some(arc) = self.arcs.get(id) else {
			return;
		};
		let geometry = match (self.nodes.get(&arc.source), self.nodes.get(&arc.destination)) {
			(Some(source), Some(destination)) => ArcGeometry::between(source, destination),
			_ => return,
		};
		if let Some(arc) = self.arcs.get_mut(id) {
			arc.geometry = Some(geometry);
			self.renderer.render_arc(arc);
		}
	}

	pub fn node(&self, id: &str) -> Option<&NodeState> {
		self.nodes.get(id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeState> {
		self.nodes.get_mut(id)
	}

	pub fn arc(&self, id: &str) -> Option<&ArcState> {
		self.arcs.get(id)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &NodeState> {
		self.nodes.values()
	}

	pub fn arcs(&self) -> impl Iterator<Item = &ArcState> {
		self.arcs.values()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn arc_count(&self) -> usize {
		self.arcs.len()
	}

	/// Nodes on the other end of `id`'s arcs: sources of incoming arcs and
	/// destinations of outgoing ones. Arcs or nodes that are already gone are
	/// skipped.
	pub fn neighbors(&self, id: &str) -> HashSet<String> {
		let Some(node) = self.nodes.get(id) else {
			return HashSet::new();
		};
		let incoming = node
			.in_arcs()
			.iter()
			.filter_map(|arc| self.arcs.get(arc))
			.map(|arc| &arc.source);
		let outgoing = node
			.out_arcs()
			.iter()
			.filter_map(|arc| self.arcs.get(arc))
			.map(|arc| &arc.destination);
		incoming
			.chain(outgoing)
			.filter(|neighbor| self.nodes.contains_key(*neighbor))
			.cloned()
			.collect()
	}

	/// Topmost node under the point. Nodes later in id order are drawn on top.
	pub fn node_at(&self, x: i32, y: i32) -> Option<&NodeState> {
		self.nodes.values().rev().find(|node| node.contains(x, y))
	}
}
