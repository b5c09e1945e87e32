//! Per-node and per-arc display bookkeeping.
//!
//! Nodes and arcs never own each other. A node remembers the ids of the arcs
//! attached to it and an arc remembers the ids of its endpoints; every
//! resolution goes through the [`Scene`](super::scene::Scene).

use std::collections::HashSet;

use super::access::{Edge, Node};

/// Whether a node currently shows its neighborhood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpandState {
	Expanded,
	#[default]
	Collapsed,
}

impl ExpandState {
	/// Lowercase name, as used in logs.
	pub fn as_str(self) -> &'static str {
		match self {
			ExpandState::Expanded => "expanded",
			ExpandState::Collapsed => "collapsed",
		}
	}
}

/// Pointer state machine of a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerState {
	#[default]
	Idle,
	/// Mouse is down on the node but has not moved yet.
	Pressed,
	/// Mouse moved while pressed; the node follows the pointer.
	Dragging,
}

/// One displayed node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
	pub id: String,
	/// Center of the node, in container pixels.
	pub x: i32,
	pub y: i32,
	/// Extent as last measured by the renderer.
	pub width: i32,
	pub height: i32,
	pub kind: String,
	pub expand: ExpandState,
	pub content: String,
	pub icon_url: Option<String>,
	pub pointer: PointerState,
	in_arcs: HashSet<String>,
	out_arcs: HashSet<String>,
}

impl NodeState {
	pub fn new(id: impl Into<String>, x: i32, y: i32) -> Self {
		let id = id.into();
		Self {
			content: id.clone(),
			id,
			x,
			y,
			width: 0,
			height: 0,
			kind: "node".to_string(),
			expand: ExpandState::Collapsed,
			icon_url: None,
			pointer: PointerState::Idle,
			in_arcs: HashSet::new(),
			out_arcs: HashSet::new(),
		}
	}

	/// Display state for a backing node, collapsed, centered at `(x, y)`.
	pub fn from_node(node: &Node, x: i32, y: i32) -> Self {
		Self {
			kind: node.kind.clone(),
			content: node.content.clone(),
			icon_url: node.icon_url.clone(),
			..Self::new(node.id.clone(), x, y)
		}
	}

	pub fn with_expand(mut self, expand: ExpandState) -> Self {
		self.expand = expand;
		self
	}

	pub fn in_arcs(&self) -> &HashSet<String> {
		&self.in_arcs
	}

	pub fn out_arcs(&self) -> &HashSet<String> {
		&self.out_arcs
	}

	pub(crate) fn add_in_arc(&mut self, arc: impl Into<String>) {
		self.in_arcs.insert(arc.into());
	}

	pub(crate) fn add_out_arc(&mut self, arc: impl Into<String>) {
		self.out_arcs.insert(arc.into());
	}

	/// Forgets `arc` on both sides. Absent ids are ignored.
	pub(crate) fn remove_arc(&mut self, arc: &str) {
		self.in_arcs.remove(arc);
		self.out_arcs.remove(arc);
	}

	/// Number of attached arcs, incoming plus outgoing.
	pub fn degree(&self) -> usize {
		self.in_arcs.len() + self.out_arcs.len()
	}

	/// Ids of every attached arc, incoming first.
	pub fn arc_ids(&self) -> Vec<String> {
		self.in_arcs.iter().chain(self.out_arcs.iter()).cloned().collect()
	}

	pub fn is_pressed(&self) -> bool {
		self.pointer != PointerState::Idle
	}

	pub fn contains(&self, x: i32, y: i32) -> bool {
		let (left, top) = (self.x - self.width / 2, self.y - self.height / 2);
		x >= left && x < left + self.width && y >= top && y < top + self.height
	}
}

/// Connector endpoints, clipped to the border of each node box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcGeometry {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

impl ArcGeometry {
	/// Segment from the center of `source` to the center of `destination`,
	/// trimmed so it starts and ends on the box outlines.
	pub fn between(source: &NodeState, destination: &NodeState) -> Self {
		let (sx, sy) = (source.x as f64, source.y as f64);
		let (dx, dy) = (destination.x as f64, destination.y as f64);
		Self {
			from: clip_to_box(sx, sy, source.width, source.height, dx - sx, dy - sy),
			to: clip_to_box(dx, dy, destination.width, destination.height, sx - dx, sy - dy),
		}
	}

	pub fn length(&self) -> f64 {
		let (dx, dy) = (self.to.0 - self.from.0, self.to.1 - self.from.1);
		(dx * dx + dy * dy).sqrt()
	}
}

fn clip_to_box(cx: f64, cy: f64, width: i32, height: i32, dx: f64, dy: f64) -> (f64, f64) {
	let (hw, hh) = (width as f64 / 2.0, height as f64 / 2.0);
	let tx = if dx.abs() > f64::EPSILON { hw / dx.abs() } else { f64::INFINITY };
	let ty = if dy.abs() > f64::EPSILON { hh / dy.abs() } else { f64::INFINITY };
	let t = tx.min(ty).min(1.0);
	if t.is_finite() {
		(cx + dx * t, cy + dy * t)
	} else {
		(cx, cy)
	}
}

/// One displayed arc.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcState {
	pub id: String,
	pub source: String,
	pub destination: String,
	pub label: String,
	/// Last computed connector geometry, refreshed whenever an endpoint changes.
	pub geometry: Option<ArcGeometry>,
}

impl ArcState {
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		destination: impl Into<String>,
		label: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			destination: destination.into(),
			label: label.into(),
			geometry: None,
		}
	}

	pub fn from_edge(edge: &Edge) -> Self {
		Self::new(&edge.id, &edge.source, &edge.destination, &edge.label)
	}

	/// The endpoint that is not `node`, or `None` if `node` is neither end.
	pub fn opposite(&self, node: &str) -> Option<&str> {
		if self.source == node {
			Some(&self.destination)
		} else if self.destination == node {
			Some(&self.source)
		} else {
			None
		}
	}
}
