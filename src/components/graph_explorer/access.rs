//! Read-only access to a backing graph store.
//!
//! The explorer never mutates the store; it only walks it outward from the
//! home node. [`GraphAccess`] is the whole contract, and [`MemoryGraph`] is a
//! store held in memory, built from [`GraphData`].

use std::collections::HashMap;

use log::{debug, warn};

use super::error::GraphError;
use super::types::GraphData;

/// A vertex as the store reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	pub id: String,
	pub content: String,
	pub kind: String,
	pub icon_url: Option<String>,
}

/// A directed, labeled edge as the store reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub destination: String,
	pub label: String,
}

/// Which side of a node an edge is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Edges pointing towards the node.
	Incoming,
	/// Edges pointing away from the node.
	Outgoing,
}

impl Direction {
	pub const ALL: [Direction; 2] = [Direction::Incoming, Direction::Outgoing];
}

/// Read contract over any graph store.
///
/// Every method fails with [`GraphError::Released`] once [`release`] has been
/// called on a store that can tell.
///
/// [`release`]: GraphAccess::release
pub trait GraphAccess {
	/// Returns the node with the given id, or `None` if there is no such node.
	fn resolve_node(&self, id: &str) -> Result<Option<Node>, GraphError>;

	/// All edge labels that occur in the graph. Order is not significant.
	fn edge_labels(&self) -> Result<Vec<String>, GraphError>;

	/// Edges touching `node` with exactly `label` and `direction`.
	fn incident_edges(
		&self,
		node: &Node,
		label: &str,
		direction: Direction,
	) -> Result<Vec<Edge>, GraphError>;

	/// The node `edge` points away from.
	fn source(&self, edge: &Edge) -> Result<Node, GraphError>;

	/// The node `edge` points to.
	fn destination(&self, edge: &Edge) -> Result<Node, GraphError>;

	/// The endpoint of `edge` that is not `node`.
	///
	/// Fails with [`GraphError::NotAnEndpoint`] when `node` is neither end.
	/// For a self-loop the node itself is returned.
	fn opposite(&self, node: &Node, edge: &Edge) -> Result<Node, GraphError> {
		if edge.source == node.id {
			self.destination(edge)
		} else if edge.destination == node.id {
			self.source(edge)
		} else {
			Err(GraphError::NotAnEndpoint {
				node: node.id.clone(),
				edge: edge.id.clone(),
			})
		}
	}

	/// The canonical starting point for exploration.
	fn home_node(&self) -> Result<Node, GraphError>;

	/// Frees backing resources. Idempotent.
	fn release(&mut self) {}
}

/// A graph store held entirely in memory.
#[derive(Clone, Debug)]
pub struct MemoryGraph {
	nodes: HashMap<String, Node>,
	edges: Vec<Edge>,
	outgoing: HashMap<String, Vec<usize>>,
	incoming: HashMap<String, Vec<usize>>,
	labels: Vec<String>,
	home: String,
	released: bool,
}

impl MemoryGraph {
	/// Builds a store from parsed graph data.
	///
	/// Links must reference declared nodes. Duplicate node ids keep the
	/// first declaration.
	pub fn from_data(data: &GraphData) -> Result<Self, GraphError> {
		let mut nodes = HashMap::new();
		for node in &data.nodes {
			if nodes.contains_key(&node.id) {
				warn!("graph-explorer: duplicate node id `{}` ignored", node.id);
				continue;
			}
			nodes.insert(
				node.id.clone(),
				Node {
					id: node.id.clone(),
					content: node.content.clone().unwrap_or_else(|| node.id.clone()),
					kind: node.kind.clone(),
					icon_url: node.icon_url.clone().filter(|url| !url.is_empty()),
				},
			);
		}

		let home = match &data.home {
			Some(home) if nodes.contains_key(home) => home.clone(),
			Some(home) => return Err(GraphError::UnknownHome(home.clone())),
			None => data.nodes.first().ok_or(GraphError::NoHome)?.id.clone(),
		};

		let mut edges = Vec::with_capacity(data.links.len());
		let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
		let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
		let mut labels = Vec::new();

		for (i, link) in data.links.iter().enumerate() {
			let id = link
				.id
				.clone()
				.unwrap_or_else(|| format!("{}-{}-{}#{}", link.source, link.label, link.target, i));
			for endpoint in [&link.source, &link.target] {
				if !nodes.contains_key(endpoint) {
					return Err(GraphError::DanglingEdge {
						edge: id,
						node: endpoint.clone(),
					});
				}
			}
			if !labels.contains(&link.label) {
				labels.push(link.label.clone());
			}
			outgoing.entry(link.source.clone()).or_default().push(i);
			incoming.entry(link.target.clone()).or_default().push(i);
			edges.push(Edge {
				id,
				source: link.source.clone(),
				destination: link.target.clone(),
				label: link.label.clone(),
			});
		}

		debug!(
			"graph-explorer: memory store with {} nodes, {} edges, {} labels",
			nodes.len(),
			edges.len(),
			labels.len()
		);

		Ok(Self {
			nodes,
			edges,
			outgoing,
			incoming,
			labels,
			home,
			released: false,
		})
	}

	fn ensure_open(&self) -> Result<(), GraphError> {
		if self.released {
			Err(GraphError::Released)
		} else {
			Ok(())
		}
	}

	fn node_or_dangling(&self, edge: &Edge, id: &str) -> Result<Node, GraphError> {
		self.nodes
			.get(id)
			.cloned()
			.ok_or_else(|| GraphError::DanglingEdge {
				edge: edge.id.clone(),
				node: id.to_string(),
			})
	}
}

impl GraphAccess for MemoryGraph {
	fn resolve_node(&self, id: &str) -> Result<Option<Node>, GraphError> {
		self.ensure_open()?;
		Ok(self.nodes.get(id).cloned())
	}

	fn edge_labels(&self) -> Result<Vec<String>, GraphError> {
		self.ensure_open()?;
		Ok(self.labels.clone())
	}

	fn incident_edges(
		&self,
		node: &Node,
		label: &str,
		direction: Direction,
	) -> Result<Vec<Edge>, GraphError> {
		self.ensure_open()?;
		let index = match direction {
			Direction::Incoming => &self.incoming,
			Direction::Outgoing => &self.outgoing,
		};
		Ok(index
			.get(&node.id)
			.map(|slots| {
				slots
					.iter()
					.map(|&i| &self.edges[i])
					.filter(|edge| edge.label == label)
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}

	fn source(&self, edge: &Edge) -> Result<Node, GraphError> {
		self.ensure_open()?;
		self.node_or_dangling(edge, &edge.source)
	}

	fn destination(&self, edge: &Edge) -> Result<Node, GraphError> {
		self.ensure_open()?;
		self.node_or_dangling(edge, &edge.destination)
	}

	fn home_node(&self) -> Result<Node, GraphError> {
		self.ensure_open()?;
		self.resolve_node(&self.home)?.ok_or(GraphError::NoHome)
	}

	fn release(&mut self) {
		if !self.released {
			debug!("graph-explorer: releasing memory store");
		}
		self.released = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_explorer::types::{GraphLink, GraphNode};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			content: None,
			kind: "node".to_string(),
			icon_url: None,
		}
	}

	fn link(source: &str, target: &str, label: &str) -> GraphLink {
		GraphLink {
			id: None,
			source: source.to_string(),
			target: target.to_string(),
			label: label.to_string(),
		}
	}

	fn sample() -> MemoryGraph {
		MemoryGraph::from_data(&GraphData {
			home: Some("b".to_string()),
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![
				link("a", "b", "knows"),
				link("b", "c", "knows"),
				link("b", "c", "works_with"),
			],
		})
		.unwrap()
	}

	#[test]
	fn incident_edges_filter_by_label_and_direction() {
		let graph = sample();
		let b = graph.resolve_node("b").unwrap().unwrap();

		let incoming = graph.incident_edges(&b, "knows", Direction::Incoming).unwrap();
		assert_eq!(incoming.len(), 1);
		assert_eq!(incoming[0].source, "a");

		let outgoing = graph.incident_edges(&b, "works_with", Direction::Outgoing).unwrap();
		assert_eq!(outgoing.len(), 1);
		assert_eq!(outgoing[0].destination, "c");

		assert!(graph
			.incident_edges(&b, "works_with", Direction::Incoming)
			.unwrap()
			.is_empty());
	}

	#[test]
	fn opposite_rejects_foreign_node() {
		let graph = sample();
		let a = graph.resolve_node("a").unwrap().unwrap();
		let c = graph.resolve_node("c").unwrap().unwrap();
		let edge = graph.incident_edges(&a, "knows", Direction::Outgoing).unwrap()[0].clone();

		assert_eq!(graph.opposite(&a, &edge).unwrap().id, "b");
		assert_eq!(
			graph.opposite(&c, &edge),
			Err(GraphError::NotAnEndpoint {
				node: "c".to_string(),
				edge: edge.id.clone(),
			})
		);
	}

	#[test]
	fn missing_node_is_absent_not_error() {
		let graph = sample();
		assert_eq!(graph.resolve_node("zzz"), Ok(None));
		assert_eq!(graph.home_node().unwrap().id, "b");
	}

	#[test]
	fn release_is_idempotent_and_fails_fast_afterwards() {
		let mut graph = sample();
		graph.release();
		graph.release();
		assert_eq!(graph.resolve_node("a"), Err(GraphError::Released));
		assert_eq!(graph.edge_labels(), Err(GraphError::Released));
		assert_eq!(graph.home_node(), Err(GraphError::Released));
	}

	#[test]
	fn rejects_links_to_unknown_nodes() {
		let result = MemoryGraph::from_data(&GraphData {
			home: None,
			nodes: vec![node("a")],
			links: vec![link("a", "ghost", "knows")],
		});
		assert!(matches!(result, Err(GraphError::DanglingEdge { node, .. }) if node == "ghost"));
	}

	#[test]
	fn parses_json_with_defaults() {
		let json = r#"{
			"nodes": [{ "id": "x", "content": "Ex" }, { "id": "y", "kind": "person" }],
			"links": [{ "source": "x", "target": "y" }]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		let graph = MemoryGraph::from_data(&data).unwrap();

		assert_eq!(graph.home_node().unwrap().content, "Ex");
		assert_eq!(graph.resolve_node("y").unwrap().unwrap().kind, "person");
		assert_eq!(graph.edge_labels().unwrap(), vec!["link".to_string()]);
	}
}
