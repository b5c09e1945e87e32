//! Graph data structures accepted as input by the explorer.

use serde::Deserialize;

fn default_kind() -> String {
	"node".to_string()
}

fn default_link_label() -> String {
	"link".to_string()
}

/// A vertex of the backing graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display text. Falls back to the id when absent.
	#[serde(default)]
	pub content: Option<String>,
	/// Style tag (e.g. "person", "company"). Affects color only.
	#[serde(default = "default_kind")]
	pub kind: String,
	/// Optional icon drawn to the left of the label.
	#[serde(default)]
	pub icon_url: Option<String>,
}

/// A directed, labeled edge between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Edge id. Generated from the endpoints and label when absent.
	#[serde(default)]
	pub id: Option<String>,
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Edge label, drawn from a small vocabulary.
	#[serde(default = "default_link_label")]
	pub label: String,
}

/// Complete graph data: home node, nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Where exploration starts. Defaults to the first node.
	#[serde(default)]
	pub home: Option<String>,
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
