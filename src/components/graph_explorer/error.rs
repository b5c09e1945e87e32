//! Error types for graph access, scene bookkeeping and the explorer session.
//!
//! Missing identities are never errors: lookups return `Option`. The variants
//! here are caller bugs or contract violations and abort the triggering
//! operation.

/// Failures raised by a [`GraphAccess`](super::access::GraphAccess) store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	#[error("node `{node}` is not an endpoint of edge `{edge}`")]
	NotAnEndpoint { node: String, edge: String },
	#[error("graph store has been released")]
	Released,
	#[error("edge `{edge}` references unknown node `{node}`")]
	DanglingEdge { edge: String, node: String },
	#[error("graph has no nodes to start from")]
	NoHome,
	#[error("home node `{0}` does not exist")]
	UnknownHome(String),
}

/// Structural invariant violations in [`Scene`](super::scene::Scene) usage.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
	#[error("node `{0}` is already displayed")]
	DuplicateNode(String),
	#[error("arc `{0}` is already displayed")]
	DuplicateArc(String),
	#[error("arc `{arc}` references node `{node}` which is not displayed")]
	UnknownEndpoint { arc: String, node: String },
}

/// Anything that can stop an explorer operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerError {
	#[error(transparent)]
	Graph(#[from] GraphError),
	#[error(transparent)]
	Scene(#[from] SceneError),
}
