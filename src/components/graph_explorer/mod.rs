//! Interactive graph explorer component.
//!
//! Shows a growing neighborhood of a directed, labeled graph on an HTML canvas:
//! - Exploration starts at the store's home node, expanded
//! - Clicking a collapsed node reveals its neighbors, which glide into place
//! - Clicking an expanded node collapses it and hides its leaf neighbors
//! - Dragging moves a node; the position is remembered for the session
//!
//! The store is read through [`GraphAccess`]; [`MemoryGraph`] serves data
//! parsed from JSON.
//!
//! # Example
//!
//! ```ignore
//! use graph_explorer::{ExplorerCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     home: Some("a".into()),
//!     nodes: vec![
//!         GraphNode { id: "a".into(), content: Some("Node A".into()), .. },
//!         GraphNode { id: "b".into(), content: Some("Node B".into()), .. },
//!     ],
//!     links: vec![
//!         GraphLink { id: None, source: "a".into(), target: "b".into(), label: "knows".into() },
//!     ],
//! };
//!
//! view! { <ExplorerCanvas data=data.into() fullscreen=true /> }
//! ```

pub mod access;
mod component;
pub mod error;
pub mod explorer;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod motion;
mod render;
pub mod scene;
pub mod theme;
mod types;

pub use access::{Direction, Edge, GraphAccess, MemoryGraph, Node};
pub use component::ExplorerCanvas;
pub use error::{ExplorerError, GraphError, SceneError};
pub use explorer::{Explorer, ExplorerConfig};
pub use interaction::{EventDisposition, PointerInput, Viewport};
pub use model::{ArcState, ExpandState, NodeState, PointerState};
pub use motion::MotionAnimator;
pub use scene::{HeadlessRenderer, Renderer, Scene};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
