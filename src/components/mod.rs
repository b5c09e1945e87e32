//! UI components.

pub mod graph_explorer;
