//! graph-explorer: Interactive exploration of directed, labeled graphs.
//!
//! This crate provides a WASM-based explorer component. Starting from a home
//! node, the user expands and collapses nodes to walk the graph, and drags
//! nodes around to arrange what is on screen.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_explorer::{
	Explorer, ExplorerCanvas, GraphAccess, GraphData, GraphLink, GraphNode, MemoryGraph,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { home?, nodes: [...], links: [...] }.
/// A `data-theme` attribute on the element selects the theme.
fn load_graph_data() -> Option<(GraphData, Option<String>)> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let theme = element.get_attribute("data-theme");
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"graph-explorer: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some((data, theme))
		}
		Err(e) => {
			warn!("graph-explorer: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the explorer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph_data, theme) = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let theme = theme.unwrap_or_else(|| "default".to_string());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ExplorerCanvas data=graph_signal fullscreen=true theme=theme />
			<div class="graph-overlay">
				<h1>"Graph Explorer"</h1>
				<p class="subtitle">"Click a node to expand or collapse it. Drag nodes to rearrange."</p>
			</div>
		</div>
	}
}
