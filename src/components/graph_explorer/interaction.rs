//! Pointer interaction with displayed nodes.
//!
//! Each node runs a tiny state machine (`Idle -> Pressed -> Dragging`) kept in
//! [`NodeState::pointer`]. The controller owns the one capture slot: once a
//! node is pressed, every move and release is routed to it until the button
//! goes up, wherever the pointer is. A release without movement is a click
//! and toggles the node; a release after movement commits the new position.

use log::{debug, info};

use super::model::{ExpandState, NodeState, PointerState};
use super::scene::Scene;

/// Receives node positions once a drag has finished.
pub trait UpdateService {
	fn commit_node_position(&mut self, node: &NodeState);
}

/// Receives expand/collapse requests after a click.
pub trait ToggleService {
	fn request_toggle(&mut self, node: &NodeState);
}

/// Container and window extents, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
	pub container_width: i32,
	pub container_height: i32,
	pub window_width: i32,
	pub window_height: i32,
}

impl Viewport {
	/// A viewport whose container fills the whole window.
	pub fn fullscreen(width: i32, height: i32) -> Self {
		Self {
			container_width: width,
			container_height: height,
			window_width: width,
			window_height: height,
		}
	}

	fn outside_window(&self, client_x: i32, client_y: i32) -> bool {
		client_x < 0 || client_y < 0 || client_x > self.window_width || client_y > self.window_height
	}
}

/// One mouse event, in container coordinates and in viewport (client)
/// coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerInput {
	pub x: i32,
	pub y: i32,
	pub client_x: i32,
	pub client_y: i32,
}

impl PointerInput {
	/// Input where container and viewport coincide.
	pub fn at(x: i32, y: i32) -> Self {
		Self {
			x,
			y,
			client_x: x,
			client_y: y,
		}
	}
}

/// What the caller should do with the native event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDisposition {
	/// The event was consumed by a node; suppress the browser default.
	PreventDefault,
	/// No node took the event.
	PassThrough,
}

#[derive(Clone, Debug)]
struct Capture {
	node: String,
	/// Pointer position relative to the node center at press time.
	grab_x: i32,
	grab_y: i32,
}

/// Keeps a centered coordinate inside `[0, container]` so that the whole
/// extent stays visible.
pub fn clamp_center(center: i32, extent: i32, container: i32) -> i32 {
	let radius = extent / 2;
	let edge = (center - radius).max(0).min(container - extent);
	edge + radius
}

/// Clamps a node into the container on both axes.
pub fn clamp_to_container(node: &mut NodeState, viewport: &Viewport) {
	node.x = clamp_center(node.x, node.width, viewport.container_width);
	node.y = clamp_center(node.y, node.height, viewport.container_height);
}

/// Routes mouse events to nodes.
#[derive(Clone, Debug)]
pub struct InteractionController {
	viewport: Viewport,
	capture: Option<Capture>,
}

impl InteractionController {
	pub fn new(viewport: Viewport) -> Self {
		Self {
			viewport,
			capture: None,
		}
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}

	/// The node currently holding pointer capture.
	pub fn captured(&self) -> Option<&str> {
		self.capture.as_ref().map(|c| c.node.as_str())
	}

	pub fn mouse_down(&mut self, scene: &mut Scene, id: &str, input: PointerInput) -> EventDisposition {
		if let Some(holder) = self.captured() {
			debug!("interaction: `{}` pressed while `{}` holds capture", id, holder);
			return EventDisposition::PassThrough;
		}
		let Some(node) = scene.node_mut(id) else {
			return EventDisposition::PassThrough;
		};
		node.pointer = PointerState::Pressed;
		self.capture = Some(Capture {
			node: id.to_string(),
			grab_x: input.x - node.x,
			grab_y: input.y - node.y,
		});
		scene.notify_node_changed(id);
		EventDisposition::PreventDefault
	}

	pub fn mouse_move(
		&mut self,
		scene: &mut Scene,
		input: PointerInput,
		updates: &mut dyn UpdateService,
	) -> EventDisposition {
		let Some(capture) = self.capture.as_ref() else {
			return EventDisposition::PassThrough;
		};
		let Some(node) = scene.node_mut(&capture.node) else {
			self.capture = None;
			return EventDisposition::PassThrough;
		};

		// The grab point stays under the pointer; the clamp only pins the
		// node while the pointer is past the edge.
		node.pointer = PointerState::Dragging;
		node.x = input.x - capture.grab_x;
		node.y = input.y - capture.grab_y;
		clamp_to_container(node, &self.viewport);
		let id = capture.node.clone();
		scene.notify_node_changed(&id);

		if self.viewport.outside_window(input.client_x, input.client_y) {
			info!("interaction: pointer left the window while dragging `{}`", id);
			if let Some(node) = scene.node_mut(&id) {
				updates.commit_node_position(node);
				node.pointer = PointerState::Idle;
			}
			self.capture = None;
			scene.notify_node_changed(&id);
		}
		EventDisposition::PreventDefault
	}

	pub fn mouse_up(
		&mut self,
		scene: &mut Scene,
		_input: PointerInput,
		updates: &mut dyn UpdateService,
		toggles: &mut dyn ToggleService,
	) -> EventDisposition {
		let Some(capture) = self.capture.take() else {
			return EventDisposition::PassThrough;
		};
		let id = capture.node;
		let Some(node) = scene.node_mut(&id) else {
			return EventDisposition::PassThrough;
		};

		match node.pointer {
			PointerState::Dragging => {
				node.pointer = PointerState::Idle;
				updates.commit_node_position(node);
				scene.notify_node_changed(&id);
			}
			PointerState::Pressed | PointerState::Idle => {
				node.pointer = PointerState::Idle;
				clamp_to_container(node, &self.viewport);
				if node.expand == ExpandState::Expanded {
					node.expand = ExpandState::Collapsed;
					prune_leaf_neighbors(scene, &id);
				}
				scene.notify_node_changed(&id);
				if let Some(node) = scene.node(&id) {
					toggles.request_toggle(node);
				}
			}
		}
		EventDisposition::PreventDefault
	}

	/// Drops the capture without touching the node, e.g. when the node was
	/// removed underneath an active press.
	pub fn release_capture(&mut self) {
		self.capture = None;
	}
}

/// Removes every collapsed neighbor of `id` that hangs off it alone.
fn prune_leaf_neighbors(scene: &mut Scene, id: &str) {
	for neighbor in scene.neighbors(id) {
		let is_leaf = scene
			.node(&neighbor)
			.is_some_and(|n| n.expand == ExpandState::Collapsed && n.degree() == 1);
		if is_leaf {
			debug!("interaction: pruning leaf `{}` of `{}`", neighbor, id);
			scene.remove_node(&neighbor);
		}
	}
}
