//! Canvas rendering for the explorer.
//!
//! [`CanvasRenderer`] is the scene's [`Renderer`]: it measures node boxes
//! with the canvas text metrics and flags the frame dirty. The actual
//! painting happens once per animation frame in [`draw`], in two passes:
//! 1. Arcs, with arrowheads and labels
//! 2. Nodes, with the captured node last so it stays on top

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::model::{ArcState, ExpandState, NodeState, PointerState};
use super::scene::{Renderer, Scene};
use super::theme::Theme;

/// Measures nodes on a 2D canvas and records that a repaint is due.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	dirty: Rc<Cell<bool>>,
}

impl CanvasRenderer {
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme, dirty: Rc<Cell<bool>>) -> Self {
		Self { ctx, theme, dirty }
	}
}

impl Renderer for CanvasRenderer {
	fn render_node(&mut self, node: &NodeState) -> (i32, i32) {
		self.dirty.set(true);
		let style = &self.theme.node;
		self.ctx.set_font(style.font);
		let text_width = self
			.ctx
			.measure_text(&node.content)
			.map(|metrics| metrics.width())
			.unwrap_or(node.content.len() as f64 * 7.0);
		let icon_width = if node.icon_url.is_some() {
			style.icon_size + style.padding / 2.0
		} else {
			0.0
		};
		let width = text_width + icon_width + 2.0 * style.padding;
		let height = style.label_height.max(style.icon_size) + 2.0 * style.padding;
		(width.ceil() as i32, height.ceil() as i32)
	}

	fn render_arc(&mut self, _arc: &ArcState) {
		self.dirty.set(true);
	}

	fn detach_node(&mut self, _id: &str) {
		self.dirty.set(true);
	}

	fn detach_arc(&mut self, _id: &str) {
		self.dirty.set(true);
	}
}

/// Icon images, loaded lazily by URL.
#[derive(Default)]
pub struct IconCache {
	images: HashMap<String, HtmlImageElement>,
}

impl IconCache {
	/// The image for `url` if it has finished loading. Starts the load on
	/// first request.
	fn get(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			match HtmlImageElement::new() {
				Ok(image) => {
					image.set_src(url);
					self.images.insert(url.to_string(), image);
				}
				Err(e) => {
					warn!("graph-explorer: cannot create image for {}: {:?}", url, e);
					return None;
				}
			}
		}
		self.images.get(url).filter(|image| image.complete())
	}

	/// Whether some icon is still on its way; the frame must be redrawn then.
	pub fn loading(&self) -> bool {
		self.images.values().any(|image| !image.complete())
	}
}

/// Paints the whole scene.
pub fn draw(
	scene: &Scene,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	icons: &mut IconCache,
	width: f64,
	height: f64,
	captured: Option<&str>,
) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	for arc in scene.arcs() {
		draw_arc(scene, ctx, theme, arc);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for node in scene.nodes().filter(|node| Some(node.id.as_str()) != captured) {
		draw_node(ctx, theme, icons, node);
	}
	if let Some(node) = captured.and_then(|id| scene.node(id)) {
		draw_node(ctx, theme, icons, node);
	}
}

fn is_collapsed_leaf(scene: &Scene, id: &str) -> bool {
	scene
		.node(id)
		.is_some_and(|node| node.degree() == 1 && node.expand == ExpandState::Collapsed)
}

fn draw_arc(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme, arc: &ArcState) {
	let Some(geometry) = arc.geometry else {
		return;
	};
	let dist = geometry.length();
	if dist < 0.001 {
		return;
	}
	let style = &theme.arc;
	let ((x1, y1), (x2, y2)) = (geometry.from, geometry.to);
	let (ux, uy) = ((x2 - x1) / dist, (y2 - y1) / dist);

	ctx.set_stroke_style_str(&style.color.to_css());
	ctx.set_line_width(style.line_width);
	if is_collapsed_leaf(scene, &arc.source) || is_collapsed_leaf(scene, &arc.destination) {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(style.leaf_dash.0),
			&JsValue::from_f64(style.leaf_dash.1),
		));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2 - ux * style.arrow_size, y2 - uy * style.arrow_size);
	ctx.stroke();

	let (back_x, back_y) = (x2 - ux * style.arrow_size, y2 - uy * style.arrow_size);
	let (px, py) = (-uy * style.arrow_size * 0.5, ux * style.arrow_size * 0.5);
	ctx.set_fill_style_str(&style.color.to_css());
	ctx.begin_path();
	ctx.move_to(x2, y2);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	ctx.set_font(style.font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	ctx.set_fill_style_str(&style.label_color.to_css());
	let _ = ctx.fill_text(&arc.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 2.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, theme: &Theme, icons: &mut IconCache, node: &NodeState) {
	let style = &theme.node;
	let (w, h) = (node.width as f64, node.height as f64);
	let (left, top) = (node.x as f64 - w / 2.0, node.y as f64 - h / 2.0);

	if node.pointer == PointerState::Dragging {
		ctx.set_shadow_color(&style.drag_shadow.to_css());
		ctx.set_shadow_blur(12.0);
		ctx.set_shadow_offset_y(4.0);
	}
	ctx.set_fill_style_str(&theme.node_fill(node).to_css());
	ctx.fill_rect(left, top, w, h);
	ctx.set_shadow_color("rgba(0, 0, 0, 0)");
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_offset_y(0.0);

	if node.is_pressed() {
		ctx.set_stroke_style_str(&style.pressed_border.to_css());
		ctx.set_line_width(style.border_width);
		ctx.stroke_rect(left, top, w, h);
	}

	let mut text_left = left + style.padding;
	if let Some(image) = node.icon_url.as_deref().and_then(|url| icons.get(url)) {
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
			image,
			text_left,
			node.y as f64 - style.icon_size / 2.0,
			style.icon_size,
			style.icon_size,
		);
	}
	if node.icon_url.is_some() {
		text_left += style.icon_size + style.padding / 2.0;
	}

	ctx.set_font(style.font);
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&style.label_color.to_css());
	let _ = ctx.fill_text(&node.content, text_left, node.y as f64);
}
