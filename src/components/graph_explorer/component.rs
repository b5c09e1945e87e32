//! Leptos component wrapping the explorer canvas.
//!
//! The component creates an HTML canvas element, opens an [`Explorer`] on the
//! graph data and wires mouse handlers into it. Presses are hit-tested on the
//! canvas; moves and releases are listened for on the window so a pressed
//! node keeps receiving them wherever the pointer goes. An animation loop runs
//! via `requestAnimationFrame`, advancing node motions and repainting when the
//! scene changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::access::MemoryGraph;
use super::explorer::{Explorer, ExplorerConfig};
use super::interaction::{EventDisposition, PointerInput, Viewport};
use super::render::{self, CanvasRenderer, IconCache};
use super::theme::Theme;
use super::types::GraphData;

/// Bundles the exploration session with what is needed to paint it.
struct ExplorerContext {
	explorer: Explorer<MemoryGraph>,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	icons: IconCache,
	dirty: Rc<Cell<bool>>,
	width: f64,
	height: f64,
}

impl ExplorerContext {
	fn input(&self, ev: &MouseEvent) -> PointerInput {
		let rect = self.canvas.get_bounding_client_rect();
		PointerInput {
			x: (ev.client_x() as f64 - rect.left()) as i32,
			y: (ev.client_y() as f64 - rect.top()) as i32,
			client_x: ev.client_x(),
			client_y: ev.client_y(),
		}
	}

	fn set_cursor(&self) {
		let cursor = if self.explorer.captured().is_some() {
			"grabbing"
		} else {
			"grab"
		};
		let _ = web_sys::HtmlElement::style(&self.canvas).set_property("cursor", cursor);
	}
}

type MouseCallback = Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>>;

fn now() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn window_size(window: &Window) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(read(window.inner_width()), read(window.inner_height()))
}

/// Opens a session on `data`, logging instead of failing.
fn open_explorer(
	data: &GraphData,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	dirty: &Rc<Cell<bool>>,
	viewport: Viewport,
) -> Option<Explorer<MemoryGraph>> {
	let graph = match MemoryGraph::from_data(data) {
		Ok(graph) => graph,
		Err(e) => {
			error!("graph-explorer: cannot load graph: {}", e);
			return None;
		}
	};
	let renderer = CanvasRenderer::new(ctx.clone(), theme.clone(), dirty.clone());
	match Explorer::new(graph, Box::new(renderer), viewport, ExplorerConfig::default(), now()) {
		Ok(explorer) => Some(explorer),
		Err(e) => {
			error!("graph-explorer: cannot open explorer: {}", e);
			None
		}
	}
}

fn viewport(width: f64, height: f64, window: &Window) -> Viewport {
	let (ww, wh) = window_size(window);
	Viewport {
		container_width: width as i32,
		container_height: height as i32,
		window_width: ww as i32,
		window_height: wh as i32,
	}
}

/// Renders an interactive graph explorer on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing. `theme` picks a theme by name.
#[component]
pub fn ExplorerCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] theme: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<ExplorerContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let move_cb: MouseCallback = Rc::new(RefCell::new(None));
	let up_cb: MouseCallback = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let (move_cb_init, up_cb_init) = (move_cb.clone(), up_cb.clone());

	// Mounts once. Listeners and the animation loop live as long as the
	// component; later data changes are handled by the reload effect below.
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("graph-explorer: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("graph-explorer: canvas has no 2d context");
				return;
			}
		};

		let theme = theme.as_deref().map(Theme::named).unwrap_or_default();
		let dirty = Rc::new(Cell::new(true));
		let Some(explorer) =
			open_explorer(&data.get_untracked(), &ctx, &theme, &dirty, viewport(w, h, &window))
		else {
			return;
		};

		*context_init.borrow_mut() = Some(ExplorerContext {
			explorer,
			canvas: canvas.clone(),
			ctx,
			theme,
			icons: IconCache::default(),
			dirty,
			width: w,
			height: h,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.width = nw;
					c.height = nh;
					c.explorer.set_viewport(viewport(nw, nh, &win));
					c.dirty.set(true);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_mm = context_init.clone();
		*move_cb_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			if let Some(ref mut c) = *context_mm.borrow_mut() {
				let input = c.input(&ev);
				if c.explorer.mouse_move(input) == EventDisposition::PreventDefault {
					ev.prevent_default();
				}
				c.set_cursor();
			}
		}));
		if let Some(ref cb) = *move_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let context_mu = context_init.clone();
		*up_cb_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			if let Some(ref mut c) = *context_mu.borrow_mut() {
				let input = c.input(&ev);
				match c.explorer.mouse_up(input, now()) {
					Ok(EventDisposition::PreventDefault) => ev.prevent_default(),
					Ok(EventDisposition::PassThrough) => {}
					Err(e) => {
						ev.prevent_default();
						warn!("graph-explorer: toggle failed: {}", e);
					}
				}
				c.set_cursor();
			}
		}));
		if let Some(ref cb) = *up_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.explorer.is_animating() {
					c.explorer.tick(now());
				}
				if c.dirty.replace(false) || c.icons.loading() {
					render::draw(
						c.explorer.scene(),
						&c.ctx,
						&c.theme,
						&mut c.icons,
						c.width,
						c.height,
						c.explorer.captured(),
					);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_reload = context.clone();
	Effect::new(move |mounted: Option<()>| {
		let data = data.get();
		if mounted.is_none() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref mut c) = *context_reload.borrow_mut() {
			let viewport = viewport(c.width, c.height, &window);
			if let Some(explorer) = open_explorer(&data, &c.ctx, &c.theme, &c.dirty, viewport) {
				c.explorer.release();
				c.explorer = explorer;
				c.dirty.set(true);
				info!("graph-explorer: reloaded graph data");
			}
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let input = c.input(&ev);
			let Some(id) = c.explorer.node_at(input.x, input.y).map(str::to_string) else {
				return;
			};
			if c.explorer.mouse_down(&id, input) == EventDisposition::PreventDefault {
				ev.prevent_default();
			}
			c.set_cursor();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-explorer-canvas"
			on:mousedown=on_mousedown
			style="display: block; cursor: grab;"
		/>
	}
}
