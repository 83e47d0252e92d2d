use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use send_wrapper::SendWrapper;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Touch, TouchEvent, WheelEvent, Window,
};

use super::interaction::PointerInput;
use super::simulation::SimulationConfig;
use super::state::GraphSession;
use super::types::GraphData;

/// Why a canvas could not be brought up.
#[derive(Debug, Error)]
pub enum MountError {
	#[error("no browser window")]
	/// `window` is not available, e.g. outside a browser.
	NoWindow,
	#[error("2d context unavailable: {0}")]
	/// `getContext("2d")` failed or returned null.
	ContextUnavailable(String),
	#[error("canvas context is not a CanvasRenderingContext2d")]
	/// `getContext` returned something other than a 2D context.
	ContextType,
	#[error("failed to attach listener: {0}")]
	/// A window listener could not be attached.
	Listener(String),
}

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Driver {
	session: GraphSession,
	ctx: CanvasRenderingContext2d,
	window: Window,
	frame_handle: Option<i32>,
	tick_handle: Option<i32>,
}

/// Browser-side owner of a session: animation-frame handles and the
/// callbacks they invoke. All of it is dropped on teardown.
#[derive(Clone, Default)]
struct Runtime {
	driver: Rc<RefCell<Option<Driver>>>,
	frame_cb: Callback,
	tick_cb: Callback,
	resize_cb: Callback,
}

impl Runtime {
	/// Schedules the frame and tick callbacks the session currently wants,
	/// never more than one of each.
	fn wake(&self) {
		let mut guard = self.driver.borrow_mut();
		let Some(d) = guard.as_mut() else {
			return;
		};
		if d.session.frame_pending() && d.frame_handle.is_none() {
			if let Some(cb) = self.frame_cb.borrow().as_ref() {
				d.frame_handle = d
					.window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok();
			}
		}
		if d.session.is_running() && d.tick_handle.is_none() {
			if let Some(cb) = self.tick_cb.borrow().as_ref() {
				d.tick_handle = d
					.window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok();
			}
		}
	}

	fn on_frame(&self) {
		if let Some(d) = self.driver.borrow_mut().as_mut() {
			d.frame_handle = None;
			if d.session.begin_frame() {
				d.session.draw(&mut d.ctx);
			}
		}
		self.wake();
	}

	fn on_tick(&self) {
		if let Some(d) = self.driver.borrow_mut().as_mut() {
			d.tick_handle = None;
			d.session.tick();
		}
		self.wake();
	}

	/// Feeds one input to the session. Returns the new selection if it changed.
	fn input(&self, input: PointerInput) -> Option<Option<String>> {
		let changed = self.driver.borrow_mut().as_mut().and_then(|d| {
			let response = d.session.handle_input(input);
			response
				.selection_changed
				.then(|| d.session.selected().map(str::to_owned))
		});
		self.wake();
		changed
	}

	fn resize(&self, width: f64, height: f64) {
		if let Some(d) = self.driver.borrow_mut().as_mut() {
			d.session.resize(width, height);
		}
		self.wake();
	}

	fn teardown(&self) {
		if let Some(mut d) = self.driver.borrow_mut().take() {
			if let Some(handle) = d.frame_handle.take() {
				let _ = d.window.cancel_animation_frame(handle);
			}
			if let Some(handle) = d.tick_handle.take() {
				let _ = d.window.cancel_animation_frame(handle);
			}
			if let Some(cb) = self.resize_cb.borrow_mut().take() {
				let _ = d
					.window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			d.session.teardown();
		}
		self.frame_cb.borrow_mut().take();
		self.tick_cb.borrow_mut().take();
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn mount(
	rt: &Runtime,
	canvas: &HtmlCanvasElement,
	data: &GraphData,
	(w, h): (f64, f64),
	fullscreen: bool,
	config: SimulationConfig,
) -> Result<(), MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	canvas.set_width(w.max(0.0) as u32);
	canvas.set_height(h.max(0.0) as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?
		.ok_or_else(|| MountError::ContextUnavailable("null context".into()))?
		.dyn_into()
		.map_err(|_| MountError::ContextType)?;

	*rt.driver.borrow_mut() = Some(Driver {
		session: GraphSession::new(data, w, h, config),
		ctx,
		window: window.clone(),
		frame_handle: None,
		tick_handle: None,
	});

	let rt_frame = rt.clone();
	*rt.frame_cb.borrow_mut() = Some(Closure::new(move || rt_frame.on_frame()));
	let rt_tick = rt.clone();
	*rt.tick_cb.borrow_mut() = Some(Closure::new(move || rt_tick.on_tick()));

	if fullscreen {
		let (rt_resize, canvas_resize) = (rt.clone(), canvas.clone());
		*rt.resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			rt_resize.resize(nw, nh);
		}));
		if let Some(cb) = rt.resize_cb.borrow().as_ref() {
			window
				.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				.map_err(|e| MountError::Listener(format!("{e:?}")))?;
		}
	}

	rt.wake();
	Ok(())
}

type CanvasRef = NodeRef<leptos::html::Canvas>;

fn canvas_point(canvas_ref: CanvasRef, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((client_x - rect.left(), client_y - rect.top()))
}

fn touch_point(canvas_ref: CanvasRef, touch: &Touch) -> Option<(f64, f64)> {
	canvas_point(canvas_ref, touch.client_x() as f64, touch.client_y() as f64)
}

/// Midpoint and finger distance of the first two active touches.
fn pinch(canvas_ref: CanvasRef, ev: &TouchEvent) -> Option<(f64, f64, f64)> {
	let touches = ev.touches();
	let a = touch_point(canvas_ref, &touches.get(0)?)?;
	let b = touch_point(canvas_ref, &touches.get(1)?)?;
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	Some(((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0, (dx * dx + dy * dy).sqrt()))
}

/// A fresh session starts with nothing selected; the mirror has to agree.
fn clear_selection(selected: Option<RwSignal<Option<String>>>) {
	if let Some(signal) = selected {
		if signal.get_untracked().is_some() {
			signal.set(None);
		}
	}
}

/// Canvas showing `data` as an interactive force-directed layout.
///
/// Drag a node to pin it while the layout follows, drag the background to
/// pan, scroll or pinch to zoom, click a node to select it. The selected id
/// is mirrored into `selected` when given, and cleared whenever `data`
/// changes.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<SimulationConfig>,
	#[prop(optional)] selected: Option<RwSignal<Option<String>>>,
) -> impl IntoView {
	let canvas_ref = CanvasRef::new();
	let rt = Runtime::default();
	let rt_init = rt.clone();
	let config = config.unwrap_or_default();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let graph = data.get();
		rt_init.teardown();
		clear_selection(selected);

		let size = if fullscreen {
			web_sys::window()
				.map(|w| window_size(&w))
				.unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};

		match mount(&rt_init, &canvas, &graph, size, fullscreen, config.clone()) {
			Ok(()) => info!("force graph mounted at {}x{}", size.0, size.1),
			Err(e) => {
				error!("force graph not mounted: {e}");
				rt_init.teardown();
			}
		}
	});

	let rt_cleanup = SendWrapper::new(rt.clone());
	on_cleanup(move || rt_cleanup.teardown());

	let dispatch = move |input: PointerInput| {
		if let (Some(changed), Some(signal)) = (rt.input(input), selected) {
			signal.set(changed);
		}
	};

	let d = dispatch.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) {
			d(PointerInput::Down {
				x,
				y,
				button: ev.button(),
			});
		}
	};

	let d = dispatch.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) {
			d(PointerInput::Move { x, y });
		}
	};

	let d = dispatch.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) {
			d(PointerInput::Up { x, y });
		}
	};

	let d = dispatch.clone();
	let on_mouseleave = move |_: MouseEvent| d(PointerInput::Leave);

	let d = dispatch.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) {
			d(PointerInput::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
		}
	};

	let d = dispatch.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		match ev.touches().length() {
			1 => {
				if let Some((x, y)) = ev.touches().get(0).and_then(|t| touch_point(canvas_ref, &t)) {
					d(PointerInput::Down { x, y, button: 0 });
				}
			}
			2 => {
				if let Some((x, y, distance)) = pinch(canvas_ref, &ev) {
					d(PointerInput::PinchStart { x, y, distance });
				}
			}
			_ => {}
		}
	};

	let d = dispatch.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		match ev.touches().length() {
			1 => {
				if let Some((x, y)) = ev.touches().get(0).and_then(|t| touch_point(canvas_ref, &t)) {
					d(PointerInput::Move { x, y });
				}
			}
			2 => {
				if let Some((x, y, distance)) = pinch(canvas_ref, &ev) {
					d(PointerInput::PinchMove { x, y, distance });
				}
			}
			_ => {}
		}
	};

	let d = dispatch;
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		if ev.touches().length() > 1 {
			return;
		}
		d(PointerInput::PinchEnd);
		if ev.touches().length() == 0 {
			match ev
				.changed_touches()
				.get(0)
				.and_then(|t| touch_point(canvas_ref, &t))
			{
				Some((x, y)) => d(PointerInput::Up { x, y }),
				None => d(PointerInput::Leave),
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend.clone()
			on:touchcancel=on_touchend
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
