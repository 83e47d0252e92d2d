//! Gesture state machine for the canvas.
//!
//! Raw browser events are mapped to [`PointerInput`] by the component; this
//! module decides what they mean. A press on a node becomes a node drag, a
//! press elsewhere becomes a pan, and a press released before moving
//! [`DRAG_THRESHOLD`] pixels is a click that only touches the selection.

use log::debug;

use super::graph::{Graph, Point};
use super::hit_test::find_node_at;
use super::simulation::Simulation;
use super::transform::ViewTransform;

/// Screen distance a press must travel before it counts as a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;
const PRIMARY_BUTTON: i16 = 0;

/// Screen-space input, already relative to the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
	/// A button went down at `(x, y)`.
	Down {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
		/// DOM button number; only 0 acts.
		button: i16,
	},
	/// The pointer moved to `(x, y)`.
	Move {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
	},
	/// The button was released at `(x, y)`.
	Up {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
	},
	/// The pointer left the canvas.
	Leave,
	/// Scroll over `(x, y)`; positive `delta_y` zooms out.
	Wheel {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
		/// Scroll amount, sign only.
		delta_y: f64,
	},
	/// Two-finger gesture around the midpoint `(x, y)`, fingers `distance` apart.
	PinchStart {
		/// Midpoint x.
		x: f64,
		/// Midpoint y.
		y: f64,
		/// Finger separation in pixels.
		distance: f64,
	},
	/// The pinch changed.
	PinchMove {
		/// Midpoint x.
		x: f64,
		/// Midpoint y.
		y: f64,
		/// Finger separation in pixels.
		distance: f64,
	},
	/// Fewer than two fingers remain.
	PinchEnd,
}

/// What the pointer is doing right now.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	/// Nothing held.
	Idle,
	/// Press on empty canvas.
	Panning {
		/// Where the press started.
		origin: Point,
		/// Last pointer position applied to the pan.
		last: Point,
		/// Moved past [`DRAG_THRESHOLD`]; no longer a click.
		engaged: bool,
	},
	/// Pinch in progress.
	Zooming {
		/// Scale when the pinch started.
		start_k: f64,
		/// Finger separation when the pinch started.
		start_distance: f64,
	},
	/// Press on a node.
	DraggingNode {
		/// Id of the pressed node.
		id: String,
		/// Where the press started.
		origin: Point,
		/// Moved past [`DRAG_THRESHOLD`]; the node is pinned to the pointer.
		engaged: bool,
	},
}

/// What the caller has to do after an input was handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
	/// Something visible changed.
	pub redraw: bool,
	/// The selected id changed.
	pub selection_changed: bool,
}

impl Response {
	fn redraw() -> Self {
		Self {
			redraw: true,
			selection_changed: false,
		}
	}
}

/// The layout state an input may act on.
pub struct Targets<'a> {
	/// Nodes that may be dragged.
	pub graph: &'a mut Graph,
	/// Heated while a node is dragged.
	pub simulation: &'a mut Simulation,
	/// Panned and zoomed.
	pub transform: &'a mut ViewTransform,
}

/// Turns [`PointerInput`]s into drags, pans, zooms and selection changes.
#[derive(Clone, Debug)]
pub struct InteractionController {
	gesture: Gesture,
	selected: Option<String>,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			gesture: Gesture::Idle,
			selected: None,
		}
	}
}

impl InteractionController {
	/// The gesture in progress.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Id of the selected node, if any.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Applies one input to `t` and reports what has to follow.
	pub fn handle(&mut self, input: PointerInput, t: Targets<'_>) -> Response {
		match input {
			PointerInput::Down { x, y, button } => self.on_down(x, y, button, t),
			PointerInput::Move { x, y } => self.on_move(x, y, t),
			PointerInput::Up { .. } => self.on_up(t),
			PointerInput::Leave => self.on_leave(t),
			PointerInput::Wheel { x, y, delta_y } => self.on_wheel(x, y, delta_y, t),
			PointerInput::PinchStart { x, y, distance } => self.on_pinch_start(x, y, distance, t),
			PointerInput::PinchMove { x, y, distance } => self.on_pinch_move(x, y, distance, t),
			PointerInput::PinchEnd => {
				if matches!(self.gesture, Gesture::Zooming { .. }) {
					self.gesture = Gesture::Idle;
				}
				Response::default()
			}
		}
	}

	fn on_down(&mut self, x: f64, y: f64, button: i16, t: Targets<'_>) -> Response {
		if button != PRIMARY_BUTTON || self.gesture != Gesture::Idle {
			return Response::default();
		}
		self.gesture = match find_node_at(t.graph, t.transform, x, y) {
			Some(idx) => Gesture::DraggingNode {
				id: t.graph.nodes()[idx].id.clone(),
				origin: (x, y),
				engaged: false,
			},
			None => Gesture::Panning {
				origin: (x, y),
				last: (x, y),
				engaged: false,
			},
		};
		Response::default()
	}

	fn on_move(&mut self, x: f64, y: f64, t: Targets<'_>) -> Response {
		match &mut self.gesture {
			Gesture::DraggingNode {
				id,
				origin,
				engaged,
			} => {
				if !*engaged {
					if !past_threshold(*origin, (x, y)) {
						return Response::default();
					}
					*engaged = true;
					debug!("drag start on node {id:?}");
					let was_running = t.simulation.is_running();
					let hot = t.simulation.config().drag_alpha_target;
					t.simulation.set_alpha_target(hot);
					if !was_running {
						t.simulation.restart();
					}
				}
				let pinned = t.transform.screen_to_world(x, y);
				if let Some(node) = t.graph.node_mut(id) {
					node.fixed = Some(pinned);
					node.position = Some(pinned);
				}
				Response::redraw()
			}
			Gesture::Panning {
				origin,
				last,
				engaged,
			} => {
				if !*engaged {
					if !past_threshold(*origin, (x, y)) {
						return Response::default();
					}
					*engaged = true;
				}
				t.transform.apply_pan(x - last.0, y - last.1);
				*last = (x, y);
				Response::redraw()
			}
			Gesture::Idle | Gesture::Zooming { .. } => Response::default(),
		}
	}

	fn on_up(&mut self, t: Targets<'_>) -> Response {
		match std::mem::replace(&mut self.gesture, Gesture::Idle) {
			Gesture::DraggingNode { id, engaged, .. } => {
				if engaged {
					release(&id, t);
					Response::redraw()
				} else {
					let next = (self.selected.as_deref() != Some(id.as_str())).then_some(id);
					self.select(next)
				}
			}
			Gesture::Panning { engaged: false, .. } => self.select(None),
			zooming @ Gesture::Zooming { .. } => {
				// A pinch only ends on PinchEnd.
				self.gesture = zooming;
				Response::default()
			}
			Gesture::Panning { .. } | Gesture::Idle => Response::default(),
		}
	}

	fn on_leave(&mut self, t: Targets<'_>) -> Response {
		match std::mem::replace(&mut self.gesture, Gesture::Idle) {
			Gesture::DraggingNode { id, engaged, .. } => {
				if engaged {
					release(&id, t);
				}
				Response::redraw()
			}
			zooming @ Gesture::Zooming { .. } => {
				self.gesture = zooming;
				Response::default()
			}
			Gesture::Panning { .. } | Gesture::Idle => Response::default(),
		}
	}

	fn on_wheel(&mut self, x: f64, y: f64, delta_y: f64, t: Targets<'_>) -> Response {
		if delta_y == 0.0 || !self.zoom_allowed_at(x, y, &t) {
			return Response::default();
		}
		let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
		let k = t.transform.k() * factor;
		t.transform.apply_zoom((x, y), k);
		Response::redraw()
	}

	fn on_pinch_start(&mut self, x: f64, y: f64, distance: f64, t: Targets<'_>) -> Response {
		if distance <= 0.0 || !self.zoom_allowed_at(x, y, &t) {
			return Response::default();
		}
		self.gesture = Gesture::Zooming {
			start_k: t.transform.k(),
			start_distance: distance,
		};
		Response::default()
	}

	fn on_pinch_move(&mut self, x: f64, y: f64, distance: f64, t: Targets<'_>) -> Response {
		let Gesture::Zooming {
			start_k,
			start_distance,
		} = self.gesture
		else {
			return Response::default();
		};
		t.transform.apply_zoom((x, y), start_k * distance / start_distance);
		Response::redraw()
	}

	/// Zoom never competes with a node drag, nor starts over a node.
	fn zoom_allowed_at(&self, x: f64, y: f64, t: &Targets<'_>) -> bool {
		!matches!(self.gesture, Gesture::DraggingNode { .. })
			&& find_node_at(t.graph, t.transform, x, y).is_none()
	}

	fn select(&mut self, next: Option<String>) -> Response {
		let changed = self.selected != next;
		if changed {
			debug!("selection {:?} -> {:?}", self.selected, next);
		}
		self.selected = next;
		Response {
			redraw: true,
			selection_changed: changed,
		}
	}
}

fn past_threshold(origin: Point, p: Point) -> bool {
	let (dx, dy) = (p.0 - origin.0, p.1 - origin.1);
	dx * dx + dy * dy >= DRAG_THRESHOLD * DRAG_THRESHOLD
}

/// Hands a dragged node back to the simulation.
fn release(id: &str, t: Targets<'_>) {
	debug!("drag end on node {id:?}");
	if let Some(node) = t.graph.node_mut(id) {
		node.fixed = None;
	}
	t.simulation.set_alpha_target(0.0);
}
