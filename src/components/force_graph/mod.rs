//! Force-directed graph canvas: layout engine, view transform, picking,
//! gestures, drawing and the Leptos component tying them to the browser.

mod component;
mod frame;
mod graph;
mod interaction;
mod render;
mod simulation;
mod state;
mod transform;
mod types;

pub use component::{ForceGraphCanvas, MountError};
pub use frame::FrameScheduler;
pub use graph::{Graph, Link, Node, Point, ResolvedLink};
pub use hit_test::{CLICK_RADIUS, find_node_at};
pub use interaction::{
	DRAG_THRESHOLD, Gesture, InteractionController, PointerInput, Response, Targets,
};
pub use render::{NODE_RADIUS, Scene, Surface, render};
pub use simulation::{Simulation, SimulationConfig, SimulationStatus};
pub use state::GraphSession;
pub use transform::{ViewTransform, ZOOM_MAX, ZOOM_MIN};
pub use types::{GraphData, GraphLink, GraphNode};
