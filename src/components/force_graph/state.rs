use log::{debug, info};

use super::frame::FrameScheduler;
use super::graph::Graph;
use super::interaction::{InteractionController, PointerInput, Response, Targets};
use super::render::{self, Scene, Surface};
use super::simulation::{Simulation, SimulationConfig, SimulationStatus};
use super::transform::ViewTransform;
use super::types::GraphData;

/// Everything one mounted canvas owns between creation and teardown.
///
/// Inputs and ticks mutate state and mark a frame as pending; the host
/// draws at most once per pending frame. After [`GraphSession::teardown`]
/// the session ignores inputs and ticks and never asks for another frame.
pub struct GraphSession {
	graph: Graph,
	simulation: Simulation,
	transform: ViewTransform,
	controller: InteractionController,
	frames: FrameScheduler,
	width: f64,
	height: f64,
	torn_down: bool,
}

impl GraphSession {
	/// Builds the graph, seeds the layout and asks for the first frame.
	pub fn new(data: &GraphData, width: f64, height: f64, config: SimulationConfig) -> Self {
		let mut graph = Graph::from_data(data);
		let mut simulation = Simulation::new(config);
		simulation.initialize(&mut graph, width, height);
		info!(
			"graph session: {} nodes, {} links ({} resolved), {width}x{height}",
			graph.len(),
			graph.links().len(),
			graph.resolved_links().len()
		);

		let mut frames = FrameScheduler::new();
		frames.request();

		Self {
			graph,
			simulation,
			transform: ViewTransform::default(),
			controller: InteractionController::default(),
			frames,
			width,
			height,
			torn_down: false,
		}
	}

	/// The laid-out graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// The layout engine.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// The current pan and zoom.
	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	/// Id of the selected node, if any.
	pub fn selected(&self) -> Option<&str> {
		self.controller.selected()
	}

	/// Whether the host should keep scheduling ticks.
	pub fn is_running(&self) -> bool {
		!self.torn_down && self.simulation.is_running()
	}

	/// Whether a frame is waiting to be drawn.
	pub fn frame_pending(&self) -> bool {
		self.frames.is_pending()
	}

	/// Routes one input through the gesture state machine.
	pub fn handle_input(&mut self, input: PointerInput) -> Response {
		if self.torn_down {
			return Response::default();
		}
		let response = self.controller.handle(
			input,
			Targets {
				graph: &mut self.graph,
				simulation: &mut self.simulation,
				transform: &mut self.transform,
			},
		);
		if response.redraw {
			self.frames.request();
		}
		response
	}

	/// One simulation step; every completed step asks for a frame.
	pub fn tick(&mut self) -> SimulationStatus {
		if !self.is_running() {
			return SimulationStatus::Idle;
		}
		let status = self.simulation.tick(&mut self.graph);
		self.frames.request();
		status
	}

	/// Adopts a new canvas size; the centring force follows it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.resize(width, height);
		self.frames.request();
	}

	/// Consumes the pending frame. Returns `false` if there is nothing to draw.
	pub fn begin_frame(&mut self) -> bool {
		self.frames.begin_frame()
	}

	/// Draws the current state onto `surface`.
	pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
		let scene = Scene {
			graph: &self.graph,
			transform: &self.transform,
			selected: self.selected(),
			width: self.width,
			height: self.height,
		};
		render::render(&scene, surface);
	}

	/// Stops ticks and frames for good.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.torn_down = true;
		self.frames.cancel();
		debug!("graph session torn down");
	}
}
