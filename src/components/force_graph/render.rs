use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::graph::Graph;
use super::transform::ViewTransform;

/// Node circle radius in world units.
pub const NODE_RADIUS: f64 = 5.0;

const LINK_COLOR: &str = "#aaa";
const NODE_FILL: &str = "steelblue";
const NODE_STROKE: &str = "navy";
const SELECTED_FILL: &str = "red";
const SELECTED_STROKE: &str = "darkred";

/// The drawing primitives the renderer needs from a 2D surface.
pub trait Surface {
	/// Clears the whole surface, ignoring any transform.
	fn clear(&mut self, width: f64, height: f64);
	/// Pushes the transform and styles.
	fn save(&mut self);
	/// Pops what [`Surface::save`] pushed.
	fn restore(&mut self);
	/// Moves the origin.
	fn translate(&mut self, x: f64, y: f64);
	/// Scales both axes by `k`.
	fn scale(&mut self, k: f64);
	/// Starts a new path.
	fn begin_path(&mut self);
	/// Starts a subpath at `(x, y)`.
	fn move_to(&mut self, x: f64, y: f64);
	/// Adds a segment to `(x, y)`.
	fn line_to(&mut self, x: f64, y: f64);
	/// Adds a full circle to the current path.
	fn circle(&mut self, x: f64, y: f64, radius: f64);
	/// CSS color for strokes.
	fn set_stroke_style(&mut self, color: &str);
	/// CSS color for fills.
	fn set_fill_style(&mut self, color: &str);
	/// Stroke width in current units.
	fn set_line_width(&mut self, width: f64);
	/// Strokes the current path.
	fn stroke(&mut self);
	/// Fills the current path.
	fn fill(&mut self);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&mut self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&mut self, k: f64) {
		let _ = CanvasRenderingContext2d::scale(self, k, k);
	}

	fn begin_path(&mut self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&mut self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&mut self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn circle(&mut self, x: f64, y: f64, radius: f64) {
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
	}

	fn set_stroke_style(&mut self, color: &str) {
		self.set_stroke_style_str(color);
	}

	fn set_fill_style(&mut self, color: &str) {
		self.set_fill_style_str(color);
	}

	fn set_line_width(&mut self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn stroke(&mut self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill(&mut self) {
		CanvasRenderingContext2d::fill(self);
	}
}

/// Everything one frame is drawn from.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
	/// Nodes and links to draw.
	pub graph: &'a Graph,
	/// Pan and zoom applied to the whole scene.
	pub transform: &'a ViewTransform,
	/// Node drawn highlighted.
	pub selected: Option<&'a str>,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
}

/// Draws links, then nodes on top. A surface without area is left untouched.
pub fn render<S: Surface + ?Sized>(scene: &Scene<'_>, surface: &mut S) {
	if !(scene.width > 0.0 && scene.height > 0.0) {
		return;
	}
	let k = scene.transform.k();

	surface.save();
	surface.clear(scene.width, scene.height);
	surface.translate(scene.transform.x(), scene.transform.y());
	surface.scale(k);
	draw_links(scene, surface, k);
	draw_nodes(scene, surface, k);
	surface.restore();
}

fn draw_links<S: Surface + ?Sized>(scene: &Scene<'_>, surface: &mut S, k: f64) {
	let nodes = scene.graph.nodes();
	surface.begin_path();
	surface.set_stroke_style(LINK_COLOR);
	surface.set_line_width(1.0 / k);
	for link in scene.graph.resolved_links() {
		if let (Some((x1, y1)), Some((x2, y2))) =
			(nodes[link.source].position, nodes[link.target].position)
		{
			surface.move_to(x1, y1);
			surface.line_to(x2, y2);
		}
	}
	surface.stroke();
}

fn draw_nodes<S: Surface + ?Sized>(scene: &Scene<'_>, surface: &mut S, k: f64) {
	for node in scene.graph.nodes() {
		let Some((x, y)) = node.position else {
			continue;
		};
		let (fill, stroke) = if scene.selected == Some(node.id.as_str()) {
			(SELECTED_FILL, SELECTED_STROKE)
		} else {
			(NODE_FILL, NODE_STROKE)
		};

		surface.begin_path();
		surface.circle(x, y, NODE_RADIUS);
		surface.set_fill_style(fill);
		surface.fill();
		surface.set_stroke_style(stroke);
		surface.set_line_width(1.0 / k);
		surface.stroke();
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	#[derive(Clone, Debug, PartialEq)]
	pub(crate) enum Op {
		Clear(f64, f64),
		Save,
		Restore,
		Translate(f64, f64),
		Scale(f64),
		BeginPath,
		MoveTo(f64, f64),
		LineTo(f64, f64),
		Circle(f64, f64, f64),
		StrokeStyle(String),
		FillStyle(String),
		LineWidth(f64),
		Stroke,
		Fill,
	}

	#[derive(Debug, Default)]
	pub(crate) struct Recorder {
		pub ops: Vec<Op>,
	}

	impl Surface for Recorder {
		fn clear(&mut self, width: f64, height: f64) {
			self.ops.push(Op::Clear(width, height));
		}
		fn save(&mut self) {
			self.ops.push(Op::Save);
		}
		fn restore(&mut self) {
			self.ops.push(Op::Restore);
		}
		fn translate(&mut self, x: f64, y: f64) {
			self.ops.push(Op::Translate(x, y));
		}
		fn scale(&mut self, k: f64) {
			self.ops.push(Op::Scale(k));
		}
		fn begin_path(&mut self) {
			self.ops.push(Op::BeginPath);
		}
		fn move_to(&mut self, x: f64, y: f64) {
			self.ops.push(Op::MoveTo(x, y));
		}
		fn line_to(&mut self, x: f64, y: f64) {
			self.ops.push(Op::LineTo(x, y));
		}
		fn circle(&mut self, x: f64, y: f64, radius: f64) {
			self.ops.push(Op::Circle(x, y, radius));
		}
		fn set_stroke_style(&mut self, color: &str) {
			self.ops.push(Op::StrokeStyle(color.to_string()));
		}
		fn set_fill_style(&mut self, color: &str) {
			self.ops.push(Op::FillStyle(color.to_string()));
		}
		fn set_line_width(&mut self, width: f64) {
			self.ops.push(Op::LineWidth(width));
		}
		fn stroke(&mut self) {
			self.ops.push(Op::Stroke);
		}
		fn fill(&mut self) {
			self.ops.push(Op::Fill);
		}
	}

	fn two_nodes() -> Graph {
		Graph::from_data(&GraphData {
			nodes: vec![GraphNode::new("a").at(1.0, 2.0), GraphNode::new("b").at(3.0, 4.0)],
			links: vec![GraphLink::new("a", "b")],
		})
	}

	fn draw(graph: &Graph, transform: &ViewTransform, selected: Option<&str>) -> Vec<Op> {
		let mut recorder = Recorder::default();
		let scene = Scene {
			graph,
			transform,
			selected,
			width: 800.0,
			height: 600.0,
		};
		render(&scene, &mut recorder);
		recorder.ops
	}

	#[test]
	fn clears_then_applies_transform() {
		let mut view = ViewTransform::default();
		view.apply_zoom((0.0, 0.0), 2.0);
		view.apply_pan(10.0, 20.0);
		let ops = draw(&two_nodes(), &view, None);

		assert_eq!(
			&ops[..4],
			&[Op::Save, Op::Clear(800.0, 600.0), Op::Translate(10.0, 20.0), Op::Scale(2.0)]
		);
		assert_eq!(ops.last(), Some(&Op::Restore));
	}

	#[test]
	fn links_are_drawn_before_nodes() {
		let ops = draw(&two_nodes(), &ViewTransform::default(), None);

		let line = ops.iter().position(|op| *op == Op::LineTo(3.0, 4.0)).unwrap();
		let first_circle = ops
			.iter()
			.position(|op| matches!(op, Op::Circle(..)))
			.unwrap();
		assert!(ops.contains(&Op::MoveTo(1.0, 2.0)));
		assert!(line < first_circle);
		assert!(ops.contains(&Op::Circle(3.0, 4.0, NODE_RADIUS)));
	}

	#[test]
	fn line_widths_are_zoom_compensated() {
		let mut view = ViewTransform::default();
		view.apply_zoom((0.0, 0.0), 4.0);
		let ops = draw(&two_nodes(), &view, None);

		let widths: Vec<_> = ops
			.iter()
			.filter_map(|op| match op {
				Op::LineWidth(w) => Some(*w),
				_ => None,
			})
			.collect();
		assert_eq!(widths, vec![0.25; 3]);
	}

	#[test]
	fn selected_node_uses_highlight_colors() {
		let ops = draw(&two_nodes(), &ViewTransform::default(), Some("b"));

		let fills: Vec<_> = ops
			.iter()
			.filter_map(|op| match op {
				Op::FillStyle(c) => Some(c.as_str()),
				_ => None,
			})
			.collect();
		assert_eq!(fills, vec![NODE_FILL, SELECTED_FILL]);
		assert!(ops.contains(&Op::StrokeStyle(SELECTED_STROKE.into())));
	}

	#[test]
	fn dangling_link_draws_nothing() {
		let graph = Graph::from_data(&GraphData {
			nodes: vec![GraphNode::new("A").at(0.0, 0.0)],
			links: vec![GraphLink::new("A", "missing")],
		});
		let ops = draw(&graph, &ViewTransform::default(), None);

		assert!(!ops.iter().any(|op| matches!(op, Op::MoveTo(..) | Op::LineTo(..))));
		assert_eq!(ops.iter().filter(|op| matches!(op, Op::Circle(..))).count(), 1);
	}

	#[test]
	fn unplaced_nodes_are_skipped() {
		let graph = Graph::from_data(&GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b").at(0.0, 0.0)],
			links: vec![GraphLink::new("a", "b")],
		});
		let ops = draw(&graph, &ViewTransform::default(), None);

		assert!(!ops.iter().any(|op| matches!(op, Op::MoveTo(..))));
		assert_eq!(ops.iter().filter(|op| matches!(op, Op::Circle(..))).count(), 1);
	}

	#[test]
	fn empty_surface_is_a_no_op() {
		let graph = two_nodes();
		let view = ViewTransform::default();
		for (width, height) in [(0.0, 600.0), (800.0, -1.0)] {
			let mut recorder = Recorder::default();
			let scene = Scene {
				graph: &graph,
				transform: &view,
				selected: None,
				width,
				height,
			};
			render(&scene, &mut recorder);
			assert!(recorder.ops.is_empty());
		}
	}
}
