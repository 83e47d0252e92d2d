//! Caller-facing input records.

/// A node as supplied by the caller. Position is optional; unplaced nodes are
/// seeded by the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphNode {
	/// Unique identifier; duplicates resolve to the last one.
	pub id: String,
	/// Starting x in world space.
	pub x: Option<f64>,
	/// Starting y in world space.
	pub y: Option<f64>,
}

impl GraphNode {
	/// An unplaced node.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	/// Supplies a starting position in world space.
	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}
}

/// An undirected link between two node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
}

impl GraphLink {
	/// Link from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Everything a canvas is fed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes in input order.
	pub nodes: Vec<GraphNode>,
	/// Links; unknown endpoints are skipped.
	pub links: Vec<GraphLink>,
}
