//! Owned node and link records for one visualization session.
//!
//! Links refer to nodes by id. Resolution to node indices happens once, when
//! the graph is built, so the simulation and the renderer work on plain
//! indices into [`Graph::nodes`] and never hold references into it.

use std::collections::HashMap;

use log::warn;

use super::types::GraphData;

/// A world-space point or vector.
pub type Point = (f64, f64);

/// One laid-out node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Caller-supplied identifier.
	pub id: String,
	/// `None` until the node has been placed.
	pub position: Option<Point>,
	/// Displacement applied by the next integration step.
	pub velocity: Point,
	/// Pins the node while set; the integrator copies it into `position`.
	pub fixed: Option<Point>,
}

impl Node {
	/// An unplaced, unpinned node.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			position: None,
			velocity: (0.0, 0.0),
			fixed: None,
		}
	}
}

/// A link as supplied, endpoints by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
}

/// A link whose endpoints both resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
}

/// Nodes and links of one session, with the id and degree lookups built
/// from them.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	resolved: Vec<ResolvedLink>,
	degree: Vec<usize>,
}

impl Graph {
	/// Builds the graph from caller data. Duplicate ids and dangling links
	/// are logged, never rejected.
	pub fn from_data(data: &GraphData) -> Self {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let nodes: Vec<Node> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| {
				if index.insert(n.id.clone(), i).is_some() {
					warn!("duplicate node id {:?}, last registration wins", n.id);
				}
				let mut node = Node::new(n.id.clone());
				if let (Some(x), Some(y)) = (n.x, n.y) {
					node.position = Some((x, y));
				}
				node
			})
			.collect();

		let links: Vec<Link> = data
			.links
			.iter()
			.map(|l| Link {
				source: l.source.clone(),
				target: l.target.clone(),
			})
			.collect();

		let mut degree = vec![0; nodes.len()];
		let mut resolved = Vec::with_capacity(links.len());
		for link in &links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&source), Some(&target)) => {
					degree[source] += 1;
					degree[target] += 1;
					resolved.push(ResolvedLink { source, target });
				}
				_ => warn!(
					"dangling link {:?} -> {:?} skipped",
					link.source, link.target
				),
			}
		}

		Self {
			nodes,
			links,
			index,
			resolved,
			degree,
		}
	}

	/// Every node in input order, shadowed duplicates included.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable access for the engine and gestures.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Every link as supplied, dangling ones included.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Non-dangling links, in input order.
	pub fn resolved_links(&self) -> &[ResolvedLink] {
		&self.resolved
	}

	/// Number of resolved links touching the node at `idx`.
	pub fn degree(&self, idx: usize) -> usize {
		self.degree.get(idx).copied().unwrap_or(0)
	}

	/// Index of the node that owns `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// The node that owns `id`.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Mutable [`Graph::node`].
	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index_of(id).map(|i| &mut self.nodes[i])
	}

	/// Whether `idx` is the node its id resolves to. Earlier duplicates are not.
	pub fn owns_id(&self, idx: usize) -> bool {
		self.nodes
			.get(idx)
			.is_some_and(|n| self.index_of(&n.id) == Some(idx))
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
