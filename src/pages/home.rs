use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};

/// Sample graph: `n` nodes joined by `n` deterministic pseudo-random links.
/// Self-links and repeats are left in on purpose; the canvas copes with both.
fn generate_sample_data(n: usize) -> GraphData {
	let nodes = (0..n).map(|i| GraphNode::new(format!("node-{i}"))).collect();

	let links = (0..n)
		.map(|i| {
			let source = (rand_simple(2 * i) * n as f64) as usize;
			let target = (rand_simple(2 * i + 1) * n as f64) as usize;
			GraphLink::new(format!("node-{source}"), format!("node-{target}"))
		})
		.collect();

	GraphData { nodes, links }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || generate_sample_data(100));
	let selected = RwSignal::new(None::<String>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<h2>"Force-Directed Graph Visualization"</h2>
				<ForceGraphCanvas data=graph_data width=Some(800.0) height=Some(600.0) selected=selected />
				<p class="selection">
					{move || match selected.get() {
						Some(id) => format!("Selected: {id}"),
						None => "Click a node to select it.".to_string(),
					}}
				</p>
			</div>
		</ErrorBoundary>
	}
}
