//! Interactive force-directed graph canvas for Leptos (client-side rendered).
//!
//! Feed [`components::force_graph::ForceGraphCanvas`] a
//! [`GraphData`](components::force_graph::GraphData) of nodes and links and it
//! lays them out with a cooling force simulation (link springs, pairwise
//! repulsion, centring), drawn onto a `<canvas>` at most once per display
//! refresh. Nodes can be dragged and pinned, the view panned and zoomed by
//! mouse, wheel or pinch, and a clicked node is selected and reported back
//! through an optional signal.
//!
//! The engine, view transform, picking and gesture handling have no browser
//! dependencies and are driven through
//! [`GraphSession`](components::force_graph::GraphSession); drawing goes
//! through the [`Surface`](components::force_graph::Surface) trait, so all of
//! it runs under plain `cargo test`. The [`App`] here is a demo page around a
//! generated 100-node graph.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
/// Reusable view components.
pub mod components;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Force-Directed Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
