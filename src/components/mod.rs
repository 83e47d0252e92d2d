/// Interactive force-directed graph canvas.
pub mod force_graph;
