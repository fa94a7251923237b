pub mod evolution_graph;
pub mod filter_panel;
pub mod node_details;
pub mod status;
