//! Domain layer: multigraph storage and error types

pub mod errors;
pub mod graph;

pub use errors::SortError;
pub use graph::Multigraph;
