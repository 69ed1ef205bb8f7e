//! Graph algorithms built on [`Multigraph`](crate::domain::graph::Multigraph)
//!
//! - Reachability: unreachable-vertex computation from a root set
//! - Connectivity: weakly connected components
//! - Topological/batching sort: Kahn's algorithm with cycle breaking and
//!   deterministic secondary ordering

pub mod components;
pub mod reachability;
pub mod topological;

pub use topological::{CycleStep, TopologicalSorter};
