//! # depsort: dependency-aware, batch-producing topological sorter
//!
//! A pure ordering engine over an abstract directed multigraph. Callers build
//! a [`Multigraph`] of opaque vertices and payload-carrying edges, then ask a
//! [`TopologicalSorter`] for a flat execution order or a sequence of batches.
//!
//! ## Architecture
//!
//! - **Domain**: multigraph storage ([`Multigraph`]) and error types
//!   ([`SortError`])
//! - **Algorithms**: reachability, weakly connected components, and the
//!   topological/batching sort ([`TopologicalSorter`])
//!
//! ## Example
//!
//! ```
//! use depsort::{Multigraph, TopologicalSorter};
//!
//! let mut graph = Multigraph::new();
//! graph.add_vertices(["users", "orders", "audit"]);
//! graph.add_edge(&"users", &"orders", "fk_orders_users");
//! // `audit` must never share a batch with `orders`
//! graph.add_boundary_edge(&"orders", &"audit", "fk_audit_orders");
//!
//! let sorter = TopologicalSorter::<&str, &str>::new().with_secondary_sort(|a, b| a.cmp(b));
//! let batches = sorter.sort_into_batches(&mut graph).unwrap();
//!
//! assert_eq!(batches, vec![vec!["users", "orders"], vec!["audit"]]);
//! ```
//!
//! The sorter is synchronous and holds no state across calls; it is not safe
//! to mutate a graph concurrently with sorting it.

pub mod algorithms;
pub mod domain;

pub use algorithms::topological::{CycleStep, TopologicalSorter};
pub use domain::errors::SortError;
pub use domain::graph::Multigraph;
