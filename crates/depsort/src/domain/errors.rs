//! Error types for graph sorting

use std::fmt;
use thiserror::Error;

/// All errors that can occur while sorting a graph
#[derive(Debug, Error)]
pub enum SortError<V: fmt::Debug> {
    /// No progress is possible and at least one vertex still has unresolved
    /// predecessors. Carries one concrete cycle, trimmed of any non-cyclic
    /// prefix, in dependency order.
    #[error("{description}")]
    CircularDependency { cycle: Vec<V>, description: String },
}

impl<V: fmt::Debug> SortError<V> {
    /// The cyclic vertex sequence, for callers that build their own message.
    pub fn cycle(&self) -> &[V] {
        match self {
            SortError::CircularDependency { cycle, .. } => cycle,
        }
    }
}
