//! Reachability over outgoing edges

use crate::domain::graph::Multigraph;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

impl<V: Clone + Eq + Hash, E> Multigraph<V, E> {
    /// Every vertex that no worklist traversal from `roots` over outgoing
    /// edges can reach. Roots that are not vertices of the graph are ignored.
    ///
    /// Useful to validate that a graph has no orphan work before sorting.
    pub fn get_unreachable_vertices<'r, I>(&self, roots: I) -> HashSet<V>
    where
        I: IntoIterator<Item = &'r V>,
        V: 'r,
    {
        let mut visited: HashSet<V> = HashSet::new();
        let mut queue: VecDeque<V> = VecDeque::new();
        for root in roots {
            if self.contains_vertex(root) && visited.insert(root.clone()) {
                queue.push_back(root.clone());
            }
        }

        while let Some(vertex) = queue.pop_front() {
            for neighbor in self.get_outgoing_neighbors(&vertex) {
                if !visited.contains(neighbor) {
                    visited.insert(neighbor.clone());
                    queue.push_back(neighbor.clone());
                }
            }
        }

        self.vertices()
            .filter(|vertex| !visited.contains(*vertex))
            .cloned()
            .collect()
    }
}
