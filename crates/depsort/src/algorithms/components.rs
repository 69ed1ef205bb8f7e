//! Weakly connected components

use crate::domain::graph::Multigraph;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

impl<V: Clone + Eq + Hash, E> Multigraph<V, E> {
    /// Partition all vertices into maximal sets whose members are pairwise
    /// connected by some path ignoring edge direction. Every vertex belongs
    /// to exactly one component; an isolated vertex forms its own.
    pub fn get_weakly_connected_components(&self) -> Vec<HashSet<V>> {
        let mut visited: HashSet<&V> = HashSet::new();
        let mut components: Vec<HashSet<V>> = Vec::new();

        for vertex in self.vertices() {
            if visited.contains(vertex) {
                continue;
            }

            let mut component: HashSet<V> = HashSet::new();
            let mut queue: VecDeque<&V> = VecDeque::from([vertex]);
            visited.insert(vertex);

            while let Some(current) = queue.pop_front() {
                component.insert(current.clone());
                let neighbors = self
                    .get_outgoing_neighbors(current)
                    .chain(self.get_incoming_neighbors(current));
                for neighbor in neighbors {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(component);
        }

        components
    }
}
