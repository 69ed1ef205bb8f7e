//! Directed multigraph storage
//!
//! Mutable storage for vertices and parallel directed edges. Edges live in a
//! single arena; the successor and predecessor adjacency maps hold mirrored
//! edge-id slots per `(from, to)` pair, so both directions of every query are
//! O(1) amortized and the two maps can never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Index of an edge in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct EdgeId(usize);

/// A directed edge: caller payload plus the batching-boundary flag.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Edge<E> {
    payload: E,
    requires_batching_boundary: bool,
}

/// Directed multigraph over opaque vertices.
///
/// Multiple parallel edges may exist for the same ordered `(from, to)` pair;
/// each carries its own payload. Vertex semantics belong entirely to the
/// caller; the graph only requires equality and a stable hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Multigraph<V: Eq + Hash, E> {
    vertices: HashSet<V>,
    edges: Vec<Edge<E>>,
    successor_map: HashMap<V, HashMap<V, Vec<EdgeId>>>,
    predecessor_map: HashMap<V, HashMap<V, Vec<EdgeId>>>,
}

impl<V: Clone + Eq + Hash, E> Multigraph<V, E> {
    pub fn new() -> Self {
        Self {
            vertices: HashSet::new(),
            edges: Vec::new(),
            successor_map: HashMap::new(),
            predecessor_map: HashMap::new(),
        }
    }

    /// Add a vertex. Inserting a vertex that is already present is a no-op.
    pub fn add_vertex(&mut self, vertex: V) {
        self.vertices.insert(vertex);
    }

    /// Add every vertex from the iterator.
    pub fn add_vertices<I: IntoIterator<Item = V>>(&mut self, vertices: I) {
        for vertex in vertices {
            self.add_vertex(vertex);
        }
    }

    /// Add a precedence edge from `from` to `to`.
    ///
    /// Both endpoints must already be vertices; violating this is a
    /// programming error checked only in debug builds.
    pub fn add_edge(&mut self, from: &V, to: &V, payload: E) {
        self.insert_edge(from, to, payload, false);
    }

    /// Add an edge whose endpoints must never share a batch: if `from` is
    /// placed in a batch, `to` must start a later one.
    pub fn add_boundary_edge(&mut self, from: &V, to: &V, payload: E) {
        self.insert_edge(from, to, payload, true);
    }

    fn insert_edge(&mut self, from: &V, to: &V, payload: E, requires_batching_boundary: bool) {
        debug_assert!(
            self.vertices.contains(from),
            "edge references a source vertex that was never added"
        );
        debug_assert!(
            self.vertices.contains(to),
            "edge references a target vertex that was never added"
        );

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            payload,
            requires_batching_boundary,
        });
        self.successor_map
            .entry(from.clone())
            .or_default()
            .entry(to.clone())
            .or_default()
            .push(id);
        self.predecessor_map
            .entry(to.clone())
            .or_default()
            .entry(from.clone())
            .or_default()
            .push(id);
    }

    /// All edge payloads for the ordered pair, empty if none exist.
    pub fn get_edges<'a>(&'a self, from: &V, to: &V) -> impl Iterator<Item = &'a E> + 'a {
        self.successor_map
            .get(from)
            .and_then(|slots| slots.get(to))
            .into_iter()
            .flatten()
            .map(move |id| &self.edges[id.0].payload)
    }

    /// Distinct vertices reachable from `from` over a single outgoing edge.
    pub fn get_outgoing_neighbors<'a>(&'a self, from: &V) -> impl Iterator<Item = &'a V> + 'a {
        self.successor_map
            .get(from)
            .into_iter()
            .flat_map(|slots| slots.keys())
    }

    /// Distinct vertices with at least one edge into `to`.
    pub fn get_incoming_neighbors<'a>(&'a self, to: &V) -> impl Iterator<Item = &'a V> + 'a {
        self.predecessor_map
            .get(to)
            .into_iter()
            .flat_map(|slots| slots.keys())
    }

    /// Whether at least one edge exists from `from` to `to`.
    pub fn has_edge(&self, from: &V, to: &V) -> bool {
        self.successor_map
            .get(from)
            .is_some_and(|slots| slots.contains_key(to))
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    /// Every live edge payload, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.successor_map
            .values()
            .flat_map(|slots| slots.values())
            .flatten()
            .map(move |id| &self.edges[id.0].payload)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successor_map
            .values()
            .map(|slots| slots.values().map(Vec::len).sum::<usize>())
            .sum()
    }

    /// Empty the graph: vertices, adjacency, and the edge arena.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.successor_map.clear();
        self.predecessor_map.clear();
    }

    /// Predecessors of `to` connected by at least one boundary-flagged edge.
    pub(crate) fn boundary_predecessors<'a>(&'a self, to: &V) -> impl Iterator<Item = &'a V> + 'a {
        self.predecessor_map
            .get(to)
            .into_iter()
            .flat_map(move |slots| {
                slots.iter().filter_map(move |(from, ids)| {
                    ids.iter()
                        .any(|id| self.edges[id.0].requires_batching_boundary)
                        .then_some(from)
                })
            })
    }

    /// Remove every parallel edge between the pair from both adjacency maps.
    /// Returns how many edges were removed. Arena entries are left behind;
    /// the graph is rebuilt or cleared between sorts, not compacted.
    pub(crate) fn remove_edges(&mut self, from: &V, to: &V) -> usize {
        let removed = self
            .successor_map
            .get_mut(from)
            .and_then(|slots| slots.remove(to))
            .map_or(0, |ids| ids.len());
        if let Some(slots) = self.predecessor_map.get_mut(to) {
            slots.remove(from);
        }
        removed
    }
}

impl<V: Clone + Eq + Hash, E> Default for Multigraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}
