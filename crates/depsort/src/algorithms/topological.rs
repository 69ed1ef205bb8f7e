//! Topological / batching sort
//!
//! Breadth-first Kahn's algorithm over layers. Produces either a flat
//! topological order or a sequence of batches split wherever a
//! boundary-flagged edge would otherwise place two related vertices in the
//! same batch. Ties between simultaneously eligible vertices are broken by an
//! optional secondary comparator so that equivalent inputs always produce the
//! same order.

use crate::domain::errors::SortError;
use crate::domain::graph::Multigraph;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// One hop of a reported cycle: the pair of vertices and every parallel edge
/// payload between them. Handed to the cycle formatter.
pub struct CycleStep<'a, V, E> {
    pub from: &'a V,
    pub to: &'a V,
    pub edges: Vec<&'a E>,
}

type SecondarySort<V> = Box<dyn Fn(&V, &V) -> Ordering>;
type FormatCycle<V, E> = Box<dyn for<'a> Fn(&'a [CycleStep<'a, V, E>]) -> String>;

/// Configurable topological sorter over a [`Multigraph`].
///
/// The sorter holds no graph state; a single instance can sort any number of
/// graphs. Cycle breaking mutates the graph it is given, which is why every
/// entry point takes `&mut Multigraph`.
pub struct TopologicalSorter<V, E> {
    secondary_sort: Option<SecondarySort<V>>,
    format_cycle: Option<FormatCycle<V, E>>,
}

impl<V, E> TopologicalSorter<V, E> {
    pub fn new() -> Self {
        Self {
            secondary_sort: None,
            format_cycle: None,
        }
    }

    /// Set a total order applied whenever more than one vertex is eligible at
    /// once. This makes the output deterministic and lets the caller encode a
    /// tie-break policy, e.g. a stable identifier ordering so concurrent
    /// executions of equivalent workloads acquire locks in the same order.
    pub fn with_secondary_sort(mut self, compare: impl Fn(&V, &V) -> Ordering + 'static) -> Self {
        self.secondary_sort = Some(Box::new(compare));
        self
    }

    /// Customize the human-readable description carried by a
    /// [`SortError::CircularDependency`]. The formatter receives one
    /// [`CycleStep`] per hop of the cycle, including the closing hop back to
    /// the first vertex.
    pub fn with_cycle_formatter(
        mut self,
        format: impl for<'a> Fn(&'a [CycleStep<'a, V, E>]) -> String + 'static,
    ) -> Self {
        self.format_cycle = Some(Box::new(format));
        self
    }
}

impl<V, E> TopologicalSorter<V, E>
where
    V: Clone + Eq + Hash + fmt::Debug,
{
    /// Flat topological order over all vertices.
    pub fn sort(&self, graph: &mut Multigraph<V, E>) -> Result<Vec<V>, SortError<V>> {
        Ok(self.sort_core(graph, None)?.into_iter().flatten().collect())
    }

    /// Flat topological order, consulting `can_break` when a cycle blocks
    /// progress. Returning `true` permanently removes every parallel edge of
    /// the offered pair from the graph and the sort resumes.
    pub fn sort_with_edge_breaking<F>(
        &self,
        graph: &mut Multigraph<V, E>,
        mut can_break: F,
    ) -> Result<Vec<V>, SortError<V>>
    where
        F: FnMut(&V, &V, &[&E]) -> bool,
    {
        Ok(self
            .sort_core(graph, Some(&mut can_break))?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Order all vertices into batches. Concatenating the batches yields a
    /// valid topological order; additionally, for every boundary-flagged edge
    /// the source's batch index is strictly less than the target's.
    pub fn sort_into_batches(&self, graph: &mut Multigraph<V, E>) -> Result<Vec<Vec<V>>, SortError<V>> {
        self.sort_core(graph, None)
    }

    /// Batching sort with a cycle-breaking policy, see
    /// [`sort_with_edge_breaking`](Self::sort_with_edge_breaking).
    pub fn sort_into_batches_with_edge_breaking<F>(
        &self,
        graph: &mut Multigraph<V, E>,
        mut can_break: F,
    ) -> Result<Vec<Vec<V>>, SortError<V>>
    where
        F: FnMut(&V, &V, &[&E]) -> bool,
    {
        self.sort_core(graph, Some(&mut can_break))
    }

    fn sort_core(
        &self,
        graph: &mut Multigraph<V, E>,
        mut can_break: Option<&mut dyn FnMut(&V, &V, &[&E]) -> bool>,
    ) -> Result<Vec<Vec<V>>, SortError<V>> {
        let total = graph.vertex_count();
        let mut batches: Vec<Vec<V>> = Vec::new();
        if total == 0 {
            return Ok(batches);
        }

        tracing::debug!(
            vertex_count = total,
            edge_count = graph.edge_count(),
            "starting topological sort"
        );

        // Count distinct predecessor vertices, not edges: parallel edges from
        // one predecessor unblock their target exactly once.
        let mut predecessor_counts: HashMap<V, usize> = HashMap::with_capacity(total);
        for vertex in graph.vertices() {
            let incoming = graph.get_incoming_neighbors(vertex).count();
            if incoming > 0 {
                predecessor_counts.insert(vertex.clone(), incoming);
            }
        }

        let mut current_roots: Vec<V> = graph
            .vertices()
            .filter(|vertex| !predecessor_counts.contains_key(*vertex))
            .cloned()
            .collect();
        let mut next_roots: Vec<V> = Vec::new();

        let mut current_batch: Vec<V> = Vec::new();
        let mut current_batch_set: HashSet<V> = HashSet::new();
        let mut boundary_required = false;
        let mut placed = 0usize;

        loop {
            while !current_roots.is_empty() {
                // Deterministic tie-break among simultaneously eligible roots
                if let Some(compare) = &self.secondary_sort {
                    current_roots.sort_by(|a, b| compare(a, b));
                }

                if boundary_required {
                    batches.push(std::mem::take(&mut current_batch));
                    current_batch_set.clear();
                    boundary_required = false;
                }

                for root in current_roots.drain(..) {
                    current_batch.push(root.clone());
                    current_batch_set.insert(root.clone());
                    placed += 1;

                    for successor in graph.get_outgoing_neighbors(&root) {
                        let Some(count) = predecessor_counts.get_mut(successor) else {
                            continue;
                        };
                        *count -= 1;
                        if *count == 0 {
                            next_roots.push(successor.clone());
                            if !boundary_required
                                && graph
                                    .boundary_predecessors(successor)
                                    .any(|source| current_batch_set.contains(source))
                            {
                                boundary_required = true;
                            }
                        }
                    }
                }

                std::mem::swap(&mut current_roots, &mut next_roots);
            }

            if placed == total {
                break;
            }

            // No roots left but vertices remain: a cycle blocks progress.
            let Some(policy) = can_break.as_mut() else {
                return Err(self.cycle_error(graph, &predecessor_counts));
            };
            if !self.try_break_edge(
                graph,
                &mut **policy,
                &mut predecessor_counts,
                &mut current_roots,
                &current_batch_set,
                &mut boundary_required,
            ) {
                return Err(self.cycle_error(graph, &predecessor_counts));
            }
        }

        if !current_batch.is_empty() {
            batches.push(current_batch);
        }

        tracing::debug!(batch_count = batches.len(), "topological sort complete");
        Ok(batches)
    }

    /// Offer one edge of the blocking cycle to the policy. Returns whether an
    /// edge was removed. An accepted pair is removed wholesale (every parallel
    /// payload) and the target re-seeded as a root once its last predecessor
    /// relationship resolves.
    fn try_break_edge(
        &self,
        graph: &mut Multigraph<V, E>,
        policy: &mut dyn FnMut(&V, &V, &[&E]) -> bool,
        predecessor_counts: &mut HashMap<V, usize>,
        current_roots: &mut Vec<V>,
        current_batch_set: &HashSet<V>,
        boundary_required: &mut bool,
    ) -> bool {
        let mut candidates: Vec<V> = predecessor_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(vertex, _)| vertex.clone())
            .collect();
        if let Some(compare) = &self.secondary_sort {
            candidates.sort_by(|a, b| compare(a, b));
        }

        for candidate in candidates {
            let mut incoming: Vec<V> = graph
                .get_incoming_neighbors(&candidate)
                .filter(|source| {
                    predecessor_counts
                        .get(*source)
                        .is_some_and(|&count| count > 0)
                })
                .cloned()
                .collect();
            if let Some(compare) = &self.secondary_sort {
                incoming.sort_by(|a, b| compare(a, b));
            }

            for from in incoming {
                let accepted = {
                    let edges: Vec<&E> = graph.get_edges(&from, &candidate).collect();
                    policy(&from, &candidate, &edges)
                };
                if !accepted {
                    continue;
                }

                graph.remove_edges(&from, &candidate);
                tracing::debug!(
                    from = ?from,
                    to = ?candidate,
                    "removed edge to resolve dependency cycle"
                );

                if let Some(count) = predecessor_counts.get_mut(&candidate) {
                    *count -= 1;
                    if *count == 0 {
                        if graph
                            .boundary_predecessors(&candidate)
                            .any(|source| current_batch_set.contains(source))
                        {
                            *boundary_required = true;
                        }
                        current_roots.push(candidate.clone());
                    }
                }
                return true;
            }
        }

        false
    }

    /// Reconstruct one concrete cycle by walking backward through unresolved
    /// incoming neighbors until a vertex repeats, then trim the non-cyclic
    /// prefix. Iterative on purpose: pathological inputs must not overflow
    /// the stack.
    fn cycle_error(
        &self,
        graph: &Multigraph<V, E>,
        predecessor_counts: &HashMap<V, usize>,
    ) -> SortError<V> {
        let mut unresolved: Vec<&V> = predecessor_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(vertex, _)| vertex)
            .collect();
        if let Some(compare) = &self.secondary_sort {
            unresolved.sort_by(|a, b| compare(a, b));
        }
        let Some(start) = unresolved.first().copied() else {
            return SortError::CircularDependency {
                cycle: Vec::new(),
                description: "circular dependency detected".to_string(),
            };
        };

        let mut path: Vec<&V> = vec![start];
        let mut positions: HashMap<&V, usize> = HashMap::from([(start, 0)]);
        let cycle: Vec<V> = loop {
            let current = path[path.len() - 1];
            let mut predecessors: Vec<&V> = graph
                .get_incoming_neighbors(current)
                .filter(|source| {
                    predecessor_counts
                        .get(*source)
                        .is_some_and(|&count| count > 0)
                })
                .collect();
            if let Some(compare) = &self.secondary_sort {
                predecessors.sort_by(|a, b| compare(a, b));
            }
            let Some(next) = predecessors.first().copied() else {
                // Cannot happen for a stalled sort; fall back to the path
                break path.iter().rev().map(|v| (*v).clone()).collect();
            };

            if let Some(&repeat_at) = positions.get(next) {
                // path[i + 1] points at path[i]; reversing the tail yields
                // the cycle in dependency order.
                break path[repeat_at..].iter().rev().map(|v| (*v).clone()).collect();
            }
            positions.insert(next, path.len());
            path.push(next);
        };

        let description = self.describe_cycle(graph, &cycle);
        SortError::CircularDependency { cycle, description }
    }

    fn describe_cycle(&self, graph: &Multigraph<V, E>, cycle: &[V]) -> String {
        if let Some(format) = &self.format_cycle {
            let steps: Vec<CycleStep<'_, V, E>> = (0..cycle.len())
                .map(|i| {
                    let from = &cycle[i];
                    let to = &cycle[(i + 1) % cycle.len()];
                    CycleStep {
                        from,
                        to,
                        edges: graph.get_edges(from, to).collect(),
                    }
                })
                .collect();
            return format(&steps);
        }

        let mut parts: Vec<String> = cycle.iter().map(|vertex| format!("{vertex:?}")).collect();
        if let Some(first) = parts.first().cloned() {
            parts.push(first);
        }
        format!("circular dependency detected: {}", parts.join(" -> "))
    }
}

impl<V, E> Default for TopologicalSorter<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> fmt::Debug for TopologicalSorter<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologicalSorter")
            .field("secondary_sort", &self.secondary_sort.is_some())
            .field("format_cycle", &self.format_cycle.is_some())
            .finish()
    }
}
