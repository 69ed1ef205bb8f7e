//! # Property tests
//!
//! Random DAGs (edges only ever point from a lower id to a higher one, so
//! the input can never contain a cycle) checked for the core guarantees:
//! topological validity, batch validity, and determinism.

#[cfg(test)]
mod tests {
    use depsort::{Multigraph, TopologicalSorter};
    use proptest::prelude::*;

    const VERTEX_COUNT: u32 = 24;

    /// Raw pairs become forward edges (min, max); loops are discarded.
    fn build_graph(raw_edges: &[(u32, u32)], boundary_every: usize) -> Multigraph<u32, usize> {
        let mut graph = Multigraph::new();
        graph.add_vertices(0..VERTEX_COUNT);
        for (i, &(a, b)) in raw_edges.iter().enumerate() {
            if a == b {
                continue;
            }
            let (from, to) = (a.min(b), a.max(b));
            if boundary_every != 0 && i % boundary_every == 0 {
                graph.add_boundary_edge(&from, &to, i);
            } else {
                graph.add_edge(&from, &to, i);
            }
        }
        graph
    }

    fn sorter() -> TopologicalSorter<u32, usize> {
        TopologicalSorter::<u32, usize>::new().with_secondary_sort(|a, b| a.cmp(b))
    }

    fn edge_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((0..VERTEX_COUNT, 0..VERTEX_COUNT), 0..120)
    }

    proptest! {
        #[test]
        fn prop_flat_order_respects_every_edge(raw_edges in edge_strategy()) {
            let mut graph = build_graph(&raw_edges, 0);
            let order = sorter().sort(&mut graph).unwrap();

            prop_assert_eq!(order.len() as u32, VERTEX_COUNT);
            let position: Vec<usize> = {
                let mut index = vec![0usize; VERTEX_COUNT as usize];
                for (at, vertex) in order.iter().enumerate() {
                    index[*vertex as usize] = at;
                }
                index
            };
            for &(a, b) in &raw_edges {
                if a == b {
                    continue;
                }
                let (from, to) = (a.min(b), a.max(b));
                prop_assert!(
                    position[from as usize] < position[to as usize],
                    "edge {} -> {} violated", from, to
                );
            }
        }

        #[test]
        fn prop_batches_concatenate_to_valid_order(raw_edges in edge_strategy()) {
            let mut graph = build_graph(&raw_edges, 3);
            let batches = sorter().sort_into_batches(&mut graph).unwrap();

            // Every vertex exactly once
            let flat: Vec<u32> = batches.iter().flatten().copied().collect();
            prop_assert_eq!(flat.len() as u32, VERTEX_COUNT);

            let mut batch_of = vec![0usize; VERTEX_COUNT as usize];
            let mut position = vec![0usize; VERTEX_COUNT as usize];
            for (i, batch) in batches.iter().enumerate() {
                for vertex in batch {
                    batch_of[*vertex as usize] = i;
                }
            }
            for (at, vertex) in flat.iter().enumerate() {
                position[*vertex as usize] = at;
            }

            for (i, &(a, b)) in raw_edges.iter().enumerate() {
                if a == b {
                    continue;
                }
                let (from, to) = (a.min(b), a.max(b));
                prop_assert!(position[from as usize] < position[to as usize]);
                if i % 3 == 0 {
                    prop_assert!(
                        batch_of[from as usize] < batch_of[to as usize],
                        "boundary edge {} -> {} shares batch {}", from, to, batch_of[from as usize]
                    );
                }
            }
        }

        #[test]
        fn prop_repeated_sorts_are_identical(raw_edges in edge_strategy()) {
            let first = sorter()
                .sort_into_batches(&mut build_graph(&raw_edges, 4))
                .unwrap();
            let second = sorter()
                .sort_into_batches(&mut build_graph(&raw_edges, 4))
                .unwrap();

            prop_assert_eq!(first, second);
        }

        /// An always-accepting policy makes any graph sortable, including
        /// ones with real cycles.
        #[test]
        fn prop_accepting_policy_always_sorts(raw_edges in edge_strategy()) {
            let mut graph: Multigraph<u32, usize> = Multigraph::new();
            graph.add_vertices(0..VERTEX_COUNT);
            // Unrestricted direction: cycles are possible here
            for (i, &(a, b)) in raw_edges.iter().enumerate() {
                if a == b {
                    continue;
                }
                graph.add_edge(&a, &b, i);
            }

            let order = sorter()
                .sort_with_edge_breaking(&mut graph, |_, _, _| true)
                .unwrap();

            prop_assert_eq!(order.len() as u32, VERTEX_COUNT);
            // Surviving edges are honored
            let mut position = vec![0usize; VERTEX_COUNT as usize];
            for (at, vertex) in order.iter().enumerate() {
                position[*vertex as usize] = at;
            }
            for from in 0..VERTEX_COUNT {
                for to in 0..VERTEX_COUNT {
                    if graph.has_edge(&from, &to) {
                        prop_assert!(position[from as usize] < position[to as usize]);
                    }
                }
            }
        }
    }
}
