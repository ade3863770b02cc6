//! Integration tests for solver properties on random and hand-built networks.

use netflow_graph::{
    pagerank, shortest_paths, shortest_paths_with_config, Convergence, DijkstraConfig,
    DijkstraStrategy, ForwardStar, GraphError, NodeId, PageRankConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random network with integer costs so path sums are exact.
fn random_network(rng: &mut StdRng, max_nodes: usize, dead_ends: bool) -> ForwardStar {
    let n = rng.gen_range(1..=max_nodes);
    let m = rng.gen_range(0..=n * 3);
    let mut arcs = Vec::with_capacity(m);
    for _ in 0..m {
        let from = rng.gen_range(0..n) as u32;
        let to = rng.gen_range(0..n) as u32;
        let cost = rng.gen_range(0..10) as f64;
        arcs.push((from, to, cost));
    }
    if !dead_ends {
        // Ring through every node
        for v in 0..n as u32 {
            arcs.push((v, (v + 1) % n as u32, 1.0));
        }
    }
    ForwardStar::from_weighted_arcs(n, &arcs).unwrap()
}

/// Minimum cost over all simple paths from `source`, by exhaustive search.
fn brute_force_distances(graph: &ForwardStar, source: NodeId) -> Vec<f64> {
    fn walk(graph: &ForwardStar, node: NodeId, cost: f64, on_path: &mut Vec<bool>, best: &mut [f64]) {
        if cost < best[node.index()] {
            best[node.index()] = cost;
        }
        for arc in graph.outgoing_arcs(node).unwrap() {
            if on_path[arc.head.index()] {
                continue;
            }
            on_path[arc.head.index()] = true;
            walk(graph, arc.head, cost + arc.cost, on_path, best);
            on_path[arc.head.index()] = false;
        }
    }

    let n = graph.node_count();
    let mut best = vec![f64::INFINITY; n];
    let mut on_path = vec![false; n];
    on_path[source.index()] = true;
    walk(graph, source, 0.0, &mut on_path, &mut best);
    best
}

#[test]
fn test_dijkstra_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let graph = random_network(&mut rng, 8, true);
        for source in graph.nodes() {
            let paths = shortest_paths(&graph, source).unwrap();
            let expected = brute_force_distances(&graph, source);
            assert_eq!(paths.distances(), expected.as_slice());

            // Predecessor labels are consistent with distances
            for node in graph.nodes() {
                if let Some(pred) = paths.predecessor(node) {
                    let arc_cost = graph
                        .outgoing_arcs(pred)
                        .unwrap()
                        .filter(|arc| arc.head == node)
                        .map(|arc| arc.cost)
                        .fold(f64::INFINITY, f64::min);
                    assert_eq!(paths.distances()[pred.index()] + arc_cost, paths.distances()[node.index()]);
                }
            }
        }
    }
}

#[test]
fn test_settled_once_in_nondecreasing_order() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let graph = random_network(&mut rng, 12, true);
        let paths = shortest_paths(&graph, NodeId(0)).unwrap();

        let mut seen = vec![false; graph.node_count()];
        for &node in paths.settled() {
            assert!(!seen[node.index()], "node {} settled twice", node);
            seen[node.index()] = true;
        }

        let settled_distances: Vec<f64> = paths
            .settled()
            .iter()
            .map(|&node| paths.distances()[node.index()])
            .collect();
        assert!(settled_distances.windows(2).all(|w| w[0] <= w[1]));

        let reachable = graph.nodes().filter(|&v| paths.is_reachable(v)).count();
        assert_eq!(reachable, paths.reachable_count());
    }
}

#[test]
fn test_heap_and_scan_agree() {
    let mut rng = StdRng::seed_from_u64(99);
    let scan = DijkstraConfig::new().with_strategy(DijkstraStrategy::Scan);

    for _ in 0..50 {
        let graph = random_network(&mut rng, 10, true);
        let heap = shortest_paths(&graph, NodeId(0)).unwrap();
        let linear = shortest_paths_with_config(&graph, NodeId(0), &scan).unwrap();
        assert_eq!(heap, linear);
    }
}

#[test]
fn test_negative_cost_on_frontier() {
    // 0 -> 1 (1), 1 -> 2 (-3)
    let graph = ForwardStar::from_weighted_arcs(3, &[(0, 1, 1.0), (1, 2, -3.0)]).unwrap();
    let result = shortest_paths(&graph, NodeId(0));
    assert!(matches!(result, Err(GraphError::NegativeCost { tail: 1, head: 2, .. })));
}

#[test]
fn test_scenario_a_triangle() {
    let graph =
        ForwardStar::from_weighted_arcs(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]).unwrap();
    let paths = shortest_paths(&graph, NodeId(0)).unwrap();

    assert_eq!(paths.distance(NodeId(0)), Some(0.0));
    assert_eq!(paths.distance(NodeId(1)), Some(1.0));
    assert_eq!(paths.distance(NodeId(2)), Some(2.0));
    assert_eq!(paths.predecessor(NodeId(2)), Some(NodeId(1)));
}

#[test]
fn test_scenario_b_two_cycle() {
    let graph = ForwardStar::from_arcs(2, &[(0, 1), (1, 0)]).unwrap();
    let config = PageRankConfig::new()
        .with_beta(0.85)
        .with_epsilon(1e-8)
        .with_max_iterations(100);
    let result = pagerank(&graph, &config).unwrap();

    assert_eq!(result.convergence, Convergence::Converged);
    assert!((result.ranks()[0] - 0.5).abs() < 1e-9);
    assert!((result.ranks()[1] - 0.5).abs() < 1e-9);
}

#[test]
fn test_scenario_c_dead_end() {
    // Node 2 has no outgoing arcs
    let graph = ForwardStar::from_arcs(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
    let result = pagerank(&graph, &PageRankConfig::default()).unwrap();

    assert!(result.is_converged());
    assert!((result.mass() - 1.0).abs() < 1e-6);
}

#[test]
fn test_isolated_node_boundary() {
    let graph = ForwardStar::from_weighted_arcs(4, &[(1, 2, 1.0), (2, 3, 1.0)]).unwrap();
    let paths = shortest_paths(&graph, NodeId(0)).unwrap();

    assert_eq!(paths.distances()[0], 0.0);
    for v in 1..4 {
        assert_eq!(paths.distances()[v], f64::INFINITY);
        assert_eq!(paths.predecessors()[v], NodeId::INVALID);
    }
}

#[test]
fn test_rank_mass_with_and_without_dead_ends() {
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..100 {
        let graph = random_network(&mut rng, 30, round % 2 == 0);
        let beta = rng.gen_range(0.05..0.95);
        let config = PageRankConfig::new().with_beta(beta).with_max_iterations(1000);
        let result = pagerank(&graph, &config).unwrap();

        assert!(result.is_converged(), "beta {} did not converge", beta);
        assert!((result.mass() - 1.0).abs() < 1e-6);
        assert!(result.ranks().iter().all(|&r| r > 0.0));
    }
}

#[test]
fn test_zero_beta_rejected() {
    let graph = ForwardStar::from_arcs(3, &[(0, 1), (1, 2)]).unwrap();
    let result = pagerank(&graph, &PageRankConfig::new().with_beta(0.0));
    assert_eq!(result, Err(GraphError::InvalidTeleportProbability(0.0)));
}

#[test]
fn test_reruns_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(31337);
    let graph = random_network(&mut rng, 40, true);

    let a = shortest_paths(&graph, NodeId(0)).unwrap();
    let b = shortest_paths(&graph, NodeId(0)).unwrap();
    assert_eq!(a.settled(), b.settled());
    assert_eq!(a.predecessors(), b.predecessors());
    let bits = |d: &[f64]| d.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(a.distances()), bits(b.distances()));

    let config = PageRankConfig::default();
    let r1 = pagerank(&graph, &config).unwrap();
    let r2 = pagerank(&graph, &config).unwrap();
    assert_eq!(bits(r1.ranks()), bits(r2.ranks()));
}

#[test]
fn test_concurrent_runs_share_the_store() {
    let mut rng = StdRng::seed_from_u64(5);
    let graph = random_network(&mut rng, 50, false);
    let expected = shortest_paths(&graph, NodeId(0)).unwrap();
    let expected_ranks = pagerank(&graph, &PageRankConfig::default()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let paths = shortest_paths(&graph, NodeId(0)).unwrap();
                    let ranks = pagerank(&graph, &PageRankConfig::default()).unwrap();
                    (paths, ranks)
                })
            })
            .collect();

        for handle in handles {
            let (paths, ranks) = handle.join().unwrap();
            assert_eq!(paths, expected);
            assert_eq!(ranks, expected_ranks);
        }
    });
}
