//! Fuzz target for forward-star construction and the solvers.
//!
//! Builds networks from arbitrary arc lists, then checks the structural
//! self-check, Dijkstra labels and the PageRank mass.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use netflow_graph::{
    pagerank, shortest_paths, ForwardStar, ForwardStarBuilder, GraphError, NodeId, PageRankConfig,
};

/// One arc as produced by the fuzzer. Endpoints may be out of range.
#[derive(Debug, Arbitrary)]
struct FuzzArc {
    from: u8,
    to: u8,
    cost: Option<i16>,
    capacity: Option<i16>,
}

/// Fuzz input: node count, arcs and solver parameters.
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    node_count: u8,
    arcs: Vec<FuzzArc>,
    source: u8,
    beta_percent: u8,
}

fuzz_target!(|input: FuzzInput| {
    if input.arcs.len() > 1000 {
        return;
    }

    let n = input.node_count as usize;
    let mut builder = ForwardStarBuilder::new(n);
    for arc in &input.arcs {
        builder.add_arc_with(
            arc.from as u32,
            arc.to as u32,
            arc.cost.map(f64::from),
            arc.capacity.map(f64::from),
        );
    }

    let graph: ForwardStar = match builder.build() {
        Ok(graph) => graph,
        Err(GraphError::InvalidArc { from, to, .. }) => {
            assert!(from as usize >= n || to as usize >= n);
            return;
        }
        Err(GraphError::InvalidWeight { .. }) => {
            assert!(input.arcs.iter().any(|a| a.capacity.is_some_and(|c| c < 0)));
            return;
        }
        Err(e) => panic!("unexpected build error: {e}"),
    };

    graph.validate().expect("built star failed its self-check");
    assert_eq!(graph.arc_count(), input.arcs.len());
    let out_total: usize = graph.nodes().map(|v| graph.out_degree(v).unwrap()).sum();
    let in_total: usize = graph.nodes().map(|v| graph.in_degree(v).unwrap()).sum();
    assert_eq!(out_total, graph.arc_count());
    assert_eq!(in_total, graph.arc_count());

    let source = NodeId(input.source as u32);
    match shortest_paths(&graph, source) {
        Ok(paths) => {
            // Every labelled arc satisfies the triangle inequality
            for v in graph.nodes() {
                let Some(dv) = paths.distance(v) else { continue };
                for arc in graph.outgoing_arcs(v).unwrap() {
                    let dh = paths.distance(arc.head).expect("head of a reachable node");
                    assert!(dh <= dv + arc.cost);
                }
            }
        }
        Err(GraphError::SourceOutOfRange { .. }) => assert!(source.index() >= n),
        Err(GraphError::NegativeCost { .. }) => assert!(graph.first_negative_arc().is_some()),
        Err(e) => panic!("unexpected dijkstra error: {e}"),
    }

    let beta = (input.beta_percent % 100) as f64 / 100.0;
    let config = PageRankConfig::new().with_beta(beta);
    match pagerank(&graph, &config) {
        Ok(result) => assert!((result.mass() - 1.0).abs() <= 1e-6),
        Err(GraphError::InvalidTeleportProbability(_)) => assert_eq!(beta, 0.0),
        Err(GraphError::EmptyGraph) => assert_eq!(n, 0),
        Err(e) => panic!("unexpected pagerank error: {e}"),
    }
});
