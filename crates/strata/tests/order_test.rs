use proptest::prelude::*;
use strata::acyclic;
use strata::cancel::CancellationToken;
use strata::config::TieBreak;
use strata::delegate::{DelegateGraph, DelegateEdge, EdgeOrigin, Size};
use strata::graph::{EdgeKey, Graph, GraphOptions};
use strata::layering::Layering;
use strata::order::{
    AccumulatorTreeCounter, OrderOptions, init_order, order, total_crossings, transpose,
};
use strata::rank::longest_path::longest_path;
use strata::rng::TieBreaker;
use strata::synthetic::insert_synthetic_vertices;

fn prepared(g: &Graph<(), ()>) -> (DelegateGraph<String, EdgeKey>, Layering) {
    let mut d = DelegateGraph::from_graph(g).unwrap();
    acyclic::run(&mut d);
    longest_path(&mut d);
    let mut layering = Layering::from_ranks(&d);
    insert_synthetic_vertices(&mut d, &mut layering);
    (d, layering)
}

fn ix(d: &DelegateGraph<String, EdgeKey>, v: &str) -> usize {
    d.index_of(&v.to_string()).unwrap()
}

#[test]
fn init_order_visits_successors_depth_first() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("a", "c").set_edge("a", "d").set_edge("b", "c");
    let (d, _) = prepared(&g);
    let layering = init_order(&d, None);
    assert_eq!(layering.layer(0), &[ix(&d, "a"), ix(&d, "b")]);
    assert_eq!(layering.layer(1), &[ix(&d, "c"), ix(&d, "d")]);
}

#[test]
fn median_sweep_removes_a_crossing() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("a", "c").set_edge("a", "d").set_edge("b", "c");
    let (mut d, mut layering) = prepared(&g);

    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    let summary = order(
        &mut d,
        &mut layering,
        &OrderOptions::default(),
        &mut tie,
        &CancellationToken::new(),
    );
    assert_eq!(summary.initial_crossings, 1);
    assert_eq!(summary.best_crossings, 0);
    assert_eq!(layering.layer(1), &[ix(&d, "d"), ix(&d, "c")]);
    for layer in layering.layers() {
        for (i, &v) in layer.iter().enumerate() {
            assert_eq!(d.vertex(v).index, i);
        }
    }
}

#[test]
fn transpose_swaps_a_crossed_pair() {
    let mut d: DelegateGraph<&str, u32> = DelegateGraph::new();
    let a = d.add_vertex("a", Size::default());
    let b = d.add_vertex("b", Size::default());
    let c = d.add_vertex("c", Size::default());
    let e = d.add_vertex("e", Size::default());
    d.add_edge(DelegateEdge::new(a, e, EdgeOrigin::Original(0)));
    d.add_edge(DelegateEdge::new(b, c, EdgeOrigin::Original(1)));
    let mut layering = Layering::from_layers(vec![vec![a, b], vec![c, e]]);
    layering.reindex(&mut d);
    assert_eq!(total_crossings(&d, &layering, &AccumulatorTreeCounter), 1);

    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    let swaps = transpose(&mut d, &mut layering, 4, &mut tie);
    assert!(swaps >= 1);
    assert_eq!(total_crossings(&d, &layering, &AccumulatorTreeCounter), 0);
    assert_eq!(layering.layer(0), &[b, a]);
    assert_eq!(d.vertex(b).index, 0);
}

#[test]
fn zero_iterations_keep_the_initial_order() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("a", "c").set_edge("a", "d").set_edge("b", "c");
    let (mut d, mut layering) = prepared(&g);
    let opts = OrderOptions {
        max_iterations: 0,
        ..Default::default()
    };
    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    let summary = order(&mut d, &mut layering, &opts, &mut tie, &CancellationToken::new());
    assert_eq!(summary.iterations, 0);
    assert_eq!(summary.best_crossings, summary.initial_crossings);
    assert_eq!(layering, init_order(&d, None));
}

#[test]
fn a_cancelled_token_stops_before_the_first_sweep() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("a", "c").set_edge("a", "d").set_edge("b", "c");
    let (mut d, mut layering) = prepared(&g);
    let token = CancellationToken::new();
    token.cancel();
    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    let summary = order(&mut d, &mut layering, &OrderOptions::default(), &mut tie, &token);
    assert_eq!(summary.iterations, 0);
}

fn favoured_fixture() -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions { multigraph: true });
    for v in ["a", "b", "c", "d"] {
        g.ensure_node(v);
    }
    g.set_edge_named("a", "x", Some("favoured"), None);
    g.set_edge_named("b", "y", Some("plain"), None);
    g.set_edge_named("c", "x", Some("plain"), None);
    g.set_edge_named("d", "x", Some("plain"), None);
    g
}

fn single_sweep(favoured: Option<&dyn Fn(&EdgeKey) -> bool>) -> Vec<String> {
    let (mut d, mut layering) = prepared(&favoured_fixture());
    let opts = OrderOptions {
        max_iterations: 1,
        transpose_limit: 0,
        favoured,
        ..Default::default()
    };
    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    order(&mut d, &mut layering, &opts, &mut tie, &CancellationToken::new());
    layering
        .layer(1)
        .iter()
        .map(|&v| d.vertex(v).kind.as_real().unwrap().clone())
        .collect()
}

#[test]
fn favoured_edges_decide_the_median() {
    // Plain medians put `y` (below `b`) left of `x` (below `a`, `c`, `d`).
    assert_eq!(single_sweep(None), vec!["y", "x"]);

    let favoured = |e: &EdgeKey| e.name.as_deref() == Some("favoured");
    assert_eq!(single_sweep(Some(&favoured)), vec!["x", "y"]);
}

proptest! {
    #[test]
    fn best_ordering_never_has_more_crossings_than_the_initial_one(
        n in 2usize..10,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..20),
        iterations in 1usize..6,
        seed in prop::option::of(any::<u64>()),
    ) {
        let mut g: Graph<(), ()> = Graph::new(GraphOptions { multigraph: true });
        for v in 0..n {
            g.ensure_node(v.to_string());
        }
        for (i, &(a, b)) in edges.iter().enumerate() {
            let (a, b) = (a % n, b % n);
            if a != b {
                g.set_edge_named(a.to_string(), b.to_string(), Some(i.to_string()), None);
            }
        }
        let (mut d, mut layering) = prepared(&g);
        let opts = OrderOptions {
            max_iterations: iterations,
            ..Default::default()
        };
        let mut tie = TieBreaker::new(seed.map_or(TieBreak::Deterministic, TieBreak::Seeded));
        let summary = order(&mut d, &mut layering, &opts, &mut tie, &CancellationToken::new());
        prop_assert!(summary.best_crossings <= summary.initial_crossings);
        prop_assert_eq!(
            total_crossings(&d, &layering, &AccumulatorTreeCounter),
            summary.best_crossings
        );
        prop_assert_eq!(layering.vertex_count(), d.vertex_count());
    }
}
