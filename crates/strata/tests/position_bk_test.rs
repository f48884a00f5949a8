use strata::acyclic;
use strata::cancel::CancellationToken;
use strata::config::{BkDirections, CoordinateStrategy, LayoutConfig, TieBreak};
use strata::delegate::{DelegateEdge, DelegateGraph, EdgeOrigin, Size};
use strata::graph::{EdgeKey, Graph};
use strata::layering::Layering;
use strata::order::{OrderOptions, order};
use strata::position::{self, bk, centered};
use strata::rank::longest_path::longest_path;
use strata::rng::TieBreaker;
use strata::synthetic::insert_synthetic_vertices;

fn width_of(v: &str) -> f64 {
    10.0 * v.len() as f64
}

/// Runs the pipeline up to x assignment.
fn placed(g: &Graph<(), ()>, config: &LayoutConfig) -> (DelegateGraph<String, EdgeKey>, Layering) {
    let mut d = DelegateGraph::from_graph_with(
        g,
        |v: &String| Size::new(width_of(v), 10.0),
        |_| 1.0,
        |_| 1,
    )
    .unwrap();
    acyclic::run(&mut d);
    longest_path(&mut d);
    let mut layering = Layering::from_ranks(&d);
    insert_synthetic_vertices(&mut d, &mut layering);
    let mut tie = TieBreaker::new(TieBreak::Deterministic);
    let token = CancellationToken::new();
    order(&mut d, &mut layering, &OrderOptions::default(), &mut tie, &token);
    position::assign_y(&mut d, &layering, config);
    assert!(position::assign_x(&mut d, &layering, config, &token));
    (d, layering)
}

fn assert_separated(d: &DelegateGraph<String, EdgeKey>, layering: &Layering, config: &LayoutConfig) {
    let gap = |v: usize| {
        if d.is_synthetic(v) {
            config.edge_separation
        } else {
            config.horizontal_offset
        }
    };
    for layer in layering.layers() {
        for pair in layer.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            let need = d.vertex(u).size.width / 2.0
                + gap(u) / 2.0
                + gap(v) / 2.0
                + d.vertex(v).size.width / 2.0;
            let got = d.vertex(v).point.x - d.vertex(u).point.x;
            assert!(got >= need - 1e-9, "{u} -> {v}: {got} < {need}");
        }
    }
}

fn sample() -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_path(&["a", "bb", "ccc", "d"])
        .set_edge("a", "d")
        .set_edge("a", "eeee")
        .set_edge("eeee", "d")
        .set_edge("f", "ccc")
        .set_edge("f", "d")
        .set_edge("d", "a");
    g
}

#[test]
fn brandes_kopf_keeps_neighbours_apart() {
    let config = LayoutConfig::default();
    let (d, layering) = placed(&sample(), &config);
    assert_separated(&d, &layering, &config);
}

#[test]
fn every_single_direction_keeps_neighbours_apart() {
    let singles = [
        BkDirections { up_left: true, up_right: false, down_left: false, down_right: false },
        BkDirections { up_left: false, up_right: true, down_left: false, down_right: false },
        BkDirections { up_left: false, up_right: false, down_left: true, down_right: false },
        BkDirections { up_left: false, up_right: false, down_left: false, down_right: true },
    ];
    for directions in singles {
        let config = LayoutConfig {
            directions,
            ..Default::default()
        };
        let (d, layering) = placed(&sample(), &config);
        assert_separated(&d, &layering, &config);
    }
}

#[test]
fn a_chain_is_drawn_straight() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_path(&["a", "b", "c"]);
    let config = LayoutConfig::default();
    let (d, _) = placed(&g, &config);
    let xs: Vec<f64> = (0..3).map(|v| d.vertex(v).point.x).collect();
    assert_eq!(xs[0], xs[1]);
    assert_eq!(xs[1], xs[2]);
    let ys: Vec<f64> = (0..3).map(|v| d.vertex(v).point.y).collect();
    assert_eq!(ys, vec![0.0, 50.0, 100.0]);
}

#[test]
fn type1_conflicts_mark_segments_crossing_inner_segments() {
    let mut d: DelegateGraph<&str, u32> = DelegateGraph::new();
    let a = d.add_vertex("a", Size::default());
    let b = d.add_vertex("b", Size::default());
    let s1 = d.add_synthetic_vertex();
    let s2 = d.add_synthetic_vertex();
    d.add_edge(DelegateEdge::new(a, b, EdgeOrigin::Original(0)));
    d.add_edge(DelegateEdge::new(s1, s2, EdgeOrigin::Split(1)));
    let layering = Layering::from_layers(vec![vec![a, s1], vec![s2, b]]);
    layering.reindex(&mut d);

    let conflicts = bk::find_type1_conflicts(&d, &layering);
    assert!(bk::has_conflict(&conflicts, a, b));
    assert!(!bk::has_conflict(&conflicts, s1, s2));
    assert_eq!(conflicts.len(), 1);
}

#[test]
fn type1_conflicts_ignore_segments_that_do_not_cross() {
    let mut d: DelegateGraph<&str, u32> = DelegateGraph::new();
    let a = d.add_vertex("a", Size::default());
    let b = d.add_vertex("b", Size::default());
    let s1 = d.add_synthetic_vertex();
    let s2 = d.add_synthetic_vertex();
    d.add_edge(DelegateEdge::new(a, b, EdgeOrigin::Original(0)));
    d.add_edge(DelegateEdge::new(s1, s2, EdgeOrigin::Split(1)));
    let layering = Layering::from_layers(vec![vec![a, s1], vec![b, s2]]);
    layering.reindex(&mut d);

    assert!(bk::find_type1_conflicts(&d, &layering).is_empty());
}

#[test]
fn centered_layers_share_a_midline() {
    let mut d: DelegateGraph<&str, u32> = DelegateGraph::new();
    let a = d.add_vertex("a", Size::new(10.0, 10.0));
    let b = d.add_vertex("b", Size::new(10.0, 10.0));
    let c = d.add_vertex("c", Size::new(10.0, 10.0));
    let layering = Layering::from_layers(vec![vec![a], vec![b, c]]);
    layering.reindex(&mut d);

    let xs = centered::position_x(&d, &layering, 50.0);
    assert_eq!(xs[b], 5.0);
    assert_eq!(xs[c], 65.0);
    assert_eq!(xs[a], 35.0);
}

#[test]
fn vertex_heights_stretch_layers() {
    let mut d: DelegateGraph<&str, u32> = DelegateGraph::new();
    let a = d.add_vertex("a", Size::new(10.0, 40.0));
    let b = d.add_vertex("b", Size::new(10.0, 10.0));
    let c = d.add_vertex("c", Size::new(10.0, 20.0));
    let layering = Layering::from_layers(vec![vec![a, b], vec![c]]);
    layering.reindex(&mut d);

    let config = LayoutConfig {
        use_vertex_heights: true,
        coordinates: CoordinateStrategy::Centered,
        vertical_offset: 5.0,
        ..Default::default()
    };
    position::assign_y(&mut d, &layering, &config);
    assert_eq!(d.vertex(a).point.y, 20.0);
    assert_eq!(d.vertex(b).point.y, 20.0);
    // 40 tall first layer, 5 gap, then half of 20.
    assert_eq!(d.vertex(c).point.y, 55.0);
}
