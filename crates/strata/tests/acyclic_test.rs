use strata::acyclic;
use strata::delegate::DelegateGraph;
use strata::graph::{EdgeKey, Graph, GraphOptions, alg};

fn fixture() -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::default();
    for (v, w) in [
        ("A", "B"),
        ("A", "C"),
        ("C", "D"),
        ("A", "D"),
        ("B", "E"),
        ("D", "E"),
        ("E", "F"),
        ("D", "G"),
        ("E", "A"),
    ] {
        g.set_edge(v, w);
    }
    g
}

fn feedback_keys(d: &DelegateGraph<String, EdgeKey>) -> Vec<EdgeKey> {
    acyclic::feedback_edges(d)
        .into_iter()
        .map(|e| d.edge(e).unwrap().origin.edge().clone())
        .collect()
}

#[test]
fn feedback_set_of_the_fixture_is_the_back_edge() {
    let d = DelegateGraph::from_graph(&fixture()).unwrap();
    assert_eq!(feedback_keys(&d), vec![EdgeKey::between("E", "A")]);
}

#[test]
fn run_reverses_the_feedback_edges() {
    let mut d = DelegateGraph::from_graph(&fixture()).unwrap();
    assert!(!alg::is_acyclic(&d));

    let reversed = acyclic::run(&mut d);
    assert_eq!(reversed.len(), 1);
    let edge = d.edge(reversed[0]).unwrap();
    assert!(edge.reversed);
    assert_eq!(edge.source, d.index_of(&"A".to_string()).unwrap());
    assert_eq!(edge.target, d.index_of(&"E".to_string()).unwrap());
    assert!(alg::is_acyclic(&d));
    assert!(alg::find_cycles(&d).is_empty());
}

#[test]
fn empty_and_edgeless_graphs_have_no_feedback() {
    let g: Graph<(), ()> = Graph::default();
    let d = DelegateGraph::from_graph(&g).unwrap();
    assert!(acyclic::feedback_edges(&d).is_empty());

    let mut g: Graph<(), ()> = Graph::default();
    g.ensure_node("a").ensure_node("b").ensure_node("c");
    let d = DelegateGraph::from_graph(&g).unwrap();
    assert!(acyclic::feedback_edges(&d).is_empty());
}

#[test]
fn self_loops_are_never_reported() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("a", "a");
    g.set_path(&["a", "b", "c", "a"]);
    let d = DelegateGraph::from_graph(&g).unwrap();
    assert_eq!(feedback_keys(&d), vec![EdgeKey::between("c", "a")]);
}

#[test]
fn parallel_edges_are_reported_individually() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions { multigraph: true });
    g.set_edge_named("a", "b", Some("x"), None);
    g.set_edge_named("a", "b", Some("y"), None);
    for name in ["p", "q", "r"] {
        g.set_edge_named("b", "a", Some(name), None);
    }
    let mut d = DelegateGraph::from_graph(&g).unwrap();
    let keys = feedback_keys(&d);
    assert_eq!(
        keys,
        vec![
            EdgeKey::new("a", "b", Some("x")),
            EdgeKey::new("a", "b", Some("y")),
        ]
    );
    acyclic::run(&mut d);
    assert!(alg::is_acyclic(&d));
}

#[test]
fn random_graphs_become_acyclic() {
    // Small deterministic LCG so the cases are reproducible.
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = |bound: u64| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };
    for _ in 0..200 {
        let n = 1 + next(9);
        let m = next(20);
        let mut g: Graph<(), ()> = Graph::new(GraphOptions { multigraph: true });
        for v in 0..n {
            g.ensure_node(v.to_string());
        }
        for i in 0..m {
            let v = next(n).to_string();
            let w = next(n).to_string();
            if v != w {
                g.set_edge_named(v, w, Some(i.to_string()), None);
            }
        }
        let mut d = DelegateGraph::from_graph(&g).unwrap();
        acyclic::run(&mut d);
        assert!(alg::is_acyclic(&d));
    }
}

#[test]
fn long_cycles_with_chords_are_broken_quickly() {
    let n = 40_000usize;
    let mut g: Graph<(), ()> = Graph::default();
    for v in 0..n {
        g.ensure_node(v.to_string());
    }
    for v in 0..n {
        g.set_edge(v.to_string(), ((v + 1) % n).to_string());
        g.set_edge(v.to_string(), ((v + 2) % n).to_string());
    }
    let mut d = DelegateGraph::from_graph(&g).unwrap();
    let reversed = acyclic::run(&mut d);
    assert!(!reversed.is_empty());
    assert!(reversed.len() < n);
    assert!(alg::is_acyclic(&d));
}
