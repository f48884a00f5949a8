use strata_graph::alg::{self, CycleError};
use strata_graph::{DirectedGraph, EdgeKey, Graph, GraphOptions};

fn diamond() -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_path(&["a", "b", "d"]).set_path(&["a", "c", "d"]);
    g
}

#[test]
fn set_edge_creates_missing_nodes_in_order() {
    let g = diamond();
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec!["a", "b", "d", "c"]);
    assert_eq!(g.edge_count(), 4);
    assert!(g.has_edge("a", "b", None));
    assert!(!g.has_edge("b", "a", None));
}

#[test]
fn incident_queries_follow_insertion_order() {
    let g = diamond();
    assert_eq!(g.successors("a"), vec!["b", "c"]);
    assert_eq!(g.predecessors("d"), vec!["b", "c"]);
    assert_eq!(g.sources(), vec!["a"]);
    assert_eq!(g.sinks(), vec!["d"]);
    assert_eq!(
        g.out_edges("a", Some("c")),
        vec![EdgeKey::between("a", "c")]
    );
    assert!(g.in_edges("a", None).is_empty());
    assert!(g.successors("missing").is_empty());
}

#[test]
fn labels_default_and_update() {
    let mut g: Graph<u32, &'static str> = Graph::default();
    g.set_default_node_label(|| 7).set_edge("x", "y");
    assert_eq!(g.node("x"), Some(&7));
    assert_eq!(g.edge("x", "y", None), Some(&""));

    g.set_edge_with_label("x", "y", "heavy");
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("x", "y", None), Some(&"heavy"));
    *g.node_mut("y").unwrap() = 3;
    assert_eq!(g.node("y"), Some(&3));
}

#[test]
fn removing_a_node_drops_its_edges() {
    let mut g = diamond();
    assert!(g.remove_node("b"));
    assert!(!g.remove_node("b"));
    assert_eq!(g.node_ids(), vec!["a", "d", "c"]);
    assert_eq!(
        g.edge_keys(),
        vec![EdgeKey::between("a", "c"), EdgeKey::between("c", "d")]
    );
    assert_eq!(g.predecessors("d"), vec!["c"]);
    assert!(g.has_edge("c", "d", None));
}

#[test]
fn removing_an_edge_keeps_lookups_consistent() {
    let mut g = diamond();
    assert!(g.remove_edge_key(&EdgeKey::between("a", "b")));
    assert!(!g.remove_edge("a", "b", None));
    assert!(g.has_edge("b", "d", None));
    assert!(g.has_edge("c", "d", None));
    assert_eq!(g.successors("a"), vec!["c"]);
}

#[test]
fn multigraph_keeps_named_parallel_edges() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions { multigraph: true });
    g.set_edge_named("a", "b", Some("x"), None)
        .set_edge_named("a", "b", Some("y"), None)
        .set_edge("a", "b");
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.out_edges("a", None).len(), 3);
    assert_eq!(g.successors("a"), vec!["b"]);
    assert!(g.has_edge("a", "b", Some("y")));

    let mut simple: Graph<(), ()> = Graph::default();
    simple
        .set_edge_named("a", "b", Some("x"), None)
        .set_edge_named("a", "b", Some("y"), None);
    assert_eq!(simple.edge_count(), 1);
    assert_eq!(simple.edge_keys()[0].name, None);
}

#[test]
fn directed_view_reports_endpoints_of_present_edges_only() {
    let g = diamond();
    let ab = EdgeKey::between("a", "b");
    assert_eq!(DirectedGraph::source(&g, &ab), Some("a".to_string()));
    assert_eq!(DirectedGraph::target(&g, &ab), Some("b".to_string()));
    assert_eq!(DirectedGraph::source(&g, &EdgeKey::between("d", "a")), None);
    assert!(g.contains_vertex(&"c".to_string()));
    assert_eq!(DirectedGraph::vertex_count(&g), 4);
    assert_eq!(DirectedGraph::edges(&g).count(), 4);
}

#[test]
fn topsort_orders_every_edge_forward() {
    let g = diamond();
    let order = alg::topsort(&g).unwrap();
    assert_eq!(order, vec!["a", "b", "c", "d"]);
    assert!(alg::is_acyclic(&g));
}

#[test]
fn topsort_rejects_cycles() {
    let mut g = diamond();
    g.set_edge("d", "a");
    assert_eq!(alg::topsort(&g), Err(CycleError));
    assert!(!alg::is_acyclic(&g));
}

#[test]
fn find_cycles_reports_components_and_self_loops() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_path(&["a", "b", "c", "a"])
        .set_edge("c", "d")
        .set_edge("e", "e")
        .ensure_node("f");
    let mut cycles: Vec<Vec<String>> = alg::find_cycles(&g)
        .into_iter()
        .map(|mut c| {
            c.sort();
            c
        })
        .collect();
    cycles.sort();
    assert_eq!(cycles, vec![vec!["a", "b", "c"], vec!["e"]]);
    assert!(alg::find_cycles(&diamond()).is_empty());
}

#[test]
fn postorder_visits_children_first() {
    let g = diamond();
    let order = alg::postorder(&g, &["a".to_string()]);
    assert_eq!(order, vec!["d", "b", "c", "a"]);
}

#[test]
fn components_are_weakly_connected() {
    let mut g = diamond();
    g.set_edge("x", "y").ensure_node("z");
    let comps = alg::components(&g);
    assert_eq!(comps.len(), 3);
    assert_eq!(comps[0], vec!["a", "b", "c", "d"]);
    assert_eq!(comps[1], vec!["x", "y"]);
    assert_eq!(comps[2], vec!["z"]);
}

#[test]
fn default_edge_labels_and_key_lookups() {
    let mut g: Graph<(), u32> = Graph::new(GraphOptions { multigraph: true });
    assert!(g.is_multigraph());
    assert!(!Graph::<(), ()>::default().is_multigraph());

    g.set_default_edge_label(|| 9)
        .set_edge("a", "b")
        .set_edge_named("a", "b", Some("heavy"), Some(4));
    assert_eq!(g.edge_by_key(&EdgeKey::between("a", "b")), Some(&9));
    assert_eq!(
        g.edge_by_key(&EdgeKey::new("a", "b", Some("heavy"))),
        Some(&4)
    );
    assert_eq!(g.edge_by_key(&EdgeKey::between("b", "a")), None);
}
