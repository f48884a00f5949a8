//! Rank helpers (slack, normalization, topological order).

use crate::delegate::DelegateGraph;
use std::collections::VecDeque;
use std::hash::Hash;

/// `rank(target) - rank(source) - min_separation`; zero means tight.
pub fn slack<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>, e: usize) -> i32 {
    let Some(edge) = g.edge(e) else {
        return 0;
    };
    g.vertex(edge.target).rank - g.vertex(edge.source).rank - edge.min_separation
}

/// Shifts ranks so the smallest is 0.
pub fn normalize_ranks<V: Clone + Eq + Hash, E>(g: &mut DelegateGraph<V, E>) {
    let Some(min) = g.vertices().map(|(_, v)| v.rank).min() else {
        return;
    };
    if min == 0 {
        return;
    }
    for v in 0..g.vertex_count() {
        g.vertex_mut(v).rank -= min;
    }
}

/// `Σ weight · (rank(target) - rank(source))` over all non-loop edges.
pub fn weighted_length<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>) -> f64 {
    g.edges()
        .filter(|(_, e)| !e.is_self_loop())
        .map(|(_, e)| {
            e.weight * f64::from(g.vertex(e.target).rank - g.vertex(e.source).rank)
        })
        .sum()
}

/// Kahn order over non-loop edges; vertices on a cycle are left out.
pub fn topological_order<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>) -> Vec<usize> {
    let n = g.vertex_count();
    let mut indegree: Vec<usize> = vec![0; n];
    for (_, e) in g.edges() {
        if !e.is_self_loop() {
            indegree[e.target] += 1;
        }
    }
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut out: Vec<usize> = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        out.push(v);
        for &e in g.out_edges(v) {
            let Some(w) = g.target(e) else {
                continue;
            };
            if w == v {
                continue;
            }
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    out
}
