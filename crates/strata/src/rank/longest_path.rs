//! Longest-path layering by source peeling.

use super::util::topological_order;
use crate::delegate::DelegateGraph;
use std::hash::Hash;

/// Places every source on rank 0 and every other vertex on the smallest rank its
/// predecessors allow. Minimizes the number of layers, not the total edge length.
pub fn longest_path<V: Clone + Eq + Hash, E>(g: &mut DelegateGraph<V, E>) {
    let order = topological_order(g);
    let mut rank: Vec<i32> = vec![0; g.vertex_count()];
    for &v in &order {
        for &e in g.in_edges(v) {
            let Some(edge) = g.edge(e) else {
                continue;
            };
            if edge.is_self_loop() {
                continue;
            }
            rank[v] = rank[v].max(rank[edge.source] + edge.min_separation);
        }
    }
    for (v, r) in rank.into_iter().enumerate() {
        g.vertex_mut(v).rank = r;
    }
}
