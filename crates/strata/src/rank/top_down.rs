//! Sink-anchored longest-path layering.

use super::util::{normalize_ranks, topological_order};
use crate::delegate::DelegateGraph;
use std::hash::Hash;

/// Pulls every vertex down as far as its successors allow: sinks share the bottom rank and each
/// other vertex sits `min_separation` above its closest successor.
pub fn top_down<V: Clone + Eq + Hash, E>(g: &mut DelegateGraph<V, E>) {
    let order = topological_order(g);
    let mut rank: Vec<i32> = vec![0; g.vertex_count()];
    for &v in order.iter().rev() {
        let mut best: Option<i32> = None;
        for &e in g.out_edges(v) {
            let Some(edge) = g.edge(e) else {
                continue;
            };
            if edge.is_self_loop() {
                continue;
            }
            let candidate = rank[edge.target] - edge.min_separation;
            best = Some(best.map_or(candidate, |b| b.min(candidate)));
        }
        rank[v] = best.unwrap_or(0);
    }
    for (v, r) in rank.into_iter().enumerate() {
        g.vertex_mut(v).rank = r;
    }
    normalize_ranks(g);
}
