//! Crossing counts between adjacent layers.

use super::accumulator::AccumulatorTree;
use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use std::hash::Hash;

/// Counts crossings among the edges between two adjacent layers, each given as
/// `(north index, south index)`. Edges sharing an endpoint never cross.
pub trait CrossingCounter {
    fn count(&self, edges: &[(usize, usize)]) -> usize;
}

/// Quadratic insertion-sort inversion count.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSortCounter;

impl CrossingCounter for InsertionSortCounter {
    fn count(&self, edges: &[(usize, usize)]) -> usize {
        let mut sorted = edges.to_vec();
        sorted.sort_unstable();
        let mut south: Vec<usize> = sorted.into_iter().map(|(_, s)| s).collect();
        let mut crossings = 0;
        for i in 1..south.len() {
            let mut j = i;
            while j > 0 && south[j - 1] > south[j] {
                south.swap(j - 1, j);
                crossings += 1;
                j -= 1;
            }
        }
        crossings
    }
}

/// Barth–Jünger–Mutzel counting with an [`AccumulatorTree`], `O(E log V)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccumulatorTreeCounter;

impl CrossingCounter for AccumulatorTreeCounter {
    fn count(&self, edges: &[(usize, usize)]) -> usize {
        let Some(last) = edges.iter().map(|&(_, s)| s).max() else {
            return 0;
        };
        let mut sorted = edges.to_vec();
        sorted.sort_unstable();
        let mut tree = AccumulatorTree::new(last + 1);
        let mut crossings = 0;
        for (_, s) in sorted {
            crossings += tree.count_edges(s + 1, last);
            tree.add_edge(s);
        }
        crossings
    }
}

/// Edges between layer `rank` and `rank + 1` as index pairs.
pub fn layer_edges<V: Clone + Eq + Hash, E>(
    g: &DelegateGraph<V, E>,
    layering: &Layering,
    positions: &[usize],
    rank: usize,
) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::new();
    for &v in layering.layer(rank) {
        for &e in g.out_edges(v) {
            let Some(w) = g.target(e) else {
                continue;
            };
            if usize::try_from(g.vertex(w).rank).ok() == Some(rank + 1) {
                out.push((positions[v], positions[w]));
            }
        }
    }
    out
}

/// Sum of crossings over all adjacent layer pairs.
pub fn total_crossings<V: Clone + Eq + Hash, E>(
    g: &DelegateGraph<V, E>,
    layering: &Layering,
    counter: &impl CrossingCounter,
) -> usize {
    let positions = layering.positions(g.vertex_count());
    (0..layering.len().saturating_sub(1))
        .map(|r| counter.count(&layer_edges(g, layering, &positions, r)))
        .sum()
}

/// Crossings among the edges of two neighbouring vertices `u` and `w`, given the positions of
/// their neighbours in one adjacent layer. Returns `(u before w, w before u)`.
pub fn pair_crossings(u_ends: &[usize], w_ends: &[usize]) -> (usize, usize) {
    let Some(last) = u_ends.iter().chain(w_ends).copied().max() else {
        return (0, 0);
    };
    let mut tree = AccumulatorTree::new(last + 1);
    for &b in w_ends {
        tree.add_edge(b);
    }
    let mut uw = 0;
    let mut wu = 0;
    for &a in u_ends {
        if a > 0 {
            uw += tree.count_edges(0, a - 1);
        }
        wu += tree.count_edges(a + 1, last);
    }
    (uw, wu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_crossings_counts_both_orders() {
        // u -> {2}, w -> {0, 1}: u left of w crosses twice, w left of u never.
        assert_eq!(pair_crossings(&[2], &[0, 1]), (2, 0));
        assert_eq!(pair_crossings(&[1], &[1]), (0, 0));
        assert_eq!(pair_crossings(&[], &[3]), (0, 0));
    }
}
