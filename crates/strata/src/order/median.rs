//! Median heuristic for one layer against a fixed neighbouring layer.

use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use std::hash::Hash;

/// Marks edges whose neighbours dominate the median.
pub type EdgePredicate<'a, E> = &'a dyn Fn(&E) -> bool;

/// Which adjacent layer is held fixed while `rank` is reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    Above,
    Below,
}

/// Gansner's weighted median of sorted positions; `None` without neighbours.
pub fn weighted_median(positions: &[f64]) -> Option<f64> {
    let len = positions.len();
    let m = len / 2;
    match len {
        0 => None,
        _ if len % 2 == 1 => Some(positions[m]),
        2 => Some((positions[0] + positions[1]) / 2.0),
        _ => {
            let left = positions[m - 1] - positions[0];
            let right = positions[len - 1] - positions[m];
            if left + right == 0.0 {
                Some((positions[m - 1] + positions[m]) / 2.0)
            } else {
                Some((positions[m - 1] * right + positions[m] * left) / (left + right))
            }
        }
    }
}

/// Neighbour positions of `v` in the fixed layer, sorted. With a predicate, favoured edges win
/// whenever `v` has any.
fn neighbour_positions<V, E>(
    g: &DelegateGraph<V, E>,
    v: usize,
    fixed: Fixed,
    favoured: Option<EdgePredicate<'_, E>>,
) -> Vec<f64>
where
    V: Clone + Eq + Hash,
{
    let rank = g.vertex(v).rank;
    let (edges, want) = match fixed {
        Fixed::Above => (g.in_edges(v), rank - 1),
        Fixed::Below => (g.out_edges(v), rank + 1),
    };

    let mut all: Vec<f64> = Vec::new();
    let mut preferred: Vec<f64> = Vec::new();
    for &e in edges {
        let Some(edge) = g.edge(e) else {
            continue;
        };
        let other = match fixed {
            Fixed::Above => edge.source,
            Fixed::Below => edge.target,
        };
        if g.vertex(other).rank != want {
            continue;
        }
        let pos = g.vertex(other).index as f64;
        all.push(pos);
        if favoured.is_some_and(|f| f(edge.origin.edge())) {
            preferred.push(pos);
        }
    }

    let mut out = if preferred.is_empty() { all } else { preferred };
    out.sort_by(f64::total_cmp);
    out
}

/// Reorders layer `rank` by neighbour median. Vertices without neighbours in the fixed layer keep
/// their slot; the rest are stably sorted into the remaining slots.
pub fn median_sweep_layer<V, E>(
    g: &mut DelegateGraph<V, E>,
    layering: &mut Layering,
    rank: usize,
    fixed: Fixed,
    favoured: Option<EdgePredicate<'_, E>>,
) where
    V: Clone + Eq + Hash,
{
    let layer = layering.layer(rank);
    let mut movable: Vec<(f64, usize)> = Vec::new();
    let mut slots: Vec<usize> = Vec::new();
    for (slot, &v) in layer.iter().enumerate() {
        if let Some(m) = weighted_median(&neighbour_positions(g, v, fixed, favoured)) {
            movable.push((m, v));
            slots.push(slot);
        }
    }
    if movable.len() < 2 {
        return;
    }
    movable.sort_by(|a, b| a.0.total_cmp(&b.0));

    let layer = layering.layer_mut(rank);
    for (slot, (_, v)) in slots.into_iter().zip(movable) {
        layer[slot] = v;
    }
    layering.reindex_layer(g, rank);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_median_cases() {
        assert_eq!(weighted_median(&[]), None);
        assert_eq!(weighted_median(&[3.0]), Some(3.0));
        assert_eq!(weighted_median(&[1.0, 4.0]), Some(2.5));
        assert_eq!(weighted_median(&[0.0, 1.0, 5.0]), Some(1.0));
        // left span 1, right span 3: pulled towards the tighter left cluster.
        assert_eq!(weighted_median(&[0.0, 1.0, 2.0, 5.0]), Some(1.25));
    }
}
