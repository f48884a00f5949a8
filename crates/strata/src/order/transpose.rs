use super::cross_count::pair_crossings;
use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use crate::rng::TieBreaker;
use std::hash::Hash;

/// Positions of `v`'s neighbours one rank up and one rank down.
fn neighbour_ends<V, E>(g: &DelegateGraph<V, E>, v: usize) -> (Vec<usize>, Vec<usize>)
where
    V: Clone + Eq + Hash,
{
    let rank = g.vertex(v).rank;
    let up = g
        .in_edges(v)
        .iter()
        .filter_map(|&e| g.source(e))
        .filter(|&u| g.vertex(u).rank == rank - 1)
        .map(|u| g.vertex(u).index)
        .collect();
    let down = g
        .out_edges(v)
        .iter()
        .filter_map(|&e| g.target(e))
        .filter(|&w| g.vertex(w).rank == rank + 1)
        .map(|w| g.vertex(w).index)
        .collect();
    (up, down)
}

/// Crossings for `u` left of `w` and for `w` left of `u`, against both adjacent layers.
fn crossings_both_ways<V, E>(g: &DelegateGraph<V, E>, u: usize, w: usize) -> (usize, usize)
where
    V: Clone + Eq + Hash,
{
    let (u_up, u_down) = neighbour_ends(g, u);
    let (w_up, w_down) = neighbour_ends(g, w);
    let (up_uw, up_wu) = pair_crossings(&u_up, &w_up);
    let (down_uw, down_wu) = pair_crossings(&u_down, &w_down);
    (up_uw + down_uw, up_wu + down_wu)
}

/// Swaps adjacent vertices while that strictly lowers crossings, for at most `limit` passes over
/// the whole layering. A seeded tie-breaker may also swap on an equal non-zero count, but such
/// swaps never extend the loop.
///
/// Returns the number of swaps made.
pub fn transpose<V, E>(
    g: &mut DelegateGraph<V, E>,
    layering: &mut Layering,
    limit: usize,
    tie_break: &mut TieBreaker,
) -> usize
where
    V: Clone + Eq + Hash,
{
    let mut swaps: usize = 0;
    for _ in 0..limit {
        let mut improved = false;
        for rank in 0..layering.len() {
            for j in 0..layering.layer(rank).len().saturating_sub(1) {
                let u = layering.layer(rank)[j];
                let w = layering.layer(rank)[j + 1];
                let (current, swapped) = crossings_both_ways(g, u, w);
                let better = swapped < current;
                let tie = swapped == current && current > 0 && tie_break.coin();
                if !(better || tie) {
                    continue;
                }
                layering.layer_mut(rank).swap(j, j + 1);
                g.vertex_mut(u).index = j + 1;
                g.vertex_mut(w).index = j;
                swaps += 1;
                improved |= better;
            }
        }
        if !improved {
            break;
        }
    }
    swaps
}
