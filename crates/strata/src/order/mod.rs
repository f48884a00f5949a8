//! Crossing minimization.
//!
//! A DFS initial order followed by alternating median sweeps and adjacent transpositions. The
//! ordering with the fewest crossings seen, the initial one included, is restored at the end.

mod accumulator;
pub use accumulator::AccumulatorTree;

mod cross_count;
pub use cross_count::{
    AccumulatorTreeCounter, CrossingCounter, InsertionSortCounter, layer_edges, pair_crossings,
    total_crossings,
};

mod init_order;
pub use init_order::{EdgeComparator, init_order};

mod median;
pub use median::{EdgePredicate, Fixed, median_sweep_layer, weighted_median};

mod transpose;
pub use transpose::transpose;

use crate::cancel::CancellationToken;
use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use crate::rng::TieBreaker;
use std::hash::Hash;

pub struct OrderOptions<'a, E> {
    pub max_iterations: usize,
    pub transpose_limit: usize,
    pub compare: Option<EdgeComparator<'a, E>>,
    pub favoured: Option<EdgePredicate<'a, E>>,
}

impl<E> Default for OrderOptions<'_, E> {
    fn default() -> Self {
        Self {
            max_iterations: 23,
            transpose_limit: 10,
            compare: None,
            favoured: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub initial_crossings: usize,
    pub best_crossings: usize,
    pub iterations: usize,
}

/// Orders every layer of `g` in place and writes the result to `layering` and the vertices'
/// `index` fields.
pub fn order<V, E>(
    g: &mut DelegateGraph<V, E>,
    layering: &mut Layering,
    opts: &OrderOptions<'_, E>,
    tie_break: &mut TieBreaker,
    token: &CancellationToken,
) -> OrderSummary
where
    V: Clone + Eq + Hash,
{
    let counter = AccumulatorTreeCounter;

    *layering = init_order(g, opts.compare);
    layering.reindex(g);

    let initial = total_crossings(g, layering, &counter);
    let mut best_cc = initial;
    let mut best_layering = layering.clone();

    let mut iterations: usize = 0;
    for i in 0..opts.max_iterations {
        if token.is_cancelled() || best_cc == 0 {
            break;
        }
        iterations += 1;

        if i % 2 == 0 {
            for rank in 1..layering.len() {
                median_sweep_layer(g, layering, rank, Fixed::Above, opts.favoured);
            }
        } else {
            for rank in (0..layering.len().saturating_sub(1)).rev() {
                median_sweep_layer(g, layering, rank, Fixed::Below, opts.favoured);
            }
        }
        let swaps = transpose(g, layering, opts.transpose_limit, tie_break);

        let cc = total_crossings(g, layering, &counter);
        tracing::trace!(iteration = i, crossings = cc, swaps, "order sweep");
        if cc < best_cc {
            best_cc = cc;
            best_layering = layering.clone();
        }
    }

    *layering = best_layering;
    layering.reindex(g);
    tracing::debug!(
        initial,
        best = best_cc,
        iterations,
        seeded = tie_break.is_seeded(),
        "order"
    );
    OrderSummary {
        initial_crossings: initial,
        best_crossings: best_cc,
        iterations,
    }
}
