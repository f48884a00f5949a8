//! Layer assignment.

use crate::cancel::CancellationToken;
use crate::config::{LayeringStrategy, LayoutConfig};
use crate::delegate::DelegateGraph;
use crate::error::Result;
use crate::rng::TieBreaker;
use std::hash::Hash;

pub mod coffman_graham;
pub mod longest_path;
pub mod network_simplex;
pub mod top_down;
pub mod util;

pub use network_simplex::SimplexSummary;

/// Assigns a rank to every vertex of the (acyclic) working graph using the configured strategy.
///
/// Afterwards every rank is `>= 0` and every edge satisfies
/// `rank(target) >= rank(source) + min_separation`.
pub fn run<V: Clone + Eq + Hash, E>(
    g: &mut DelegateGraph<V, E>,
    config: &LayoutConfig,
    tie_break: &mut TieBreaker,
    token: &CancellationToken,
) -> Result<()> {
    match config.layering {
        LayeringStrategy::LongestPath => longest_path::longest_path(g),
        LayeringStrategy::TopDown => top_down::top_down(g),
        LayeringStrategy::CoffmanGraham => {
            coffman_graham::coffman_graham(g, config.coffman_graham_width)
        }
        LayeringStrategy::NetworkSimplex => {
            let summary = network_simplex::network_simplex(
                g,
                config.max_simplex_iterations,
                tie_break,
                token,
            )?;
            tracing::debug!(
                pivots = summary.pivots,
                tree_edges = summary.tree_edges.len(),
                "network simplex"
            );
        }
    }
    util::normalize_ranks(g);
    Ok(())
}
