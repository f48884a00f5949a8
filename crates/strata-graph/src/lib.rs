//! Directed graph APIs used by `strata`.
//!
//! The layout pipeline only talks to caller graphs through [`DirectedGraph`]. [`Graph`] is a
//! string-keyed, adjacency-indexed container for callers that do not already own a graph type.

mod directed;
mod graph;

pub mod alg;

pub use directed::DirectedGraph;
pub use graph::{EdgeKey, Graph, GraphOptions};
