//! The read-only graph view consumed by the layout pipeline.

use std::fmt::Debug;
use std::hash::Hash;

/// A directed graph with per-vertex incident edge enumeration.
///
/// Implementations are expected to answer `in_edges` / `out_edges` in time proportional to the
/// vertex degree; the layout calls them once per vertex while building its working graph.
pub trait DirectedGraph {
    type Vertex: Clone + Eq + Hash + Debug;
    type Edge: Clone + Eq + Hash + Debug;

    fn vertices(&self) -> impl Iterator<Item = Self::Vertex> + '_;

    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_;

    fn source(&self, edge: &Self::Edge) -> Option<Self::Vertex>;

    fn target(&self, edge: &Self::Edge) -> Option<Self::Vertex>;

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool;

    fn in_edges(&self, vertex: &Self::Vertex) -> Vec<Self::Edge>;

    fn out_edges(&self, vertex: &Self::Vertex) -> Vec<Self::Edge>;

    fn vertex_count(&self) -> usize {
        self.vertices().count()
    }

    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}
