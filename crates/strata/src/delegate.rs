//! Working graph wrapped around the caller's graph.
//!
//! The layout never mutates the caller's [`DirectedGraph`]. Instead it copies vertices and edges
//! into a [`DelegateGraph`] whose wrappers carry rank, in-layer index, size and position, and
//! which can hold synthetic routing vertices that have no counterpart in the input.

use crate::error::{LayoutError, Result};
use rustc_hash::FxHashMap as HashMap;
use std::fmt;
use std::hash::Hash;
use strata_graph::DirectedGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyntheticId(pub u32);

impl fmt::Display for SyntheticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_s{}", self.0)
    }
}

/// A working vertex is either one of the caller's vertices or an inserted waypoint.
///
/// Synthetic vertices compare by their per-run id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VertexKind<V> {
    Real(V),
    Synthetic(SyntheticId),
}

impl<V> VertexKind<V> {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, VertexKind::Synthetic(_))
    }

    pub fn as_real(&self) -> Option<&V> {
        match self {
            VertexKind::Real(v) => Some(v),
            VertexKind::Synthetic(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct DelegateVertex<V> {
    pub kind: VertexKind<V>,
    pub rank: i32,
    /// Position within the vertex's layer.
    pub index: usize,
    pub point: Point,
    pub size: Size,
}

impl<V> DelegateVertex<V> {
    pub fn is_synthetic(&self) -> bool {
        self.kind.is_synthetic()
    }
}

/// Which caller edge a working edge stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeOrigin<E> {
    Original(E),
    /// One unit-span segment of a longer edge.
    Split(E),
}

impl<E> EdgeOrigin<E> {
    pub fn edge(&self) -> &E {
        match self {
            EdgeOrigin::Original(e) | EdgeOrigin::Split(e) => e,
        }
    }

    pub fn into_edge(self) -> E {
        match self {
            EdgeOrigin::Original(e) | EdgeOrigin::Split(e) => e,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, EdgeOrigin::Split(_))
    }
}

#[derive(Debug, Clone)]
pub struct DelegateEdge<E> {
    pub source: usize,
    pub target: usize,
    pub origin: EdgeOrigin<E>,
    pub weight: f64,
    pub min_separation: i32,
    /// Set when cycle removal flipped this edge.
    pub reversed: bool,
}

impl<E> DelegateEdge<E> {
    pub fn new(source: usize, target: usize, origin: EdgeOrigin<E>) -> Self {
        Self {
            source,
            target,
            origin,
            weight: 1.0,
            min_separation: 1,
            reversed: false,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Index-addressed working graph.
///
/// Real vertices occupy `0..real_vertex_count()`; synthetic vertices are appended after them and
/// dropped together by [`DelegateGraph::remove_synthetic_vertices`]. Removed edges leave a
/// tombstone so edge ids stay stable for the whole run.
#[derive(Debug, Clone)]
pub struct DelegateGraph<V, E> {
    vertices: Vec<DelegateVertex<V>>,
    real_count: usize,
    index_by_vertex: HashMap<V, usize>,
    edges: Vec<Option<DelegateEdge<E>>>,
    live_edges: usize,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
    next_synthetic: u32,
}

impl<V, E> Default for DelegateGraph<V, E>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> DelegateGraph<V, E>
where
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            real_count: 0,
            index_by_vertex: HashMap::default(),
            edges: Vec::new(),
            live_edges: 0,
            out_adj: Vec::new(),
            in_adj: Vec::new(),
            next_synthetic: 0,
        }
    }

    /// Wraps `g` with zero vertex sizes and unit edge weights and separations.
    pub fn from_graph<G>(g: &G) -> Result<Self>
    where
        G: DirectedGraph<Vertex = V, Edge = E>,
        V: fmt::Debug,
        E: fmt::Debug,
    {
        Self::from_graph_with(g, |_| Size::default(), |_| 1.0, |_| 1)
    }

    pub fn from_graph_with<G>(
        g: &G,
        size: impl Fn(&V) -> Size,
        weight: impl Fn(&E) -> f64,
        min_separation: impl Fn(&E) -> usize,
    ) -> Result<Self>
    where
        G: DirectedGraph<Vertex = V, Edge = E>,
        V: fmt::Debug,
        E: fmt::Debug,
    {
        let mut out = Self::new();
        for v in g.vertices() {
            let s = size(&v);
            out.add_vertex(v, s);
        }
        for e in g.edges() {
            let source = endpoint(&out, g.source(&e), &e)?;
            let target = endpoint(&out, g.target(&e), &e)?;
            let mut edge = DelegateEdge::new(source, target, EdgeOrigin::Original(e));
            edge.weight = weight(edge.origin.edge());
            edge.min_separation = i32::try_from(min_separation(edge.origin.edge()).max(1))
                .unwrap_or(i32::MAX);
            out.add_edge(edge);
        }
        Ok(out)
    }

    /// Adds a real vertex, or returns the existing index when `v` is already present.
    pub fn add_vertex(&mut self, v: V, size: Size) -> usize {
        if let Some(&ix) = self.index_by_vertex.get(&v) {
            return ix;
        }
        debug_assert_eq!(
            self.real_count,
            self.vertices.len(),
            "real vertices must precede synthetic ones"
        );
        let ix = self.push_vertex(VertexKind::Real(v.clone()), size);
        self.index_by_vertex.insert(v, ix);
        self.real_count += 1;
        ix
    }

    pub fn add_synthetic_vertex(&mut self) -> usize {
        let id = SyntheticId(self.next_synthetic);
        self.next_synthetic += 1;
        self.push_vertex(VertexKind::Synthetic(id), Size::default())
    }

    fn push_vertex(&mut self, kind: VertexKind<V>, size: Size) -> usize {
        let ix = self.vertices.len();
        self.vertices.push(DelegateVertex {
            kind,
            rank: 0,
            index: 0,
            point: Point::default(),
            size,
        });
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        ix
    }

    pub fn add_edge(&mut self, edge: DelegateEdge<E>) -> usize {
        let ix = self.edges.len();
        self.out_adj[edge.source].push(ix);
        self.in_adj[edge.target].push(ix);
        self.edges.push(Some(edge));
        self.live_edges += 1;
        ix
    }

    pub fn remove_edge(&mut self, e: usize) -> Option<DelegateEdge<E>> {
        let edge = self.edges.get_mut(e)?.take()?;
        self.out_adj[edge.source].retain(|&x| x != e);
        self.in_adj[edge.target].retain(|&x| x != e);
        self.live_edges -= 1;
        Some(edge)
    }

    /// Swaps the endpoints of `e` and toggles its `reversed` flag.
    pub fn reverse_edge(&mut self, e: usize) {
        let Some(Some(edge)) = self.edges.get_mut(e) else {
            return;
        };
        let (s, t) = (edge.source, edge.target);
        edge.source = t;
        edge.target = s;
        edge.reversed = !edge.reversed;
        self.out_adj[s].retain(|&x| x != e);
        self.in_adj[t].retain(|&x| x != e);
        self.out_adj[t].push(e);
        self.in_adj[s].push(e);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn real_vertex_count(&self) -> usize {
        self.real_count
    }

    pub fn synthetic_vertex_count(&self) -> usize {
        self.vertices.len() - self.real_count
    }

    pub fn vertex(&self, v: usize) -> &DelegateVertex<V> {
        &self.vertices[v]
    }

    pub fn vertex_mut(&mut self, v: usize) -> &mut DelegateVertex<V> {
        &mut self.vertices[v]
    }

    pub fn vertices(&self) -> impl Iterator<Item = (usize, &DelegateVertex<V>)> + '_ {
        self.vertices.iter().enumerate()
    }

    pub fn index_of(&self, v: &V) -> Option<usize> {
        self.index_by_vertex.get(v).copied()
    }

    pub fn is_synthetic(&self, v: usize) -> bool {
        v >= self.real_count
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn edge(&self, e: usize) -> Option<&DelegateEdge<E>> {
        self.edges.get(e).and_then(Option::as_ref)
    }

    pub fn edge_mut(&mut self, e: usize) -> Option<&mut DelegateEdge<E>> {
        self.edges.get_mut(e).and_then(Option::as_mut)
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &DelegateEdge<E>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(ix, e)| e.as_ref().map(|e| (ix, e)))
    }

    pub fn edge_ids(&self) -> Vec<usize> {
        self.edges().map(|(ix, _)| ix).collect()
    }

    pub fn out_edges(&self, v: usize) -> &[usize] {
        &self.out_adj[v]
    }

    pub fn in_edges(&self, v: usize) -> &[usize] {
        &self.in_adj[v]
    }

    pub fn source(&self, e: usize) -> Option<usize> {
        self.edge(e).map(|e| e.source)
    }

    pub fn target(&self, e: usize) -> Option<usize> {
        self.edge(e).map(|e| e.target)
    }

    /// Drops every synthetic vertex together with the edges still touching one.
    pub fn remove_synthetic_vertices(&mut self) -> usize {
        let removed = self.synthetic_vertex_count();
        if removed == 0 {
            return 0;
        }
        let doomed: Vec<usize> = self
            .edges()
            .filter(|(_, e)| self.is_synthetic(e.source) || self.is_synthetic(e.target))
            .map(|(ix, _)| ix)
            .collect();
        for e in doomed {
            let _ = self.remove_edge(e);
        }
        self.vertices.truncate(self.real_count);
        self.out_adj.truncate(self.real_count);
        self.in_adj.truncate(self.real_count);
        removed
    }
}

fn endpoint<V, E>(out: &DelegateGraph<V, E>, v: Option<V>, e: &E) -> Result<usize>
where
    V: Clone + Eq + Hash + fmt::Debug,
    E: fmt::Debug,
{
    match v {
        Some(v) => out
            .index_of(&v)
            .ok_or_else(|| LayoutError::UnknownVertex {
                vertex: format!("{v:?}"),
            }),
        None => Err(LayoutError::UnknownVertex {
            vertex: format!("<endpoint of {e:?}>"),
        }),
    }
}

impl<V, E> DirectedGraph for DelegateGraph<V, E>
where
    V: Clone + Eq + Hash,
{
    type Vertex = usize;
    type Edge = usize;

    fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        0..self.vertices.len()
    }

    fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        DelegateGraph::edges(self).map(|(ix, _)| ix)
    }

    fn source(&self, edge: &usize) -> Option<usize> {
        DelegateGraph::source(self, *edge)
    }

    fn target(&self, edge: &usize) -> Option<usize> {
        DelegateGraph::target(self, *edge)
    }

    fn contains_vertex(&self, vertex: &usize) -> bool {
        *vertex < self.vertices.len()
    }

    fn in_edges(&self, vertex: &usize) -> Vec<usize> {
        self.in_adj.get(*vertex).cloned().unwrap_or_default()
    }

    fn out_edges(&self, vertex: &usize) -> Vec<usize> {
        self.out_adj.get(*vertex).cloned().unwrap_or_default()
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.live_edges
    }
}
