//! The `Graph` container.
//!
//! Nodes are identified by string ids and keep insertion order; edges are identified by
//! [`EdgeKey`] and keep insertion order as well. Incident-edge queries go through a lazily
//! rebuilt adjacency cache so they cost O(degree) after the first query following a mutation.

use crate::DirectedGraph;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

mod adj_cache;
mod edge_key;
mod entries;
mod options;

use adj_cache::DirectedAdjCache;
use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

pub struct Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    options: GraphOptions,

    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Interior mutability keeps the query APIs on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<DirectedAdjCache>>,
}

impl<N, E> Default for Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E> Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn with_adj<R>(&self, f: impl FnOnce(&DirectedAdjCache) -> R) -> R {
        let generation = self.adj_gen;
        let mut cache = self.adj_cache.borrow_mut();
        if cache.as_ref().is_some_and(|c| c.generation != generation) {
            *cache = None;
        }
        let adj = cache.get_or_insert_with(|| {
            let endpoints = self.edges.iter().filter_map(|e| {
                let v_ix = *self.node_index.get(e.key.v.as_str())?;
                let w_ix = *self.node_index.get(e.key.w.as_str())?;
                Some((v_ix, w_ix))
            });
            DirectedAdjCache::build(generation, self.nodes.len(), endpoints)
        });
        f(adj)
    }

    fn edge_key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn edge_index_of(&self, view: EdgeKeyView<'_>) -> Option<usize> {
        self.edge_index.get(&view).copied()
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(id.as_str()) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(id.as_str()) {
            return self;
        }
        let label = (self.default_node_label)();
        self.set_node(id, label)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let v = v.into();
        let w = w.into();
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        let name = if self.options.multigraph {
            name.map(Into::into)
        } else {
            None
        };
        let key = EdgeKey { v, w, name };

        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        self.invalidate_adj();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label: label.unwrap_or_else(|| (self.default_edge_label)()),
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index_of(self.edge_key_view(v, w, name)).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let idx = self.edge_index_of(self.edge_key_view(v, w, name))?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let idx = self.edge_index_of(self.edge_key_view(v, w, name))?;
        Some(&mut self.edges[idx].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    fn remove_edge_at_index(&mut self, idx: usize) {
        self.invalidate_adj();
        let _ = self.edge_index.remove(&self.edges[idx].key);
        self.edges.remove(idx);
        for i in idx..self.edges.len() {
            if let Some(slot) = self.edge_index.get_mut(&self.edges[i].key) {
                *slot = i;
            }
        }
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let Some(idx) = self.edge_index_of(self.edge_key_view(v, w, name)) else {
            return false;
        };
        self.remove_edge_at_index(idx);
        true
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.invalidate_adj();
        self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            if let Some(slot) = self.node_index.get_mut(self.nodes[i].id.as_str()) {
                *slot = i;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|e| e.key.v != id && e.key.w != id);
        if self.edges.len() != before {
            self.edge_index.clear();
            for (i, e) in self.edges.iter().enumerate() {
                self.edge_index.insert(e.key.clone(), i);
            }
        }
        true
    }

    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.out_edges(v_ix)
                .iter()
                .map(|&e| &self.edges[e].key)
                .filter(|k| w.is_none_or(|w| k.w == w))
                .cloned()
                .collect()
        })
    }

    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            adj.in_edges(v_ix)
                .iter()
                .map(|&e| &self.edges[e].key)
                .filter(|k| u.is_none_or(|u| k.v == u))
                .cloned()
                .collect()
        })
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            let mut out: Vec<&str> = Vec::with_capacity(adj.out_edges(v_ix).len());
            for &e in adj.out_edges(v_ix) {
                let w = self.edges[e].key.w.as_str();
                if !out.contains(&w) {
                    out.push(w);
                }
            }
            out
        })
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|adj| {
            let mut out: Vec<&str> = Vec::with_capacity(adj.in_edges(v_ix).len());
            for &e in adj.in_edges(v_ix) {
                let u = self.edges[e].key.v.as_str();
                if !out.contains(&u) {
                    out.push(u);
                }
            }
            out
        })
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        self.with_adj(|adj| {
            (0..self.nodes.len())
                .filter(|&ix| adj.in_edges(ix).is_empty())
                .map(|ix| self.nodes[ix].id.as_str())
                .collect()
        })
    }

    /// Nodes without outgoing edges, in insertion order.
    pub fn sinks(&self) -> Vec<&str> {
        self.with_adj(|adj| {
            (0..self.nodes.len())
                .filter(|&ix| adj.out_edges(ix).is_empty())
                .map(|ix| self.nodes[ix].id.as_str())
                .collect()
        })
    }
}

impl<N, E> DirectedGraph for Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    type Vertex = String;
    type Edge = EdgeKey;

    fn vertices(&self) -> impl Iterator<Item = String> + '_ {
        self.nodes.iter().map(|n| n.id.clone())
    }

    fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.iter().map(|e| e.key.clone())
    }

    fn source(&self, edge: &EdgeKey) -> Option<String> {
        self.has_edge(&edge.v, &edge.w, edge.name.as_deref())
            .then(|| edge.v.clone())
    }

    fn target(&self, edge: &EdgeKey) -> Option<String> {
        self.has_edge(&edge.v, &edge.w, edge.name.as_deref())
            .then(|| edge.w.clone())
    }

    fn contains_vertex(&self, vertex: &String) -> bool {
        self.has_node(vertex)
    }

    fn in_edges(&self, vertex: &String) -> Vec<EdgeKey> {
        Graph::in_edges(self, vertex, None)
    }

    fn out_edges(&self, vertex: &String) -> Vec<EdgeKey> {
        Graph::out_edges(self, vertex, None)
    }

    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    fn edge_count(&self) -> usize {
        Graph::edge_count(self)
    }
}
