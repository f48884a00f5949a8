use crate::delegate::DelegateGraph;
use std::hash::Hash;

/// Ordered layers of vertex indices, rank 0 first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    layers: Vec<Vec<usize>>,
}

impl Layering {
    pub fn new(layer_count: usize) -> Self {
        Self {
            layers: vec![Vec::new(); layer_count],
        }
    }

    /// Groups vertices by their current rank, keeping vertex order inside each layer.
    pub fn from_ranks<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>) -> Self {
        let max_rank = g.vertices().map(|(_, v)| v.rank).max().unwrap_or(-1);
        let mut out = Self::new(usize::try_from(max_rank + 1).unwrap_or(0));
        for (ix, v) in g.vertices() {
            if let Ok(r) = usize::try_from(v.rank) {
                out.layers[r].push(ix);
            }
        }
        out
    }

    pub fn from_layers(layers: Vec<Vec<usize>>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    pub fn layer(&self, rank: usize) -> &[usize] {
        &self.layers[rank]
    }

    pub fn layer_mut(&mut self, rank: usize) -> &mut Vec<usize> {
        &mut self.layers[rank]
    }

    pub fn push(&mut self, rank: usize, v: usize) {
        if rank >= self.layers.len() {
            self.layers.resize_with(rank + 1, Vec::new);
        }
        self.layers[rank].push(v);
    }

    pub fn vertex_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Writes each member's rank and in-layer index back to the graph.
    pub fn reindex<V: Clone + Eq + Hash, E>(&self, g: &mut DelegateGraph<V, E>) {
        for r in 0..self.layers.len() {
            self.reindex_layer(g, r);
        }
    }

    pub fn reindex_layer<V: Clone + Eq + Hash, E>(&self, g: &mut DelegateGraph<V, E>, rank: usize) {
        let Ok(r) = i32::try_from(rank) else {
            return;
        };
        for (i, &v) in self.layers[rank].iter().enumerate() {
            let vertex = g.vertex_mut(v);
            vertex.rank = r;
            vertex.index = i;
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        for layer in &mut self.layers {
            layer.retain(|&v| keep(v));
        }
    }

    /// `position[v]` is the in-layer index of `v`, sized for `vertex_count` vertices.
    pub fn positions(&self, vertex_count: usize) -> Vec<usize> {
        let mut pos = vec![0; vertex_count];
        for layer in &self.layers {
            for (i, &v) in layer.iter().enumerate() {
                if v < pos.len() {
                    pos[v] = i;
                }
            }
        }
        pos
    }
}
