//! Break cycles by reversing a greedy feedback edge set (Eades–Lin–Smyth).

use crate::delegate::DelegateGraph;
use crate::synthetic::ArticulatedEdge;
use std::collections::VecDeque;
use std::hash::Hash;

/// Reverses every feedback edge of `g` and returns their ids.
pub fn run<V: Clone + Eq + Hash, E>(g: &mut DelegateGraph<V, E>) -> Vec<usize> {
    let fas = feedback_edges(g);
    for &e in &fas {
        g.reverse_edge(e);
    }
    tracing::debug!(reversed = fas.len(), "acyclic");
    fas
}

/// Restores caller orientation on polylines whose edge was reversed by [`run`].
pub fn undo<E>(edges: &mut [ArticulatedEdge<E>]) {
    for edge in edges.iter_mut().filter(|e| e.reversed) {
        edge.points.reverse();
    }
}

/// Greedy feedback edge selection.
///
/// Sinks and sources are peeled until neither remains; then the vertex with the largest
/// `out - in` degree is removed and its remaining incoming edges become feedback. Self loops are
/// ignored and parallel edges count individually.
pub fn feedback_edges<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>) -> Vec<usize> {
    let n = g.vertex_count();
    if n <= 1 {
        return Vec::new();
    }

    let mut in_deg: Vec<i64> = vec![0; n];
    let mut out_deg: Vec<i64> = vec![0; n];
    for (_, e) in g.edges() {
        if e.is_self_loop() {
            continue;
        }
        out_deg[e.source] += 1;
        in_deg[e.target] += 1;
    }
    let max_in = in_deg.iter().copied().max().unwrap_or(0);
    let max_out = out_deg.iter().copied().max().unwrap_or(0);

    let mut work = Work {
        g,
        alive: vec![true; n],
        in_deg,
        out_deg,
        buckets: (0..(max_out + max_in + 3).max(3))
            .map(|_| VecDeque::new())
            .collect(),
        bucket_of: vec![None; n],
        stamp: vec![0; n],
        zero_idx: max_in + 1,
    };
    for v in 0..n {
        work.assign_bucket(v);
    }

    let mut alive_count = n;
    let mut out: Vec<usize> = Vec::new();
    let last = work.buckets.len() - 1;
    while alive_count > 0 {
        loop {
            if let Some(v) = work.pop_bucket(0) {
                work.remove(v, None);
                alive_count -= 1;
                continue;
            }
            if let Some(v) = work.pop_bucket(last) {
                work.remove(v, None);
                alive_count -= 1;
                continue;
            }
            break;
        }
        if alive_count == 0 {
            break;
        }

        let picked = (1..last).rev().find_map(|i| work.pop_bucket(i));
        let Some(v) = picked else {
            break;
        };
        work.remove(v, Some(&mut out));
        alive_count -= 1;
    }
    out
}

struct Work<'a, V, E> {
    g: &'a DelegateGraph<V, E>,
    alive: Vec<bool>,
    in_deg: Vec<i64>,
    out_deg: Vec<i64>,
    /// Entries go stale when their vertex moves; only the one carrying the vertex's current
    /// stamp counts.
    buckets: Vec<VecDeque<(usize, u32)>>,
    bucket_of: Vec<Option<usize>>,
    stamp: Vec<u32>,
    zero_idx: i64,
}

impl<V: Clone + Eq + Hash, E> Work<'_, V, E> {
    fn pop_bucket(&mut self, idx: usize) -> Option<usize> {
        while let Some((v, stamp)) = self.buckets[idx].pop_back() {
            if self.alive[v] && self.bucket_of[v] == Some(idx) && self.stamp[v] == stamp {
                self.bucket_of[v] = None;
                return Some(v);
            }
        }
        None
    }

    fn assign_bucket(&mut self, v: usize) {
        let last = self.buckets.len() - 1;
        let idx = if self.out_deg[v] == 0 {
            0
        } else if self.in_deg[v] == 0 {
            last
        } else {
            (self.out_deg[v] - self.in_deg[v] + self.zero_idx).clamp(1, last as i64 - 1) as usize
        };
        self.stamp[v] = self.stamp[v].wrapping_add(1);
        self.buckets[idx].push_front((v, self.stamp[v]));
        self.bucket_of[v] = Some(idx);
    }

    fn remove(&mut self, v: usize, mut feedback: Option<&mut Vec<usize>>) {
        let g = self.g;
        self.alive[v] = false;
        self.bucket_of[v] = None;
        for &e in g.in_edges(v) {
            let Some(u) = g.source(e) else {
                continue;
            };
            if u == v || !self.alive[u] {
                continue;
            }
            if let Some(out) = feedback.as_deref_mut() {
                out.push(e);
            }
            self.out_deg[u] -= 1;
            self.assign_bucket(u);
        }
        for &e in g.out_edges(v) {
            let Some(w) = g.target(e) else {
                continue;
            };
            if w == v || !self.alive[w] {
                continue;
            }
            self.in_deg[w] -= 1;
            self.assign_bucket(w);
        }
    }
}
