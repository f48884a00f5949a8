//! Width-bounded Coffman–Graham layering.

use super::util::topological_order;
use crate::delegate::DelegateGraph;
use std::collections::VecDeque;
use std::hash::Hash;

/// Layers the graph with at most `width` vertices per layer.
///
/// Works on the transitive reduction with unit separations. Edges asking for a longer
/// separation are honoured afterwards by pushing targets down in topological order.
pub fn coffman_graham<V: Clone + Eq + Hash, E>(g: &mut DelegateGraph<V, E>, width: usize) {
    let n = g.vertex_count();
    if n == 0 {
        return;
    }
    let width = width.max(1);

    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (_, e) in g.edges() {
        if !e.is_self_loop() && !succ[e.source].contains(&e.target) {
            succ[e.source].push(e.target);
        }
    }
    let succ = transitive_reduction(&succ);
    let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (u, ws) in succ.iter().enumerate() {
        for &w in ws {
            pred[w].push(u);
        }
    }

    let label = lexicographic_labels(&succ, &pred);

    // Fill layers bottom-up, highest label first.
    let mut layer_of: Vec<Option<usize>> = vec![None; n];
    let mut layer_sizes: Vec<usize> = vec![0];
    let mut current: usize = 0;
    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| layer_of[v].is_none() && succ[v].iter().all(|&w| layer_of[w].is_some()))
            .max_by_key(|&v| label[v]);
        let Some(u) = next else {
            break;
        };
        let blocked = succ[u].iter().any(|&w| layer_of[w] == Some(current));
        if layer_sizes[current] >= width || blocked {
            current += 1;
            layer_sizes.push(0);
        }
        layer_of[u] = Some(current);
        layer_sizes[current] += 1;
    }

    let top = i32::try_from(current).unwrap_or(i32::MAX);
    for (v, layer) in layer_of.into_iter().enumerate() {
        let layer = layer.and_then(|l| i32::try_from(l).ok()).unwrap_or(0);
        g.vertex_mut(v).rank = top - layer;
    }

    for v in topological_order(g) {
        let mut rank = g.vertex(v).rank;
        for &e in g.in_edges(v) {
            let Some(edge) = g.edge(e) else {
                continue;
            };
            if !edge.is_self_loop() {
                rank = rank.max(g.vertex(edge.source).rank + edge.min_separation);
            }
        }
        g.vertex_mut(v).rank = rank;
    }
}

/// Drops `u -> w` whenever `w` is reachable from `u` through a longer path.
fn transitive_reduction(succ: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = succ.len();
    let mut reach: Vec<bool> = vec![false; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut out: Vec<Vec<usize>> = Vec::with_capacity(n);
    for direct in succ {
        reach.fill(false);
        queue.clear();
        for &w in direct {
            for &x in &succ[w] {
                if !reach[x] {
                    reach[x] = true;
                    queue.push_back(x);
                }
            }
        }
        while let Some(x) = queue.pop_front() {
            for &y in &succ[x] {
                if !reach[y] {
                    reach[y] = true;
                    queue.push_back(y);
                }
            }
        }
        out.push(direct.iter().copied().filter(|&w| !reach[w]).collect());
    }
    out
}

/// Labels `1..=n`: each step picks the ready vertex whose predecessor labels, sorted descending,
/// are lexicographically smallest.
fn lexicographic_labels(succ: &[Vec<usize>], pred: &[Vec<usize>]) -> Vec<usize> {
    let n = succ.len();
    let mut label: Vec<usize> = vec![0; n];
    for next_label in 1..=n {
        let mut best: Option<(Vec<usize>, usize)> = None;
        for v in 0..n {
            if label[v] != 0 || pred[v].iter().any(|&u| label[u] == 0) {
                continue;
            }
            let mut key: Vec<usize> = pred[v].iter().map(|&u| label[u]).collect();
            key.sort_unstable_by(|a, b| b.cmp(a));
            if best.as_ref().is_none_or(|(b, _)| key < *b) {
                best = Some((key, v));
            }
        }
        let Some((_, v)) = best else {
            break;
        };
        label[v] = next_label;
    }
    label
}
