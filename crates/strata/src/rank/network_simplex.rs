//! Network simplex ranker.
//!
//! Minimizes `Σ weight · (rank(target) - rank(source))` subject to
//! `rank(target) - rank(source) >= min_separation` on every edge. The feasible tight tree is a
//! forest when the graph is disconnected; each pivot only renumbers the subtree of the lowest
//! common ancestor and only recomputes cut values along the cycle the entering edge closes.

use super::longest_path::longest_path;
use crate::cancel::CancellationToken;
use crate::delegate::DelegateGraph;
use crate::error::{LayoutError, Result};
use crate::rng::TieBreaker;
use rustc_hash::FxHashMap as HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplexSummary {
    pub pivots: usize,
    /// `(source, target)` vertex pairs of the final tight tree.
    pub tree_edges: Vec<(usize, usize)>,
    /// `false` when the iteration cap or cancellation stopped the search early.
    pub optimal: bool,
}

/// Ranks `g` optimally (up to `max_iterations` pivots). Ranks are normalized to start at 0.
pub fn network_simplex<V: Clone + Eq + Hash, E>(
    g: &mut DelegateGraph<V, E>,
    max_iterations: usize,
    tie_break: &mut TieBreaker,
    token: &CancellationToken,
) -> Result<SimplexSummary> {
    longest_path(g);
    let mut state = TreeState::new(g);
    state.feasible_tree()?;
    state.init_tree();

    let mut pivots: usize = 0;
    let mut optimal = false;
    loop {
        if token.is_cancelled() {
            break;
        }
        let Some(leave) = state.leave_edge(tie_break) else {
            optimal = true;
            break;
        };
        if pivots >= max_iterations {
            tracing::warn!(
                max_iterations,
                "network simplex stopped at its iteration cap before reaching an optimum"
            );
            break;
        }
        let enter = state.enter_edge(leave)?;
        state.exchange(leave, enter)?;
        pivots += 1;
        tracing::trace!(pivot = pivots, leave, enter, "network simplex pivot");
    }

    let min = state.rank.iter().copied().min().unwrap_or(0);
    for (v, r) in state.rank.iter().enumerate() {
        g.vertex_mut(v).rank = r - min;
    }

    let tree_edges = state
        .edges
        .iter()
        .zip(&state.in_tree)
        .filter(|(_, in_tree)| **in_tree)
        .map(|(e, _)| (e.source, e.target))
        .collect();
    Ok(SimplexSummary {
        pivots,
        tree_edges,
        optimal,
    })
}

/// Parallel edges merged: weights summed, the largest separation kept. Self loops dropped.
#[derive(Debug, Clone, Copy)]
struct SimplexEdge {
    source: usize,
    target: usize,
    weight: f64,
    minlen: i32,
}

#[derive(Debug, Clone, Copy)]
struct DfsFrame {
    v: usize,
    low: i32,
    next_neighbor: usize,
}

#[derive(Debug, Clone)]
struct TreeState {
    edges: Vec<SimplexEdge>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
    rank: Vec<i32>,

    in_tree: Vec<bool>,
    /// Cut value of each tree edge (stale for non-tree edges).
    cut: Vec<f64>,

    parent: Vec<Option<usize>>,
    parent_edge: Vec<Option<usize>>,
    low: Vec<i32>,
    lim: Vec<i32>,
    /// `vertex_by_lim[lim]`; slot 0 is unused.
    vertex_by_lim: Vec<usize>,
    roots: Vec<usize>,

    dfs_stack: Vec<DfsFrame>,
}

impl TreeState {
    fn new<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>) -> Self {
        let n = g.vertex_count();
        let mut edges: Vec<SimplexEdge> = Vec::new();
        let mut by_ends: HashMap<(usize, usize), usize> = HashMap::default();
        let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (_, e) in g.edges() {
            if e.is_self_loop() {
                continue;
            }
            if let Some(&ix) = by_ends.get(&(e.source, e.target)) {
                edges[ix].weight += e.weight;
                edges[ix].minlen = edges[ix].minlen.max(e.min_separation);
                continue;
            }
            let ix = edges.len();
            by_ends.insert((e.source, e.target), ix);
            edges.push(SimplexEdge {
                source: e.source,
                target: e.target,
                weight: e.weight,
                minlen: e.min_separation,
            });
            out_adj[e.source].push(ix);
            in_adj[e.target].push(ix);
        }
        let m = edges.len();
        Self {
            edges,
            out_adj,
            in_adj,
            rank: g.vertices().map(|(_, v)| v.rank).collect(),
            in_tree: vec![false; m],
            cut: vec![0.0; m],
            parent: vec![None; n],
            parent_edge: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            vertex_by_lim: vec![0; n + 1],
            roots: Vec::new(),
            dfs_stack: Vec::new(),
        }
    }

    fn slack(&self, e: usize) -> i32 {
        let edge = &self.edges[e];
        self.rank[edge.target] - self.rank[edge.source] - edge.minlen
    }

    fn other_end(&self, e: usize, v: usize) -> usize {
        let edge = &self.edges[e];
        if edge.source == v {
            edge.target
        } else {
            edge.source
        }
    }

    /// Grows one tight tree per connected component, shifting a partial tree by the smallest
    /// incident slack whenever it stops growing.
    fn feasible_tree(&mut self) -> Result<()> {
        let n = self.rank.len();
        let mut in_tree_v: Vec<bool> = vec![false; n];
        for start in 0..n {
            if in_tree_v[start] {
                continue;
            }
            in_tree_v[start] = true;
            let mut members: Vec<usize> = vec![start];
            loop {
                self.tight_tree(&mut in_tree_v, &mut members);
                let Some((e, slack)) = self.min_slack_incident(&in_tree_v, &members) else {
                    break;
                };
                if slack == 0 {
                    return Err(LayoutError::Invariant(format!(
                        "tight tree left a zero-slack edge {} -> {} outside the tree",
                        self.edges[e].source, self.edges[e].target
                    )));
                }
                let delta = if in_tree_v[self.edges[e].source] {
                    slack
                } else {
                    -slack
                };
                for &v in &members {
                    self.rank[v] += delta;
                }
            }
            self.roots.push(start);
        }
        Ok(())
    }

    fn tight_tree(&mut self, in_tree_v: &mut [bool], members: &mut Vec<usize>) {
        let mut stack: Vec<usize> = members.clone();
        while let Some(v) = stack.pop() {
            for k in 0..self.out_adj[v].len() + self.in_adj[v].len() {
                let e = self.incident(v, k);
                let w = self.other_end(e, v);
                if in_tree_v[w] || self.slack(e) != 0 {
                    continue;
                }
                in_tree_v[w] = true;
                self.in_tree[e] = true;
                members.push(w);
                stack.push(w);
            }
        }
    }

    fn incident(&self, v: usize, k: usize) -> usize {
        let outs = &self.out_adj[v];
        if k < outs.len() {
            outs[k]
        } else {
            self.in_adj[v][k - outs.len()]
        }
    }

    fn min_slack_incident(&self, in_tree_v: &[bool], members: &[usize]) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;
        for &v in members {
            for k in 0..self.out_adj[v].len() + self.in_adj[v].len() {
                let e = self.incident(v, k);
                if in_tree_v[self.other_end(e, v)] {
                    continue;
                }
                let slack = self.slack(e);
                match best {
                    Some((_, best_slack)) if slack >= best_slack => {}
                    _ => best = Some((e, slack)),
                }
            }
        }
        best
    }

    /// Numbers every tree of the forest and computes all cut values.
    fn init_tree(&mut self) {
        let mut next_lim: i32 = 1;
        for r in 0..self.roots.len() {
            let root = self.roots[r];
            self.parent[root] = None;
            self.parent_edge[root] = None;
            next_lim = self.assign_low_lim(root, next_lim);
        }
        // Ascending lim is a postorder.
        for lim in 1..self.vertex_by_lim.len() {
            let v = self.vertex_by_lim[lim];
            if let Some(pe) = self.parent_edge[v] {
                self.cut[pe] = self.calc_cut_value(v);
            }
        }
    }

    /// Postorder numbering of the subtree hanging from `root` (its own parent link is kept),
    /// starting at `first_lim`. Returns the next free lim.
    fn assign_low_lim(&mut self, root: usize, first_lim: i32) -> i32 {
        let mut next_lim = first_lim;
        let mut stack = std::mem::take(&mut self.dfs_stack);
        stack.clear();
        stack.push(DfsFrame {
            v: root,
            low: next_lim,
            next_neighbor: 0,
        });

        while let Some(top) = stack.last_mut() {
            let v = top.v;
            let degree = self.out_adj[v].len() + self.in_adj[v].len();
            let mut child: Option<(usize, usize)> = None;
            while top.next_neighbor < degree {
                let e = self.incident(v, top.next_neighbor);
                top.next_neighbor += 1;
                if self.in_tree[e] && self.parent_edge[v] != Some(e) {
                    child = Some((e, self.other_end(e, v)));
                    break;
                }
            }

            if let Some((e, w)) = child {
                self.parent[w] = Some(v);
                self.parent_edge[w] = Some(e);
                stack.push(DfsFrame {
                    v: w,
                    low: next_lim,
                    next_neighbor: 0,
                });
                continue;
            }

            let Some(frame) = stack.pop() else {
                break;
            };
            self.low[frame.v] = frame.low;
            self.lim[frame.v] = next_lim;
            if let Ok(slot) = usize::try_from(next_lim) {
                self.vertex_by_lim[slot] = frame.v;
            }
            next_lim += 1;
        }

        self.dfs_stack = stack;
        next_lim
    }

    fn in_subtree(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    fn subtree_vertices(&self, root: usize) -> impl Iterator<Item = usize> + '_ {
        let lo = usize::try_from(self.low[root]).unwrap_or(0);
        let hi = usize::try_from(self.lim[root]).unwrap_or(0);
        (lo..=hi).map(|lim| self.vertex_by_lim[lim])
    }

    /// Cut value of the tree edge joining `child` to its parent.
    ///
    /// Uses the already computed cut values of `child`'s own tree children, so callers must
    /// visit children before parents.
    fn calc_cut_value(&self, child: usize) -> f64 {
        let Some(pe) = self.parent_edge[child] else {
            return 0.0;
        };
        let tree_edge = &self.edges[pe];
        let child_is_tail = tree_edge.source == child;
        let mut cut_value = tree_edge.weight;

        for &e in &self.out_adj[child] {
            if e == pe {
                continue;
            }
            let points_to_head = child_is_tail;
            let w = self.edges[e].weight;
            cut_value += if points_to_head { w } else { -w };
            let other = self.edges[e].target;
            if self.in_tree[e] && self.parent_edge[other] == Some(e) {
                cut_value += if points_to_head {
                    -self.cut[e]
                } else {
                    self.cut[e]
                };
            }
        }

        for &e in &self.in_adj[child] {
            if e == pe {
                continue;
            }
            let points_to_head = !child_is_tail;
            let w = self.edges[e].weight;
            cut_value += if points_to_head { w } else { -w };
            let other = self.edges[e].source;
            if self.in_tree[e] && self.parent_edge[other] == Some(e) {
                cut_value += if points_to_head {
                    -self.cut[e]
                } else {
                    self.cut[e]
                };
            }
        }

        cut_value
    }

    /// First tree edge with a negative cut value, scanning from a tie-broken start.
    fn leave_edge(&self, tie_break: &mut TieBreaker) -> Option<usize> {
        let m = self.edges.len();
        if m == 0 {
            return None;
        }
        let start = tie_break.offset(m);
        (0..m)
            .map(|k| (start + k) % m)
            .find(|&e| self.in_tree[e] && self.cut[e] < 0.0)
    }

    /// Minimum-slack non-tree edge that reconnects the two halves of the tree split at `leave`,
    /// oriented opposite to it.
    fn enter_edge(&self, leave: usize) -> Result<usize> {
        let SimplexEdge { source, target, .. } = self.edges[leave];
        let (tail, flip) = if self.lim[source] > self.lim[target] {
            (target, true)
        } else {
            (source, false)
        };

        let mut best: Option<(i32, usize)> = None;
        for x in self.subtree_vertices(tail) {
            let candidates = if flip {
                &self.out_adj[x]
            } else {
                &self.in_adj[x]
            };
            for &f in candidates {
                let outside = if flip {
                    self.edges[f].target
                } else {
                    self.edges[f].source
                };
                if self.in_subtree(outside, tail) {
                    continue;
                }
                let slack = self.slack(f);
                match best {
                    Some((best_slack, _)) if slack >= best_slack => {}
                    _ => best = Some((slack, f)),
                }
            }
        }

        best.map(|(_, f)| f).ok_or_else(|| {
            LayoutError::Invariant(format!(
                "no entering edge for tree edge {source} -> {target}"
            ))
        })
    }

    fn exchange(&mut self, leave: usize, enter: usize) -> Result<()> {
        let SimplexEdge { source, target, .. } = self.edges[leave];
        let (c, p) = if self.parent[source] == Some(target) {
            (source, target)
        } else {
            (target, source)
        };

        let f = self.edges[enter];
        let (i, o) = if self.in_subtree(f.source, c) {
            (f.source, f.target)
        } else {
            (f.target, f.source)
        };

        // Re-rank the detached subtree so the entering edge becomes tight.
        let slack = self.slack(enter);
        let delta = if i == f.target { -slack } else { slack };
        if delta != 0 {
            let moved: Vec<usize> = self.subtree_vertices(c).collect();
            for v in moved {
                self.rank[v] += delta;
            }
        }

        let mut lca = p;
        while !self.in_subtree(o, lca) {
            lca = self.parent[lca].ok_or_else(|| {
                LayoutError::Invariant(format!("vertices {o} and {p} share no tree ancestor"))
            })?;
        }

        self.in_tree[leave] = false;
        self.in_tree[enter] = true;
        self.assign_low_lim(lca, self.low[lca]);

        for start in [c, p] {
            let mut v = start;
            while v != lca {
                let (Some(pe), Some(up)) = (self.parent_edge[v], self.parent[v]) else {
                    return Err(LayoutError::Invariant(format!(
                        "vertex {v} lost its path to {lca} after a pivot"
                    )));
                };
                self.cut[pe] = self.calc_cut_value(v);
                v = up;
            }
        }
        Ok(())
    }
}
