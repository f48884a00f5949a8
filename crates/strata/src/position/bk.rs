//! Brandes & Köpf horizontal coordinate assignment.
//!
//! Four alignment passes (up/down × left/right) each group vertices into vertically aligned
//! blocks and compact the blocks horizontally. The passes are then shifted onto the narrowest one
//! and balanced per vertex.

use crate::cancel::CancellationToken;
use crate::config::{BkDirections, LayoutConfig};
use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::hash::Hash;

/// Unordered vertex pairs whose segment must not be used for alignment.
pub type Conflicts = HashSet<(usize, usize)>;

pub fn add_conflict(conflicts: &mut Conflicts, v: usize, w: usize) {
    conflicts.insert((v.min(w), v.max(w)));
}

pub fn has_conflict(conflicts: &Conflicts, v: usize, w: usize) -> bool {
    conflicts.contains(&(v.min(w), v.max(w)))
}

fn predecessors<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>, v: usize) -> Vec<usize> {
    g.in_edges(v).iter().filter_map(|&e| g.source(e)).collect()
}

fn successors<V: Clone + Eq + Hash, E>(g: &DelegateGraph<V, E>, v: usize) -> Vec<usize> {
    g.out_edges(v).iter().filter_map(|&e| g.target(e)).collect()
}

/// Upper endpoint of the inner segment ending in `v`, if `v` is synthetic and has one.
fn other_inner_segment_vertex<V: Clone + Eq + Hash, E>(
    g: &DelegateGraph<V, E>,
    v: usize,
) -> Option<usize> {
    if !g.is_synthetic(v) {
        return None;
    }
    predecessors(g, v).into_iter().find(|&u| g.is_synthetic(u))
}

/// Marks non-inner segments that cross an inner segment (one joining two synthetic vertices).
///
/// Expects `layering` to be reindexed so each vertex's `index` is its layer position.
pub fn find_type1_conflicts<V, E>(g: &DelegateGraph<V, E>, layering: &Layering) -> Conflicts
where
    V: Clone + Eq + Hash,
{
    let mut conflicts = Conflicts::default();
    for i in 1..layering.len() {
        let prev_len = layering.layer(i - 1).len();
        let layer = layering.layer(i);

        let mut k0: usize = 0;
        let mut scan_pos: usize = 0;
        for (idx, &v) in layer.iter().enumerate() {
            let w = other_inner_segment_vertex(g, v);
            let k1 = w.map_or(prev_len, |w| g.vertex(w).index);
            if w.is_none() && idx + 1 != layer.len() {
                continue;
            }
            for &scan in &layer[scan_pos..=idx] {
                for u in predecessors(g, scan) {
                    let u_pos = g.vertex(u).index;
                    let inner = g.is_synthetic(u) && g.is_synthetic(scan);
                    if (u_pos < k0 || k1 < u_pos) && !inner {
                        add_conflict(&mut conflicts, u, scan);
                    }
                }
            }
            scan_pos = idx + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Per-vertex block root and the cyclic `align` pointer through each block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub root: Vec<usize>,
    pub align: Vec<usize>,
}

/// Aligns each vertex with its median neighbour(s) from `neighbours`, scanning `layers` in the
/// pass direction and skipping conflicting segments.
pub fn vertical_alignment<F>(
    vertex_count: usize,
    layers: &[Vec<usize>],
    conflicts: &Conflicts,
    neighbours: F,
) -> Alignment
where
    F: Fn(usize) -> Vec<usize>,
{
    let mut root: Vec<usize> = (0..vertex_count).collect();
    let mut align: Vec<usize> = (0..vertex_count).collect();
    let mut pos: Vec<usize> = vec![usize::MAX; vertex_count];
    for layer in layers {
        for (order, &v) in layer.iter().enumerate() {
            pos[v] = order;
        }
    }

    for layer in layers {
        let mut prev_idx: Option<usize> = None;
        for &v in layer {
            let mut ws = neighbours(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&w| pos[w]);
            let i0 = (ws.len() - 1) / 2;
            let i1 = ws.len() / 2;
            for &w in &ws[i0..=i1] {
                let w_pos = pos[w];
                if align[v] == v
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    align[w] = v;
                    align[v] = root[w];
                    root[v] = root[w];
                    prev_idx = Some(w_pos);
                }
            }
        }
    }
    Alignment { root, align }
}

/// Minimum centre distance between neighbours `v` and `u` in one layer.
fn separation<V, E>(g: &DelegateGraph<V, E>, config: &LayoutConfig, v: usize, u: usize) -> f64
where
    V: Clone + Eq + Hash,
{
    let gap = |x: usize| {
        if g.is_synthetic(x) {
            config.edge_separation
        } else {
            config.horizontal_offset
        }
    };
    g.vertex(v).size.width / 2.0 + gap(v) / 2.0 + gap(u) / 2.0 + g.vertex(u).size.width / 2.0
}

/// DAG over block roots; an edge `u -> v` carries the separation `v` must keep right of `u`.
#[derive(Debug, Default)]
struct BlockGraph {
    nodes: Vec<usize>,
    seen: HashSet<usize>,
    weight: HashMap<(usize, usize), f64>,
    preds: HashMap<usize, Vec<usize>>,
    succs: HashMap<usize, Vec<usize>>,
}

impl BlockGraph {
    fn ensure_node(&mut self, v: usize) {
        if self.seen.insert(v) {
            self.nodes.push(v);
        }
    }

    fn set_edge(&mut self, u: usize, v: usize, sep: f64) {
        match self.weight.get_mut(&(u, v)) {
            Some(w) => *w = w.max(sep),
            None => {
                self.weight.insert((u, v), sep);
                self.preds.entry(v).or_default().push(u);
                self.succs.entry(u).or_default().push(v);
            }
        }
    }

    fn predecessors(&self, v: usize) -> &[usize] {
        self.preds.get(&v).map_or(&[], Vec::as_slice)
    }

    fn successors(&self, v: usize) -> &[usize] {
        self.succs.get(&v).map_or(&[], Vec::as_slice)
    }

    fn weight(&self, u: usize, v: usize) -> f64 {
        self.weight.get(&(u, v)).copied().unwrap_or(0.0)
    }

    /// Visits every node after the nodes `next` yields for it.
    fn iterate(&self, mut visit: impl FnMut(usize), next: impl Fn(usize) -> Vec<usize>) {
        let mut stack: Vec<usize> = self.nodes.clone();
        let mut visited: HashSet<usize> = HashSet::default();
        while let Some(elem) = stack.pop() {
            if !visited.insert(elem) {
                visit(elem);
                continue;
            }
            stack.push(elem);
            stack.extend(next(elem));
        }
    }
}

fn build_block_graph<V, E>(
    g: &DelegateGraph<V, E>,
    config: &LayoutConfig,
    layers: &[Vec<usize>],
    root: &[usize],
) -> BlockGraph
where
    V: Clone + Eq + Hash,
{
    let mut block_graph = BlockGraph::default();
    for layer in layers {
        let mut prev: Option<usize> = None;
        for &v in layer {
            block_graph.ensure_node(root[v]);
            if let Some(u) = prev {
                block_graph.set_edge(root[u], root[v], separation(g, config, v, u));
            }
            prev = Some(v);
        }
    }
    block_graph
}

/// Places blocks as far left as their separations allow, then pulls each block right towards
/// its successors where there is room.
pub fn horizontal_compaction<V, E>(
    g: &DelegateGraph<V, E>,
    config: &LayoutConfig,
    layers: &[Vec<usize>],
    alignment: &Alignment,
) -> Vec<f64>
where
    V: Clone + Eq + Hash,
{
    let block_g = build_block_graph(g, config, layers, &alignment.root);
    let mut xs: HashMap<usize, f64> = HashMap::default();

    block_g.iterate(
        |elem| {
            let best = block_g
                .predecessors(elem)
                .iter()
                .map(|&u| xs.get(&u).copied().unwrap_or(0.0) + block_g.weight(u, elem))
                .fold(0.0, f64::max);
            xs.insert(elem, best);
        },
        |elem| block_g.predecessors(elem).to_vec(),
    );

    block_g.iterate(
        |elem| {
            let min = block_g
                .successors(elem)
                .iter()
                .map(|&w| xs.get(&w).copied().unwrap_or(0.0) - block_g.weight(elem, w))
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() {
                let cur = xs.get(&elem).copied().unwrap_or(0.0);
                xs.insert(elem, cur.max(min));
            }
        },
        |elem| block_g.successors(elem).to_vec(),
    );

    alignment
        .root
        .iter()
        .map(|r| xs.get(r).copied().unwrap_or(0.0))
        .collect()
}

/// The four passes in `ul, ur, dl, dr` order.
pub type Passes = [Option<Vec<f64>>; 4];

fn extent<V, E>(g: &DelegateGraph<V, E>, xs: &[f64]) -> (f64, f64)
where
    V: Clone + Eq + Hash,
{
    xs.iter()
        .enumerate()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (v, &x)| {
            let half = g.vertex(v).size.width / 2.0;
            (lo.min(x - half), hi.max(x + half))
        })
}

/// Index of the narrowest pass; earlier passes win ties.
pub fn find_smallest_width_alignment<V, E>(g: &DelegateGraph<V, E>, xss: &Passes) -> Option<usize>
where
    V: Clone + Eq + Hash,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, xs) in xss.iter().enumerate() {
        let Some(xs) = xs else {
            continue;
        };
        let (lo, hi) = extent(g, xs);
        let width = hi - lo;
        if best.is_none_or(|(_, w)| width < w) {
            best = Some((i, width));
        }
    }
    best.map(|(i, _)| i)
}

/// Shifts left passes onto the minimum of `align_to` and right passes onto its maximum.
pub fn align_coordinates(xss: &mut Passes, align_to: &[f64]) {
    let to_min = align_to.iter().copied().fold(f64::INFINITY, f64::min);
    let to_max = align_to.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for (i, xs) in xss.iter_mut().enumerate() {
        let Some(xs) = xs else {
            continue;
        };
        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let delta = if i % 2 == 0 { to_min - lo } else { to_max - hi };
        if delta != 0.0 && delta.is_finite() {
            for x in xs.iter_mut() {
                *x += delta;
            }
        }
    }
}

/// Per vertex: the mean of the two middle values of four passes, the median of three, the mean
/// of two, or the single value.
pub fn balance(xss: &Passes, vertex_count: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(vertex_count);
    let mut vals: Vec<f64> = Vec::with_capacity(4);
    for v in 0..vertex_count {
        vals.clear();
        vals.extend(xss.iter().flatten().filter_map(|xs| xs.get(v).copied()));
        vals.sort_by(f64::total_cmp);
        let x = match vals.len() {
            0 => 0.0,
            1 => vals[0],
            2 => (vals[0] + vals[1]) / 2.0,
            3 => vals[1],
            _ => (vals[1] + vals[2]) / 2.0,
        };
        out.push(x);
    }
    out
}

fn enabled(directions: &BkDirections) -> [bool; 4] {
    [
        directions.up_left,
        directions.up_right,
        directions.down_left,
        directions.down_right,
    ]
}

/// x per vertex index, or `None` when cancelled between passes.
pub fn position_x<V, E>(
    g: &DelegateGraph<V, E>,
    layering: &Layering,
    config: &LayoutConfig,
    token: &CancellationToken,
) -> Option<Vec<f64>>
where
    V: Clone + Eq + Hash,
{
    let n = g.vertex_count();
    let conflicts = find_type1_conflicts(g, layering);
    tracing::trace!(conflicts = conflicts.len(), "bk type-1 conflicts");

    let enabled = enabled(&config.directions);
    let mut xss: Passes = [None, None, None, None];
    for (pass, on) in enabled.into_iter().enumerate() {
        if !on {
            continue;
        }
        if token.is_cancelled() {
            return None;
        }
        let up = pass < 2;
        let right = pass % 2 == 1;

        let mut layers: Vec<Vec<usize>> = layering.layers().to_vec();
        if !up {
            layers.reverse();
        }
        if right {
            for layer in &mut layers {
                layer.reverse();
            }
        }

        let neighbours = |v: usize| {
            if up {
                predecessors(g, v)
            } else {
                successors(g, v)
            }
        };
        let alignment = vertical_alignment(n, &layers, &conflicts, neighbours);
        let mut xs = horizontal_compaction(g, config, &layers, &alignment);
        if right {
            for x in &mut xs {
                *x = -*x;
            }
        }
        xss[pass] = Some(xs);
    }

    let smallest = find_smallest_width_alignment(g, &xss)?;
    let align_to = xss[smallest].clone()?;
    align_coordinates(&mut xss, &align_to);
    Some(balance(&xss, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_follows_enabled_count() {
        let one: Passes = [Some(vec![4.0]), None, None, None];
        assert_eq!(balance(&one, 1), vec![4.0]);
        let two: Passes = [Some(vec![0.0]), None, Some(vec![10.0]), None];
        assert_eq!(balance(&two, 1), vec![5.0]);
        let three: Passes = [Some(vec![0.0]), Some(vec![7.0]), Some(vec![10.0]), None];
        assert_eq!(balance(&three, 1), vec![7.0]);
        let four: Passes = [
            Some(vec![0.0]),
            Some(vec![2.0]),
            Some(vec![4.0]),
            Some(vec![100.0]),
        ];
        assert_eq!(balance(&four, 1), vec![3.0]);
    }

    #[test]
    fn conflicts_are_unordered() {
        let mut c = Conflicts::default();
        add_conflict(&mut c, 5, 2);
        assert!(has_conflict(&c, 2, 5));
        assert!(!has_conflict(&c, 2, 4));
    }
}
