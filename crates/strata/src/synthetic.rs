//! Split long edges into unit-span chains through synthetic vertices, and stitch them back
//! into polylines once coordinates are known.

use crate::delegate::{DelegateEdge, DelegateGraph, EdgeOrigin, Point};
use crate::error::{LayoutError, Result};
use crate::layering::Layering;
use std::hash::Hash;

/// One caller edge drawn as `[source, ...waypoints..., target]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticulatedEdge<E> {
    pub edge: E,
    pub points: Vec<Point>,
    /// Cycle removal flipped this edge.
    pub reversed: bool,
}

impl<E> ArticulatedEdge<E> {
    /// Interior points only; empty for a straight segment.
    pub fn waypoints(&self) -> &[Point] {
        match self.points.len() {
            0..=2 => &[],
            n => &self.points[1..n - 1],
        }
    }
}

/// Replaces every edge spanning more than one rank with a chain of unit-span
/// [`EdgeOrigin::Split`] edges. Each new synthetic vertex is appended to its layer.
///
/// Returns the number of synthetic vertices added.
pub fn insert_synthetic_vertices<V, E>(g: &mut DelegateGraph<V, E>, layering: &mut Layering) -> usize
where
    V: Clone + Eq + Hash,
    E: Clone,
{
    let mut added: usize = 0;
    for e in g.edge_ids() {
        let Some(edge) = g.edge(e) else {
            continue;
        };
        let source_rank = g.vertex(edge.source).rank;
        let target_rank = g.vertex(edge.target).rank;
        if target_rank - source_rank <= 1 {
            continue;
        }
        let Some(edge) = g.remove_edge(e) else {
            continue;
        };
        let original = edge.origin.edge().clone();

        let mut prev = edge.source;
        for rank in source_rank + 1..target_rank {
            let r = usize::try_from(rank).unwrap_or_default();
            let x = g.add_synthetic_vertex();
            layering.push(r, x);
            let index = layering.layer(r).len() - 1;
            let vertex = g.vertex_mut(x);
            vertex.rank = rank;
            vertex.index = index;
            g.add_edge(segment(&edge, prev, x, original.clone()));
            prev = x;
            added += 1;
        }
        g.add_edge(segment(&edge, prev, edge.target, original));
    }
    tracing::debug!(synthetic = added, "inserted synthetic vertices");
    added
}

fn segment<E>(edge: &DelegateEdge<E>, source: usize, target: usize, original: E) -> DelegateEdge<E> {
    DelegateEdge {
        source,
        target,
        origin: EdgeOrigin::Split(original),
        weight: edge.weight,
        min_separation: 1,
        reversed: edge.reversed,
    }
}

/// Walks every chain from its real source through synthetic vertices to its real target and
/// collects the vertex points, then drops all synthetic vertices (from the graph and from
/// `layering`).
///
/// Polylines keep the working orientation; see [`crate::acyclic::undo`].
pub fn make_articulated_edges<V, E>(
    g: &mut DelegateGraph<V, E>,
    layering: &mut Layering,
) -> Result<Vec<ArticulatedEdge<E>>>
where
    V: Clone + Eq + Hash,
    E: Clone,
{
    let max_steps = g.synthetic_vertex_count();
    let mut out: Vec<ArticulatedEdge<E>> = Vec::new();
    for (_, edge) in g.edges() {
        if g.is_synthetic(edge.source) {
            continue;
        }
        let mut points = vec![g.vertex(edge.source).point];
        let mut cur = edge.target;
        let mut steps: usize = 0;
        while g.is_synthetic(cur) {
            points.push(g.vertex(cur).point);
            steps += 1;
            let next = g.out_edges(cur).first().and_then(|&e| g.target(e));
            match next {
                Some(next) if steps <= max_steps => cur = next,
                _ => {
                    return Err(LayoutError::Invariant(format!(
                        "synthetic chain starting at vertex {} never reaches a real vertex",
                        edge.source
                    )));
                }
            }
        }
        points.push(g.vertex(cur).point);
        out.push(ArticulatedEdge {
            edge: edge.origin.edge().clone(),
            points,
            reversed: edge.reversed,
        });
    }

    let real = g.real_vertex_count();
    let removed = g.remove_synthetic_vertices();
    layering.retain(|v| v < real);
    layering.reindex(g);
    tracing::debug!(edges = out.len(), removed, "articulated edges");
    Ok(out)
}
