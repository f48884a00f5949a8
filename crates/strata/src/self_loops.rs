//! Self loops are set aside before layering and drawn beside their vertex at the end.

use crate::delegate::{DelegateGraph, Point};
use crate::synthetic::ArticulatedEdge;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct SelfLoop<E> {
    pub vertex: usize,
    pub edge: E,
}

/// Removes every self loop from `g`, in edge order.
pub fn extract<V, E>(g: &mut DelegateGraph<V, E>) -> Vec<SelfLoop<E>>
where
    V: Clone + Eq + Hash,
{
    let loops: Vec<usize> = g
        .edges()
        .filter(|(_, e)| e.is_self_loop())
        .map(|(ix, _)| ix)
        .collect();
    let mut out = Vec::with_capacity(loops.len());
    for e in loops {
        if let Some(edge) = g.remove_edge(e) {
            out.push(SelfLoop {
                vertex: edge.source,
                edge: edge.origin.into_edge(),
            });
        }
    }
    out
}

/// Draws each loop as a five-waypoint bulge off the right side of its vertex. Several loops on
/// one vertex nest outwards, `spacing` apart.
pub fn place<V, E>(
    g: &DelegateGraph<V, E>,
    loops: &[SelfLoop<E>],
    spacing: f64,
) -> Vec<ArticulatedEdge<E>>
where
    V: Clone + Eq + Hash,
    E: Clone,
{
    let mut nested: Vec<usize> = vec![0; g.vertex_count()];
    let mut out = Vec::with_capacity(loops.len());
    for l in loops {
        let vertex = g.vertex(l.vertex);
        nested[l.vertex] += 1;
        let center = vertex.point;
        let i = center.x + vertex.size.width / 2.0;
        let a = center.y;
        let o = spacing * nested[l.vertex] as f64;
        let h = if vertex.size.height > 0.0 {
            vertex.size.height / 2.0
        } else {
            o / 2.0
        };
        out.push(ArticulatedEdge {
            edge: l.edge.clone(),
            points: vec![
                center,
                Point::new(i + 2.0 * o / 3.0, a - h),
                Point::new(i + 5.0 * o / 6.0, a - h),
                Point::new(i + o, a),
                Point::new(i + 5.0 * o / 6.0, a + h),
                Point::new(i + 2.0 * o / 3.0, a + h),
                center,
            ],
            reversed: false,
        });
    }
    out
}
