use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use std::cmp::Ordering;
use std::hash::Hash;

/// Edge comparator used to order a vertex's successors.
pub type EdgeComparator<'a, E> = &'a dyn Fn(&E, &E) -> Ordering;

/// Builds the first ordering: a DFS started from every vertex in rank order, appending each
/// vertex to its layer when first reached.
///
/// Successors are visited in `compare` order over their (original) edges, or in edge insertion
/// order when no comparator is given. Roots with equal rank keep their index order.
pub fn init_order<V, E>(g: &DelegateGraph<V, E>, compare: Option<EdgeComparator<'_, E>>) -> Layering
where
    V: Clone + Eq + Hash,
{
    let n = g.vertex_count();
    let mut layering = Layering::new(0);
    if n == 0 {
        return layering;
    }

    let mut roots: Vec<usize> = (0..n).collect();
    roots.sort_by_key(|&v| g.vertex(v).rank);

    let mut visited = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    for root in roots {
        stack.push(root);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            let rank = usize::try_from(g.vertex(v).rank).unwrap_or_default();
            layering.push(rank, v);

            let mut out: Vec<usize> = g.out_edges(v).to_vec();
            if let Some(compare) = compare {
                out.sort_by(|&a, &b| match (g.edge(a), g.edge(b)) {
                    (Some(a), Some(b)) => compare(a.origin.edge(), b.origin.edge()),
                    _ => Ordering::Equal,
                });
            }
            // Reverse so the first successor is popped first.
            for &e in out.iter().rev() {
                if let Some(w) = g.target(e) {
                    if !visited[w] {
                        stack.push(w);
                    }
                }
            }
        }
    }
    layering
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{DelegateEdge, EdgeOrigin, Size};

    #[test]
    fn follows_comparator_order() {
        let mut g: DelegateGraph<&str, u32> = DelegateGraph::new();
        let a = g.add_vertex("a", Size::default());
        let b = g.add_vertex("b", Size::default());
        let c = g.add_vertex("c", Size::default());
        g.vertex_mut(b).rank = 1;
        g.vertex_mut(c).rank = 1;
        g.add_edge(DelegateEdge::new(a, b, EdgeOrigin::Original(2)));
        g.add_edge(DelegateEdge::new(a, c, EdgeOrigin::Original(1)));

        let plain = init_order(&g, None);
        assert_eq!(plain.layer(1), &[b, c]);

        let by_label = |x: &u32, y: &u32| x.cmp(y);
        let sorted = init_order(&g, Some(&by_label));
        assert_eq!(sorted.layer(1), &[c, b]);
    }
}
