//! Helper algorithms over any [`DirectedGraph`].

use crate::DirectedGraph;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("graph contains a cycle")]
pub struct CycleError;

/// Depth-first postorder over successors, starting from each root in turn.
pub fn postorder<G: DirectedGraph>(g: &G, roots: &[G::Vertex]) -> Vec<G::Vertex> {
    let mut visited: HashSet<G::Vertex> = HashSet::default();
    let mut out: Vec<G::Vertex> = Vec::new();

    for root in roots {
        if !visited.insert(root.clone()) {
            continue;
        }
        // (vertex, successors, next successor index)
        let mut stack: Vec<(G::Vertex, Vec<G::Vertex>, usize)> =
            vec![(root.clone(), successors(g, root), 0)];
        while let Some((_, succ, next)) = stack.last_mut() {
            if let Some(w) = succ.get(*next).cloned() {
                *next += 1;
                if visited.insert(w.clone()) {
                    let ws = successors(g, &w);
                    stack.push((w, ws, 0));
                }
                continue;
            }
            if let Some((v, _, _)) = stack.pop() {
                out.push(v);
            }
        }
    }
    out
}

/// Weakly connected components, each listed in breadth-first discovery order.
pub fn components<G: DirectedGraph>(g: &G) -> Vec<Vec<G::Vertex>> {
    let mut seen: HashSet<G::Vertex> = HashSet::default();
    let mut out: Vec<Vec<G::Vertex>> = Vec::new();

    for start in g.vertices() {
        if !seen.insert(start.clone()) {
            continue;
        }
        let mut comp: Vec<G::Vertex> = Vec::new();
        let mut q: VecDeque<G::Vertex> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            for w in successors(g, &v).into_iter().chain(predecessors(g, &v)) {
                if seen.insert(w.clone()) {
                    q.push_back(w);
                }
            }
            comp.push(v);
        }
        out.push(comp);
    }
    out
}

/// Strongly connected components with more than one vertex, plus single vertices carrying a
/// self loop (Tarjan).
pub fn find_cycles<G: DirectedGraph>(g: &G) -> Vec<Vec<G::Vertex>> {
    struct Tarjan<'a, G: DirectedGraph> {
        g: &'a G,
        index: usize,
        stack: Vec<G::Vertex>,
        on_stack: HashSet<G::Vertex>,
        indices: HashMap<G::Vertex, usize>,
        lowlink: HashMap<G::Vertex, usize>,
        sccs: Vec<Vec<G::Vertex>>,
    }

    impl<G: DirectedGraph> Tarjan<'_, G> {
        fn strongconnect(&mut self, v: &G::Vertex) {
            self.indices.insert(v.clone(), self.index);
            self.lowlink.insert(v.clone(), self.index);
            self.index += 1;
            self.stack.push(v.clone());
            self.on_stack.insert(v.clone());

            for w in successors(self.g, v) {
                if !self.indices.contains_key(&w) {
                    self.strongconnect(&w);
                    let w_low = self.lowlink[&w];
                    let v_low = self.lowlink[v];
                    self.lowlink.insert(v.clone(), v_low.min(w_low));
                } else if self.on_stack.contains(&w) {
                    let w_index = self.indices[&w];
                    let v_low = self.lowlink[v];
                    self.lowlink.insert(v.clone(), v_low.min(w_index));
                }
            }

            if self.lowlink[v] == self.indices[v] {
                let mut comp: Vec<G::Vertex> = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack.remove(&w);
                    let done = &w == v;
                    comp.push(w);
                    if done {
                        break;
                    }
                }
                self.sccs.push(comp);
            }
        }
    }

    let mut tarjan = Tarjan {
        g,
        index: 0,
        stack: Vec::new(),
        on_stack: HashSet::default(),
        indices: HashMap::default(),
        lowlink: HashMap::default(),
        sccs: Vec::new(),
    };
    for v in g.vertices() {
        if !tarjan.indices.contains_key(&v) {
            tarjan.strongconnect(&v);
        }
    }

    tarjan
        .sccs
        .into_iter()
        .filter(|comp| {
            comp.len() > 1
                || comp
                    .first()
                    .is_some_and(|v| successors(g, v).iter().any(|w| w == v))
        })
        .collect()
}

pub fn is_acyclic<G: DirectedGraph>(g: &G) -> bool {
    topsort(g).is_ok()
}

/// Kahn topological order; vertices with equal depth keep the graph's vertex order.
pub fn topsort<G: DirectedGraph>(g: &G) -> Result<Vec<G::Vertex>, CycleError> {
    let mut indegree: HashMap<G::Vertex, usize> = HashMap::default();
    let mut queue: VecDeque<G::Vertex> = VecDeque::new();
    for v in g.vertices() {
        let d = g.in_edges(&v).len();
        if d == 0 {
            queue.push_back(v.clone());
        }
        indegree.insert(v, d);
    }

    let mut out: Vec<G::Vertex> = Vec::with_capacity(indegree.len());
    while let Some(v) = queue.pop_front() {
        for e in g.out_edges(&v) {
            let Some(w) = g.target(&e) else {
                continue;
            };
            if let Some(d) = indegree.get_mut(&w) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(w);
                }
            }
        }
        out.push(v);
    }

    if out.len() == indegree.len() {
        Ok(out)
    } else {
        Err(CycleError)
    }
}

fn successors<G: DirectedGraph>(g: &G, v: &G::Vertex) -> Vec<G::Vertex> {
    let mut out: Vec<G::Vertex> = Vec::new();
    for e in g.out_edges(v) {
        if let Some(w) = g.target(&e) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
    }
    out
}

fn predecessors<G: DirectedGraph>(g: &G, v: &G::Vertex) -> Vec<G::Vertex> {
    let mut out: Vec<G::Vertex> = Vec::new();
    for e in g.in_edges(v) {
        if let Some(u) = g.source(&e) {
            if !out.contains(&u) {
                out.push(u);
            }
        }
    }
    out
}
