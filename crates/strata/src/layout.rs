//! The layout pipeline.

use crate::acyclic;
use crate::cancel::CancellationToken;
use crate::config::LayoutConfig;
use crate::delegate::{DelegateGraph, Point, Size};
use crate::error::Result;
use crate::layering::Layering;
use crate::order::{self, EdgeComparator, EdgePredicate, OrderOptions};
use crate::position::{self, Bounds};
use crate::rank;
use crate::rng::TieBreaker;
use crate::self_loops::{self, SelfLoop};
use crate::synthetic::{self, ArticulatedEdge};
use rustc_hash::FxHashMap as HashMap;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;
use strata_graph::DirectedGraph;

type SizeFn<V> = Box<dyn Fn(&V) -> Size + Send + Sync>;
type CompareFn<E> = Box<dyn Fn(&E, &E) -> Ordering + Send + Sync>;
type PredicateFn<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type WeightFn<E> = Box<dyn Fn(&E) -> f64 + Send + Sync>;
type SeparationFn<E> = Box<dyn Fn(&E) -> usize + Send + Sync>;

/// Final coordinates for one run.
#[derive(Debug, Clone)]
pub struct Layout<V, E> {
    /// Centre of every caller vertex.
    pub vertices: HashMap<V, Point>,
    /// Interior waypoints of every caller edge; empty means a straight segment.
    pub edges: HashMap<E, Vec<Point>>,
    /// Full polylines, source to target.
    pub articulated: Vec<ArticulatedEdge<E>>,
    pub width: f64,
    pub height: f64,
}

impl<V, E> Default for Layout<V, E> {
    fn default() -> Self {
        Self {
            vertices: HashMap::default(),
            edges: HashMap::default(),
            articulated: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LayoutOutcome<V, E> {
    Completed(Layout<V, E>),
    Cancelled,
}

impl<V, E> LayoutOutcome<V, E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LayoutOutcome::Cancelled)
    }

    pub fn into_layout(self) -> Option<Layout<V, E>> {
        match self {
            LayoutOutcome::Completed(layout) => Some(layout),
            LayoutOutcome::Cancelled => None,
        }
    }
}

/// Everything one run mutates. Never shared between runs.
pub struct LayoutState<V, E> {
    pub graph: DelegateGraph<V, E>,
    pub layering: Layering,
    /// Edge ids reversed by cycle removal.
    pub reversed: Vec<usize>,
    pub self_loops: Vec<SelfLoop<E>>,
    pub tie_break: TieBreaker,
    pub token: CancellationToken,
}

impl<V, E> LayoutState<V, E>
where
    V: Clone + Eq + Hash,
{
    pub fn new(graph: DelegateGraph<V, E>, config: &LayoutConfig, token: CancellationToken) -> Self {
        Self {
            graph,
            layering: Layering::default(),
            reversed: Vec::new(),
            self_loops: Vec::new(),
            tie_break: TieBreaker::new(config.tie_break),
            token,
        }
    }

    fn cancelled(&self, phase: &'static str) -> bool {
        let cancelled = self.token.is_cancelled();
        if cancelled {
            tracing::debug!(phase, "layout cancelled");
        }
        cancelled
    }
}

/// Sugiyama layered layout with optional per-vertex and per-edge hooks.
pub struct SugiyamaLayout<V, E> {
    config: LayoutConfig,
    size: Option<SizeFn<V>>,
    compare: Option<CompareFn<E>>,
    favoured: Option<PredicateFn<E>>,
    weight: Option<WeightFn<E>>,
    min_separation: Option<SeparationFn<E>>,
}

impl<V, E> Default for SugiyamaLayout<V, E> {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl<V, E> SugiyamaLayout<V, E> {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            size: None,
            compare: None,
            favoured: None,
            weight: None,
            min_separation: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    pub fn vertex_size(mut self, f: impl Fn(&V) -> Size + Send + Sync + 'static) -> Self {
        self.size = Some(Box::new(f));
        self
    }

    /// Orders a vertex's successors in the initial ordering.
    pub fn edge_order(mut self, f: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static) -> Self {
        self.compare = Some(Box::new(f));
        self
    }

    /// Edges whose neighbours alone decide the median of a vertex that has any.
    pub fn favoured_edges(mut self, f: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.favoured = Some(Box::new(f));
        self
    }

    pub fn edge_weight(mut self, f: impl Fn(&E) -> f64 + Send + Sync + 'static) -> Self {
        self.weight = Some(Box::new(f));
        self
    }

    /// Minimum rank distance per edge; values below 1 count as 1.
    pub fn min_separation(mut self, f: impl Fn(&E) -> usize + Send + Sync + 'static) -> Self {
        self.min_separation = Some(Box::new(f));
        self
    }
}

impl<V, E> SugiyamaLayout<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    /// Lays out `graph`. The caller's graph is only read.
    pub fn run<G>(&self, graph: &G, token: &CancellationToken) -> Result<LayoutOutcome<V, E>>
    where
        G: DirectedGraph<Vertex = V, Edge = E>,
    {
        let span = tracing::debug_span!(
            "strata.layout",
            vertices = graph.vertex_count(),
            edges = graph.edge_count()
        );
        let _enter = span.enter();

        self.config.validate()?;
        let delegate = DelegateGraph::from_graph_with(
            graph,
            |v| self.size.as_ref().map_or_else(Size::default, |f| f(v)),
            |e| self.weight.as_ref().map_or(1.0, |f| f(e)),
            |e| self.min_separation.as_ref().map_or(1, |f| f(e)),
        )?;
        let mut state = LayoutState::new(delegate, &self.config, token.clone());

        state.self_loops = self_loops::extract(&mut state.graph);
        state.reversed = acyclic::run(&mut state.graph);
        if state.cancelled("acyclic") {
            return Ok(LayoutOutcome::Cancelled);
        }

        rank::run(
            &mut state.graph,
            &self.config,
            &mut state.tie_break,
            &state.token,
        )?;
        if state.cancelled("rank") {
            return Ok(LayoutOutcome::Cancelled);
        }

        state.layering = Layering::from_ranks(&state.graph);
        synthetic::insert_synthetic_vertices(&mut state.graph, &mut state.layering);

        let opts = OrderOptions {
            max_iterations: self.config.max_iterations,
            transpose_limit: self.config.transpose_limit,
            compare: self.compare.as_deref().map(|f| f as EdgeComparator<'_, E>),
            favoured: self.favoured.as_deref().map(|f| f as EdgePredicate<'_, E>),
        };
        order::order(
            &mut state.graph,
            &mut state.layering,
            &opts,
            &mut state.tie_break,
            &state.token,
        );
        if state.cancelled("order") {
            return Ok(LayoutOutcome::Cancelled);
        }

        position::assign_y(&mut state.graph, &state.layering, &self.config);
        if !position::assign_x(&mut state.graph, &state.layering, &self.config, &state.token)
            || state.cancelled("position")
        {
            return Ok(LayoutOutcome::Cancelled);
        }

        let mut articulated = synthetic::make_articulated_edges(&mut state.graph, &mut state.layering)?;
        acyclic::undo(&mut articulated);
        articulated.extend(self_loops::place(
            &state.graph,
            &state.self_loops,
            self.config.edge_separation,
        ));

        let layout = publish(&state.graph, articulated, self.config.margin);
        tracing::debug!(
            width = layout.width,
            height = layout.height,
            reversed = state.reversed.len(),
            self_loops = state.self_loops.len(),
            "layout done"
        );
        Ok(LayoutOutcome::Completed(layout))
    }
}

/// Translates the drawing so its top-left corner sits at `margin` and copies out the coordinates.
fn publish<V, E>(
    g: &DelegateGraph<V, E>,
    mut articulated: Vec<ArticulatedEdge<E>>,
    margin: f64,
) -> Layout<V, E>
where
    V: Clone + Eq + Hash,
    E: Clone + Eq + Hash,
{
    let mut bounds = Bounds::default();
    for (_, v) in g.vertices() {
        bounds.include_box(v.point, v.size);
    }
    for edge in &articulated {
        for &p in &edge.points {
            bounds.include_point(p);
        }
    }
    let shift = bounds.shift_to(margin);
    let moved = |p: Point| Point::new(p.x + shift.x, p.y + shift.y);

    let mut layout = Layout::default();
    for (_, v) in g.vertices() {
        if let Some(real) = v.kind.as_real() {
            layout.vertices.insert(real.clone(), moved(v.point));
        }
    }
    for edge in &mut articulated {
        for p in &mut edge.points {
            *p = moved(*p);
        }
        layout
            .edges
            .insert(edge.edge.clone(), edge.waypoints().to_vec());
    }
    layout.articulated = articulated;
    if !bounds.is_empty() {
        layout.width = bounds.width() + 2.0 * margin;
        layout.height = bounds.height() + 2.0 * margin;
    }
    layout
}
