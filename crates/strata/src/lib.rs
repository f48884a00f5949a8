//! Layered (Sugiyama) layout for directed graphs.
//!
//! The pipeline removes cycles, assigns ranks, splits long edges through synthetic vertices,
//! reduces crossings and assigns coordinates. [`SugiyamaLayout`] runs it synchronously;
//! [`LayoutWorker`] runs it on a background thread.

pub use strata_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod cancel;
pub mod config;
pub mod delegate;
pub mod error;
pub mod layering;
pub mod layout;
pub mod order;
pub mod position;
pub mod rank;
pub mod rng;
pub mod self_loops;
pub mod synthetic;
pub mod worker;

pub use cancel::CancellationToken;
pub use config::{BkDirections, CoordinateStrategy, LayeringStrategy, LayoutConfig, TieBreak};
pub use delegate::{DelegateEdge, DelegateGraph, DelegateVertex, EdgeOrigin, Point, Size, VertexKind};
pub use error::{LayoutError, Result};
pub use layering::Layering;
pub use layout::{Layout, LayoutOutcome, LayoutState, SugiyamaLayout};
pub use synthetic::ArticulatedEdge;
pub use worker::{LayoutHandle, LayoutWorker};
