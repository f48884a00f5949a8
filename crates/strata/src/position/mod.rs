//! Coordinate assignment: y from ranks, x from the configured strategy.

pub mod bk;
pub mod centered;

use crate::cancel::CancellationToken;
use crate::config::{CoordinateStrategy, LayoutConfig};
use crate::delegate::{DelegateGraph, Point, Size};
use crate::layering::Layering;
use std::hash::Hash;

/// Sets every vertex's y. Layers sit `vertical_offset` apart, or, with `use_vertex_heights`, each
/// layer is as tall as its tallest vertex plus `vertical_offset`.
pub fn assign_y<V, E>(g: &mut DelegateGraph<V, E>, layering: &Layering, config: &LayoutConfig)
where
    V: Clone + Eq + Hash,
{
    let mut prev_y: f64 = 0.0;
    for (rank, layer) in layering.layers().iter().enumerate() {
        if config.use_vertex_heights {
            let max_h = layer
                .iter()
                .map(|&v| g.vertex(v).size.height)
                .fold(0.0, f64::max);
            for &v in layer {
                g.vertex_mut(v).point.y = prev_y + max_h / 2.0;
            }
            prev_y += max_h + config.vertical_offset;
        } else {
            let y = rank as f64 * config.vertical_offset;
            for &v in layer {
                g.vertex_mut(v).point.y = y;
            }
        }
    }
}

/// Sets every vertex's x. Returns `false` when cancelled part way; coordinates are then
/// unspecified.
pub fn assign_x<V, E>(
    g: &mut DelegateGraph<V, E>,
    layering: &Layering,
    config: &LayoutConfig,
    token: &CancellationToken,
) -> bool
where
    V: Clone + Eq + Hash,
{
    let xs = match config.coordinates {
        CoordinateStrategy::Centered => centered::position_x(g, layering, config.horizontal_offset),
        CoordinateStrategy::BrandesKopf => match bk::position_x(g, layering, config, token) {
            Some(xs) => xs,
            None => return false,
        },
    };
    for (v, x) in xs.into_iter().enumerate() {
        g.vertex_mut(v).point.x = x;
    }
    true
}

/// Axis-aligned extent of a drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    pub fn include_point(&mut self, p: Point) {
        self.include_box(p, Size::default());
    }

    /// A box of `size` centred on `p`.
    pub fn include_box(&mut self, p: Point, size: Size) {
        self.min_x = self.min_x.min(p.x - size.width / 2.0);
        self.max_x = self.max_x.max(p.x + size.width / 2.0);
        self.min_y = self.min_y.min(p.y - size.height / 2.0);
        self.max_y = self.max_y.max(p.y + size.height / 2.0);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Offset that moves the top-left corner to `(margin, margin)`.
    pub fn shift_to(&self, margin: f64) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(margin - self.min_x, margin - self.min_y)
    }
}
