//! Layout configuration.

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayeringStrategy {
    LongestPath,
    #[default]
    NetworkSimplex,
    CoffmanGraham,
    TopDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateStrategy {
    Centered,
    #[default]
    BrandesKopf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    #[default]
    Deterministic,
    Seeded(u64),
}

/// Which of the four Brandes–Kopf alignment passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BkDirections {
    pub up_left: bool,
    pub up_right: bool,
    pub down_left: bool,
    pub down_right: bool,
}

impl Default for BkDirections {
    fn default() -> Self {
        Self {
            up_left: true,
            up_right: true,
            down_left: true,
            down_right: true,
        }
    }
}

impl BkDirections {
    pub fn any(&self) -> bool {
        self.up_left || self.up_right || self.down_left || self.down_right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub layering: LayeringStrategy,
    pub coordinates: CoordinateStrategy,
    /// Gap between neighbouring real vertices in a layer.
    pub horizontal_offset: f64,
    /// Gap between layers.
    pub vertical_offset: f64,
    /// Gap reserved beside synthetic (edge routing) vertices.
    pub edge_separation: f64,
    pub margin: f64,
    pub max_iterations: usize,
    pub transpose_limit: usize,
    pub max_simplex_iterations: usize,
    pub coffman_graham_width: usize,
    pub use_vertex_heights: bool,
    pub directions: BkDirections,
    pub tie_break: TieBreak,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layering: LayeringStrategy::NetworkSimplex,
            coordinates: CoordinateStrategy::BrandesKopf,
            horizontal_offset: 50.0,
            vertical_offset: 50.0,
            edge_separation: 20.0,
            margin: 0.0,
            max_iterations: 23,
            transpose_limit: 10,
            max_simplex_iterations: 10_000,
            coffman_graham_width: 8,
            use_vertex_heights: false,
            directions: BkDirections::default(),
            tie_break: TieBreak::Deterministic,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("horizontalOffset", self.horizontal_offset),
            ("verticalOffset", self.vertical_offset),
            ("edgeSeparation", self.edge_separation),
            ("margin", self.margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }
        if self.coffman_graham_width == 0 {
            return Err(LayoutError::InvalidConfig {
                field: "coffmanGrahamWidth",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.directions.any() {
            return Err(LayoutError::InvalidConfig {
                field: "directions",
                reason: "at least one alignment direction must be enabled".to_string(),
            });
        }
        Ok(())
    }
}
