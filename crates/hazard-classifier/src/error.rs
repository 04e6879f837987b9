//! Error types for hazard classification.

use hazard_grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Depth and velocity grids do not cover the same cells.
    #[error("depth grid {depth} does not match velocity grid {velocity}")]
    ShapeMismatch { depth: String, velocity: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ClassifyError {
    pub fn shape_mismatch(depth: impl Into<String>, velocity: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            depth: depth.into(),
            velocity: velocity.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
