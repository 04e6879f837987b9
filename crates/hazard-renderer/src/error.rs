//! Error types for rendering.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// A cell holds a code the classifier never produces.
    #[error("invalid hazard category code {code} at row {row}, col {col}")]
    Invariant { code: u8, row: usize, col: usize },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
