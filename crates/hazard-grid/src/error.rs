//! Error types for raster grid I/O and resampling.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading, writing or transforming grids.
#[derive(Error, Debug)]
pub enum GridError {
    /// The file is missing, unreadable or the destination is unwritable.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's format/driver is not recognized or not supported.
    #[error("unsupported raster format for {path}: {message}")]
    Format { path: PathBuf, message: String },

    /// A target cell size is non-positive, not finite, or yields an empty grid.
    #[error("invalid target resolution ({x}, {y}): {message}")]
    InvalidResolution { x: f64, y: f64, message: String },

    /// Two grids that must be cell-aligned are not.
    #[error("grid shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// Grid data and declared dimensions disagree.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

impl GridError {
    /// Create an Io error for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a Format error for `path`.
    pub fn format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an InvalidResolution error.
    pub fn invalid_resolution(target: (f64, f64), message: impl Into<String>) -> Self {
        Self::InvalidResolution {
            x: target.0,
            y: target.1,
            message: message.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Wrap a TIFF codec error. Underlying I/O failures stay `Io`.
    pub(crate) fn from_tiff(path: impl AsRef<Path>, err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::IoError(source) => Self::io(path, source),
            other => Self::format(path, other.to_string()),
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
