//! Geo-referenced raster grids for flood hazard processing.
//!
//! This crate holds the grid model shared by the hazard pipeline:
//!
//! - **Raster**: a single-band, row-major cell buffer with its
//!   [`AffineTransform`], [`Crs`] and nodata sentinel
//! - **GridIo**: GeoTIFF and ESRI ASCII grid reading/writing
//! - **Resampling**: bilinear rescaling to a target cell size
//!
//! # Example
//!
//! ```ignore
//! use hazard_grid::{resample, Driver, GridIo};
//!
//! let io = GridIo::new("./data");
//! let (depth, meta) = io.read("task1/inputs/Flood_depth_metres.tif")?;
//! let depth = resample(&depth, (1.0, 1.0))?;
//! io.write("task1/outputs/depth_1m.tif", &depth, meta.driver)?;
//! ```

pub mod crs;
pub mod error;
pub mod io;
pub mod resample;
pub mod transform;
pub mod types;

// Re-export commonly used types at crate root
pub use crs::Crs;
pub use error::{GridError, Result};
pub use io::{detect_driver, GridIo};
pub use resample::resample;
pub use transform::AffineTransform;
pub use types::{CellType, Driver, Metadata, Raster, RasterGrid, RasterSample};
