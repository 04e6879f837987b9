//! Whole-grid classification.

use std::time::Instant;

use hazard_grid::{GridError, Raster, RasterGrid};
use rayon::prelude::*;
use tracing::info;

use crate::category::HazardCategory;
use crate::error::{ClassifyError, Result};
use crate::rules::classify_cell;

/// Per-cell category codes. Nodata is `0`.
pub type CategoryGrid = Raster<u8>;

/// Classify every cell of aligned depth (m) and velocity (m/s) grids.
///
/// Both grids must have the same shape and transform. A cell that is nodata
/// in either input becomes [`HazardCategory::NoData`]. The output takes the
/// depth grid's transform and CRS and declares `0` as its nodata value.
pub fn classify(depth: &RasterGrid, velocity: &RasterGrid) -> Result<CategoryGrid> {
    depth.ensure_aligned(velocity).map_err(|e| match e {
        GridError::ShapeMismatch { expected, found } => {
            ClassifyError::shape_mismatch(expected, found)
        }
        other => ClassifyError::Grid(other),
    })?;

    let start = Instant::now();

    let codes: Vec<u8> = depth
        .data()
        .par_iter()
        .zip(velocity.data().par_iter())
        .map(|(&d, &v)| {
            if depth.is_nodata(d) || velocity.is_nodata(v) {
                HazardCategory::NoData.code()
            } else {
                classify_cell(d, v).code()
            }
        })
        .collect();

    let elapsed = start.elapsed();
    info!(
        rows = depth.rows(),
        cols = depth.cols(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Classification took {:.3}s",
        elapsed.as_secs_f64()
    );

    Ok(depth.derive(codes, Some(HazardCategory::NoData.code()))?)
}
