//! Bilinear resampling to a target cell size.
//!
//! Output cells are aligned to the source by cell centre: output cell `i`
//! along an axis samples source position `(i + 0.5) / m - 0.5`, where `m` is
//! the ratio of source to target cell size. The output keeps the source
//! origin, so both grids describe the same extent up to rounding of the
//! output shape.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{GridError, Result};
use crate::types::RasterGrid;

/// Source sampling position along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisSample {
    lo: usize,
    hi: usize,
    /// Weight of `hi`; `lo` gets `1 - frac`.
    frac: f64,
}

/// Resample `grid` to cells of `target = (x, y)` CRS units.
///
/// The output shape is `(round(rows * sy / ty), round(cols * sx / tx))`.
/// Cells that fall outside the source extent, or blend a nodata source
/// cell, get the source's nodata value (NaN when it declares none).
/// Resampling to the native cell size returns an unchanged copy.
pub fn resample(grid: &RasterGrid, target: (f64, f64)) -> Result<RasterGrid> {
    let (tx, ty) = target;
    if !(tx.is_finite() && ty.is_finite()) || tx <= 0.0 || ty <= 0.0 {
        return Err(GridError::invalid_resolution(
            target,
            "cell size must be positive and finite",
        ));
    }

    let (sx, sy) = grid.resolution();
    if (sx, sy) == (tx, ty) {
        debug!(resolution = ?target, "Target matches native resolution; copying grid");
        return Ok(grid.clone());
    }

    let (mx, my) = (sx / tx, sy / ty);
    let out_rows = (grid.rows() as f64 * my).round() as usize;
    let out_cols = (grid.cols() as f64 * mx).round() as usize;
    if out_rows == 0 || out_cols == 0 {
        return Err(GridError::invalid_resolution(
            target,
            format!(
                "resampling a {}x{} grid of {}x{} cells yields an empty grid",
                grid.rows(),
                grid.cols(),
                sx,
                sy
            ),
        ));
    }

    let col_samples = axis_samples(grid.cols(), out_cols, mx);
    let row_samples = axis_samples(grid.rows(), out_rows, my);
    let fill = grid.nodata().unwrap_or(f32::NAN);
    let src = grid.data();
    let src_cols = grid.cols();

    let mut output = vec![fill; out_rows * out_cols];
    output
        .par_chunks_mut(out_cols)
        .zip(row_samples.par_iter())
        .for_each(|(out_row, row_sample)| {
            let Some(ys) = row_sample else {
                return;
            };
            let top = &src[ys.lo * src_cols..(ys.lo + 1) * src_cols];
            let bottom = &src[ys.hi * src_cols..(ys.hi + 1) * src_cols];

            for (out, col_sample) in out_row.iter_mut().zip(&col_samples) {
                let Some(xs) = col_sample else {
                    continue;
                };
                if let Some(value) = blend(grid, top, bottom, xs, ys) {
                    *out = value;
                }
            }
        });

    let transform = grid.transform().with_resolution(tx, ty);
    let resampled = crate::types::Raster::new(
        output,
        out_rows,
        out_cols,
        transform,
        grid.crs().clone(),
        grid.nodata(),
    )?;

    info!(
        from_rows = grid.rows(),
        from_cols = grid.cols(),
        rows = out_rows,
        cols = out_cols,
        resolution = ?target,
        "Resample complete"
    );

    Ok(resampled)
}

/// Precompute source positions for every output index along one axis.
///
/// `None` marks output cells whose centre lies outside the source extent.
fn axis_samples(src_len: usize, out_len: usize, multiplier: f64) -> Vec<Option<AxisSample>> {
    let last = (src_len - 1) as f64;
    (0..out_len)
        .map(|i| {
            let pos = (i as f64 + 0.5) / multiplier - 0.5;
            if pos < -0.5 || pos >= src_len as f64 - 0.5 {
                return None;
            }
            let pos = pos.clamp(0.0, last);
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(src_len - 1);
            Some(AxisSample {
                lo,
                hi,
                frac: pos - lo as f64,
            })
        })
        .collect()
}

/// Blend the four source cells around one output cell.
///
/// Returns `None` if a corner with non-zero weight is nodata.
#[inline]
fn blend(
    grid: &RasterGrid,
    top: &[f32],
    bottom: &[f32],
    xs: &AxisSample,
    ys: &AxisSample,
) -> Option<f32> {
    let corners = [
        (top[xs.lo], (1.0 - xs.frac) * (1.0 - ys.frac)),
        (top[xs.hi], xs.frac * (1.0 - ys.frac)),
        (bottom[xs.lo], (1.0 - xs.frac) * ys.frac),
        (bottom[xs.hi], xs.frac * ys.frac),
    ];

    let mut sum = 0.0f64;
    for (value, weight) in corners {
        if weight == 0.0 {
            continue;
        }
        if grid.is_nodata(value) {
            return None;
        }
        sum += value as f64 * weight;
    }
    Some(sum as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::transform::AffineTransform;
    use crate::types::Raster;

    fn grid(data: Vec<f32>, rows: usize, cols: usize, cell: f64) -> RasterGrid {
        Raster::new(
            data,
            rows,
            cols,
            AffineTransform::from_origin(1000.0, 2000.0, cell, cell),
            Crs::epsg(2193),
            Some(-9999.0),
        )
        .unwrap()
    }

    #[test]
    fn test_axis_samples_upsample_2x() {
        let samples = axis_samples(2, 4, 2.0);
        // Positions -0.25, 0.25, 0.75, 1.25 clamp to [0, 1]
        assert_eq!(samples[0], Some(AxisSample { lo: 0, hi: 1, frac: 0.0 }));
        assert_eq!(samples[1], Some(AxisSample { lo: 0, hi: 1, frac: 0.25 }));
        assert_eq!(samples[2], Some(AxisSample { lo: 0, hi: 1, frac: 0.75 }));
        assert_eq!(samples[3], Some(AxisSample { lo: 1, hi: 1, frac: 0.0 }));
    }

    #[test]
    fn test_axis_samples_outside_extent() {
        // 3 source cells at 1.0 resampled to 0.4 => round(7.5) = 8 output cells,
        // the last centre (7.5 * 0.4 = 3.0) sits on the far source edge
        let samples = axis_samples(3, 8, 2.5);
        assert!(samples[..7].iter().all(Option::is_some));
        assert_eq!(samples[7], None);
    }

    #[test]
    fn test_resample_doubles_shape() {
        let g = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2, 2.0);
        let out = resample(&g, (1.0, 1.0)).unwrap();

        assert_eq!(out.shape(), (4, 4));
        assert_eq!(out.transform().origin_x, 1000.0);
        assert_eq!(out.transform().origin_y, 2000.0);
        assert_eq!(out.resolution(), (1.0, 1.0));
        assert_eq!(out.transform().cell_height, -1.0);

        // Corner cells clamp to the corner source values
        assert_eq!(out.get(0, 0), Some(1.0));
        assert_eq!(out.get(0, 3), Some(2.0));
        assert_eq!(out.get(3, 0), Some(3.0));
        assert_eq!(out.get(3, 3), Some(4.0));
        // (0.25, 0.25) between the four sources
        let v = out.get(1, 1).unwrap();
        assert!((v - 1.75).abs() < 1e-6, "got {}", v);
    }

    #[test]
    fn test_resample_downsample_shape() {
        let g = grid(vec![0.0; 10 * 6], 10, 6, 1.0);
        let out = resample(&g, (2.0, 2.0)).unwrap();
        assert_eq!(out.shape(), (5, 3));
    }

    #[test]
    fn test_resample_same_resolution_is_copy() {
        let g = grid(vec![0.5, f32::NAN, -9999.0, 7.0], 2, 2, 1.0);
        let out = resample(&g, (1.0, 1.0)).unwrap();
        assert_eq!(out.shape(), g.shape());
        assert_eq!(out.transform(), g.transform());
        assert_eq!(out.get(0, 0), Some(0.5));
        assert!(out.get(0, 1).unwrap().is_nan());
    }

    #[test]
    fn test_resample_propagates_nodata() {
        let g = grid(vec![1.0, -9999.0, 3.0, 4.0], 2, 2, 2.0);
        let out = resample(&g, (1.0, 1.0)).unwrap();

        // Top-left corner draws only from (0, 0)
        assert_eq!(out.get(0, 0), Some(1.0));
        // Any cell blending the nodata source is nodata
        assert_eq!(out.get(0, 1), Some(-9999.0));
        assert_eq!(out.get(1, 1), Some(-9999.0));
        assert_eq!(out.get(0, 3), Some(-9999.0));
        // Bottom row draws only from the valid source row
        assert_eq!(out.get(3, 0), Some(3.0));
        assert_eq!(out.get(3, 3), Some(4.0));
        assert_eq!(out.nodata(), Some(-9999.0));
    }

    #[test]
    fn test_resample_cells_outside_extent_are_nodata() {
        // 3 cells at 1.0 to 0.4 gives 8 columns; the last centre sits at 3.0
        let g = grid(vec![1.0, 2.0, 3.0], 1, 3, 1.0);
        let out = resample(&g, (0.4, 1.0)).unwrap();

        assert_eq!(out.shape(), (1, 8));
        assert!(out.row(0)[..7].iter().all(|&v| !g.is_nodata(v)));
        assert_eq!(out.get(0, 7), Some(-9999.0));

        let undeclared = g.clone().with_nodata(None);
        let out = resample(&undeclared, (0.4, 1.0)).unwrap();
        assert!(out.get(0, 7).unwrap().is_nan());
        assert_eq!(out.nodata(), None);
    }

    #[test]
    fn test_resample_rejects_non_positive() {
        let g = grid(vec![0.0; 4], 2, 2, 1.0);
        for target in [(0.0, 1.0), (1.0, -1.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            assert!(matches!(
                resample(&g, target),
                Err(GridError::InvalidResolution { .. })
            ));
        }
    }

    #[test]
    fn test_resample_empty_result_is_rejected() {
        let g = grid(vec![0.0; 4], 2, 2, 1.0);
        assert!(matches!(
            resample(&g, (100.0, 100.0)),
            Err(GridError::InvalidResolution { .. })
        ));
    }
}
