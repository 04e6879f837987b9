//! Affine georeferencing for north-up rasters.

use serde::{Deserialize, Serialize};

/// Mapping from grid (col, row) indices to world coordinates.
///
/// Follows the GDAL geotransform layout with the rotation terms fixed at
/// zero: `x = origin_x + col * cell_width`, `y = origin_y + row * cell_height`.
/// The origin is the outer top-left corner of cell (0, 0), so `cell_height`
/// is negative for rasters stored top row first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl AffineTransform {
    /// Create a transform from its four non-zero coefficients.
    pub fn new(origin_x: f64, origin_y: f64, cell_width: f64, cell_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_width,
            cell_height,
        }
    }

    /// North-up transform from the top-left corner and positive cell sizes.
    pub fn from_origin(west: f64, north: f64, x_size: f64, y_size: f64) -> Self {
        Self::new(west, north, x_size, -y_size)
    }

    /// Absolute cell size `(x, y)` in CRS units.
    pub fn resolution(&self) -> (f64, f64) {
        (self.cell_width.abs(), self.cell_height.abs())
    }

    /// Ground area covered by one cell, in squared CRS units.
    pub fn cell_area(&self) -> f64 {
        (self.cell_width * self.cell_height).abs()
    }

    /// Same origin and sign convention, new absolute cell size.
    pub fn with_resolution(&self, x_size: f64, y_size: f64) -> Self {
        Self {
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            cell_width: x_size.copysign(self.cell_width),
            cell_height: y_size.copysign(self.cell_height),
        }
    }

    /// World coordinates of the top-left corner of a cell.
    pub fn cell_corner(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.cell_width,
            self.origin_y + row as f64 * self.cell_height,
        )
    }

    /// World coordinates of the centre of a cell.
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.cell_width,
            self.origin_y + (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Fractional (col, row) position of a world coordinate.
    pub fn world_to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.cell_width,
            (y - self.origin_y) / self.cell_height,
        )
    }

    /// Extent `(min_x, min_y, max_x, max_y)` of a `rows × cols` grid.
    pub fn bounds(&self, rows: usize, cols: usize) -> (f64, f64, f64, f64) {
        let (x1, y1) = self.cell_corner(cols, rows);
        (
            self.origin_x.min(x1),
            self.origin_y.min(y1),
            self.origin_x.max(x1),
            self.origin_y.max(y1),
        )
    }

    /// The six GDAL geotransform coefficients.
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.cell_width,
            0.0,
            self.origin_y,
            0.0,
            self.cell_height,
        ]
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::from_origin(0.0, 0.0, 1.0, 1.0)
    }
}

impl std::fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "origin=({}, {}) cell=({}, {})",
            self.origin_x, self.origin_y, self.cell_width, self.cell_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_is_north_up() {
        let t = AffineTransform::from_origin(1_500_000.0, 5_200_000.0, 2.0, 2.0);
        assert_eq!(t.cell_height, -2.0);
        assert_eq!(t.resolution(), (2.0, 2.0));
        assert_eq!(t.cell_area(), 4.0);
    }

    #[test]
    fn test_with_resolution_keeps_origin_and_signs() {
        let t = AffineTransform::from_origin(100.0, 200.0, 2.0, 2.0).with_resolution(1.0, 1.0);
        assert_eq!(t.origin_x, 100.0);
        assert_eq!(t.origin_y, 200.0);
        assert_eq!(t.cell_width, 1.0);
        assert_eq!(t.cell_height, -1.0);
    }

    #[test]
    fn test_cell_center_and_back() {
        let t = AffineTransform::from_origin(10.0, 20.0, 2.0, 2.0);
        let (x, y) = t.cell_center(1, 2);
        assert_eq!((x, y), (13.0, 15.0));
        let (c, r) = t.world_to_grid(x, y);
        assert_eq!((c, r), (1.5, 2.5));
    }

    #[test]
    fn test_bounds() {
        let t = AffineTransform::from_origin(0.0, 10.0, 1.0, 2.0);
        assert_eq!(t.bounds(5, 3), (0.0, 0.0, 3.0, 10.0));
    }

    #[test]
    fn test_gdal_layout() {
        let t = AffineTransform::from_origin(5.0, 6.0, 0.5, 0.25);
        assert_eq!(t.to_gdal(), [5.0, 0.5, 0.0, 6.0, 0.0, -0.25]);
    }
}
