//! Common test fixtures for flood hazard tests.

/// Grid layouts used across the test suite.
pub mod grid {
    /// Four cells on a side, 2 m cells.
    pub const SMALL_4X4: GridSpec = GridSpec {
        rows: 4,
        cols: 4,
        west: 1_750_000.0,
        north: 5_430_000.0,
        cell_size: 2.0,
    };

    /// A catchment-scale grid at 1 m.
    pub const CATCHMENT_100X100: GridSpec = GridSpec {
        rows: 100,
        cols: 100,
        west: 1_750_000.0,
        north: 5_430_000.0,
        cell_size: 1.0,
    };

    /// Georeferenced grid layout.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub rows: usize,
        pub cols: usize,
        /// X of the upper-left corner.
        pub west: f64,
        /// Y of the upper-left corner.
        pub north: f64,
        pub cell_size: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.rows * self.cols
        }

        /// Returns the bounds as (west, south, east, north).
        pub fn bounds(&self) -> (f64, f64, f64, f64) {
            (
                self.west,
                self.north - self.rows as f64 * self.cell_size,
                self.west + self.cols as f64 * self.cell_size,
                self.north,
            )
        }
    }
}

/// Depth/velocity pairs with their expected hazard category code.
///
/// Codes are 1..=6 for H1..H6.
pub mod hazard {
    /// `(depth_m, velocity_ms, expected_code)`.
    pub const CASES: &[(f32, f32, u8)] = &[
        (0.0, 0.0, 1),
        (0.2, 1.0, 1),
        (0.4, 1.0, 2),
        (0.45, 1.2, 2),
        (1.0, 0.5, 3),
        (0.6, 0.9, 3),
        (1.5, 0.6, 4),
        (2.0, 0.5, 4),
        (0.4, 2.0, 4),
        (1.8, 2.0, 5),
        (1.0, 3.0, 5),
        (0.2, 2.5, 5),
        (3.0, 5.0, 6),
        (2.5, 0.1, 6),
        (1.0, 4.5, 6),
    ];

    /// Depth values of the 4x4 end-to-end scenario (row-major).
    pub const SCENARIO_DEPTH: [f32; 16] = [
        0.1, 0.2, 0.4, 1.0, //
        1.5, 2.0, 1.8, 1.0, //
        3.0, 2.5, 1.0, 0.0, //
        0.25, 0.6, 1.2, 0.3,
    ];

    /// Velocity values of the 4x4 end-to-end scenario (row-major).
    pub const SCENARIO_VELOCITY: [f32; 16] = [
        0.5, 1.0, 1.0, 0.5, //
        0.6, 0.5, 2.0, 3.0, //
        5.0, 0.1, 4.5, 0.0, //
        1.0, 0.9, 0.8, 2.5,
    ];

    /// Expected category codes of the 4x4 end-to-end scenario.
    pub const SCENARIO_EXPECTED: [u8; 16] = [
        1, 1, 2, 3, //
        4, 4, 5, 5, //
        6, 6, 6, 1, //
        1, 3, 4, 5,
    ];
}

/// Common CRS identifiers.
pub mod crs {
    /// New Zealand Transverse Mercator 2000
    pub const NZTM: &str = "EPSG:2193";

    /// WGS84 geographic
    pub const EPSG_4326: &str = "EPSG:4326";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let (w, s, e, n) = grid::SMALL_4X4.bounds();
        assert_eq!(w, 1_750_000.0);
        assert_eq!(e, 1_750_008.0);
        assert_eq!(s, 5_429_992.0);
        assert_eq!(n, 5_430_000.0);
        assert_eq!(grid::CATCHMENT_100X100.size(), 10_000);
    }

    #[test]
    fn test_scenario_sizes() {
        assert_eq!(hazard::SCENARIO_DEPTH.len(), grid::SMALL_4X4.size());
        assert_eq!(hazard::SCENARIO_VELOCITY.len(), grid::SMALL_4X4.size());
        assert_eq!(hazard::SCENARIO_EXPECTED.len(), grid::SMALL_4X4.size());
    }
}
