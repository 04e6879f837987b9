//! Per-category cell counts and areas.

use serde::Serialize;
use tracing::{info, warn};

use crate::category::HazardCategory;
use crate::classify::CategoryGrid;

/// Cell counts of a category grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    /// Index 0 is nodata, 1..=6 are H1..H6.
    counts: [u64; 7],
    /// Cells holding a code outside `0..=6`.
    invalid: u64,
    /// Area of one cell in squared CRS units.
    cell_area: f64,
}

impl CategoryStats {
    /// Count the cells of `grid`.
    pub fn from_grid(grid: &CategoryGrid) -> Self {
        let mut counts = [0u64; 7];
        let mut invalid = 0u64;
        for &code in grid.data() {
            match counts.get_mut(code as usize) {
                Some(count) => *count += 1,
                None => invalid += 1,
            }
        }
        Self {
            counts,
            invalid,
            cell_area: grid.transform().cell_area(),
        }
    }

    pub fn count(&self, category: HazardCategory) -> u64 {
        self.counts[category.code() as usize]
    }

    /// Area covered by `category` in squared CRS units.
    pub fn area(&self, category: HazardCategory) -> f64 {
        self.count(category) as f64 * self.cell_area
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_area
    }

    pub fn nodata(&self) -> u64 {
        self.count(HazardCategory::NoData)
    }

    pub fn invalid(&self) -> u64 {
        self.invalid
    }

    /// Cells in H1..H6.
    pub fn classified(&self) -> u64 {
        self.counts[1..].iter().sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.invalid
    }

    /// `(category, count, area)` for H1..H6, least severe first.
    pub fn rows(&self) -> impl Iterator<Item = (HazardCategory, u64, f64)> + '_ {
        HazardCategory::ALL
            .into_iter()
            .map(|c| (c, self.count(c), self.area(c)))
    }

    /// Log one line per category.
    pub fn log(&self) {
        for (category, count, area) in self.rows() {
            info!(category = %category, count, area, "{}: Count: {}", category, count);
        }
        if self.nodata() > 0 {
            info!(count = self.nodata(), "NoData: Count: {}", self.nodata());
        }
        if self.invalid > 0 {
            warn!(count = self.invalid, "Cells with codes outside 0..=6");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_grid::{AffineTransform, Crs, Raster};

    fn categories(codes: Vec<u8>, rows: usize, cols: usize, cell: f64) -> CategoryGrid {
        Raster::new(
            codes,
            rows,
            cols,
            AffineTransform::from_origin(0.0, 0.0, cell, cell),
            Crs::epsg(2193),
            Some(0),
        )
        .unwrap()
    }

    #[test]
    fn test_counts_and_areas() {
        let grid = categories(vec![1, 1, 2, 6, 0, 6], 2, 3, 2.0);
        let stats = CategoryStats::from_grid(&grid);

        assert_eq!(stats.count(HazardCategory::H1), 2);
        assert_eq!(stats.count(HazardCategory::H2), 1);
        assert_eq!(stats.count(HazardCategory::H3), 0);
        assert_eq!(stats.count(HazardCategory::H6), 2);
        assert_eq!(stats.nodata(), 1);
        assert_eq!(stats.classified(), 5);
        assert_eq!(stats.total(), 6);

        assert_eq!(stats.cell_area(), 4.0);
        assert_eq!(stats.area(HazardCategory::H1), 8.0);
        assert_eq!(stats.area(HazardCategory::H4), 0.0);
    }

    #[test]
    fn test_invalid_codes_are_counted_apart() {
        let grid = categories(vec![3, 9, 200, 3], 2, 2, 1.0);
        let stats = CategoryStats::from_grid(&grid);
        assert_eq!(stats.count(HazardCategory::H3), 2);
        assert_eq!(stats.invalid(), 2);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_rows_cover_all_categories() {
        let grid = categories(vec![1, 2, 3, 4, 5, 6], 1, 6, 1.0);
        let rows: Vec<_> = CategoryStats::from_grid(&grid).rows().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|&(_, count, area)| count == 1 && area == 1.0));
        assert_eq!(rows[0].0, HazardCategory::H1);
        assert_eq!(rows[5].0, HazardCategory::H6);
    }
}
