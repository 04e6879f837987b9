//! The depth/velocity decision table.
//!
//! | Priority | depth × velocity ≤ | depth ≤ | velocity ≤ | Category |
//! |---|---|---|---|---|
//! | 1 | 0.3 | 0.3 | 2.0 | H1 |
//! | 2 | 0.6 | 0.5 | 2.0 | H2 |
//! | 3 | 0.6 | 1.2 | 2.0 | H3 |
//! | 4 | 1.0 | 2.0 | 2.0 | H4 |
//! | 5 | 4.0 | 2.0 | 4.0 | H5 |
//! | else | | | | H6 |
//!
//! Rules are checked top-down and the first rule whose three limits all
//! hold wins. Comparisons are inclusive and done in `f32`, the precision
//! of the input grids.

use crate::category::HazardCategory;

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRule {
    /// Upper bound on depth × velocity (m²/s).
    pub max_score: f32,
    /// Upper bound on depth (m).
    pub max_depth: f32,
    /// Upper bound on velocity (m/s).
    pub max_velocity: f32,
    pub category: HazardCategory,
}

impl ClassificationRule {
    const fn new(max_score: f32, max_depth: f32, max_velocity: f32, category: HazardCategory) -> Self {
        Self {
            max_score,
            max_depth,
            max_velocity,
            category,
        }
    }

    #[inline]
    pub fn matches(&self, depth: f32, velocity: f32, score: f32) -> bool {
        score <= self.max_score && depth <= self.max_depth && velocity <= self.max_velocity
    }
}

/// Rules in priority order. Cells matching none are `H6`.
pub const RULES: [ClassificationRule; 5] = [
    ClassificationRule::new(0.3, 0.3, 2.0, HazardCategory::H1),
    ClassificationRule::new(0.6, 0.5, 2.0, HazardCategory::H2),
    ClassificationRule::new(0.6, 1.2, 2.0, HazardCategory::H3),
    ClassificationRule::new(1.0, 2.0, 2.0, HazardCategory::H4),
    ClassificationRule::new(4.0, 2.0, 4.0, HazardCategory::H5),
];

/// Category for one depth (m) and velocity (m/s) pair.
///
/// NaN in either input yields `NoData`; other nodata sentinels must be
/// screened by the caller.
#[inline]
pub fn classify_cell(depth: f32, velocity: f32) -> HazardCategory {
    if depth.is_nan() || velocity.is_nan() {
        return HazardCategory::NoData;
    }
    let score = depth * velocity;
    RULES
        .iter()
        .find(|rule| rule.matches(depth, velocity, score))
        .map_or(HazardCategory::H6, |rule| rule.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::hazard;

    #[test]
    fn test_table_cases() {
        for &(depth, velocity, expected) in hazard::CASES {
            assert_eq!(
                classify_cell(depth, velocity).code(),
                expected,
                "depth={} velocity={}",
                depth,
                velocity
            );
        }
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(classify_cell(0.3, 1.0), HazardCategory::H1);
        assert_eq!(classify_cell(0.5, 1.2), HazardCategory::H2);
        assert_eq!(classify_cell(2.0, 0.5), HazardCategory::H4);
        assert_eq!(classify_cell(1.0, 4.0), HazardCategory::H5);
        assert_eq!(classify_cell(2.0, 2.0), HazardCategory::H5);
    }

    #[test]
    fn test_caps_force_h6() {
        // Depth over 2 m or velocity over 4 m/s exceeds every rule
        assert_eq!(classify_cell(2.01, 0.0), HazardCategory::H6);
        assert_eq!(classify_cell(0.0, 4.01), HazardCategory::H6);
        assert_eq!(classify_cell(f32::INFINITY, 0.1), HazardCategory::H6);
    }

    #[test]
    fn test_nan_is_nodata() {
        assert_eq!(classify_cell(f32::NAN, 1.0), HazardCategory::NoData);
        assert_eq!(classify_cell(1.0, f32::NAN), HazardCategory::NoData);
    }

    #[test]
    fn test_monotonic_in_depth_and_velocity() {
        let steps: Vec<f32> = (0..=60).map(|i| i as f32 * 0.1).collect();

        for &fixed in &steps {
            let mut previous = HazardCategory::H1;
            for &depth in &steps {
                let category = classify_cell(depth, fixed);
                assert!(category >= previous, "depth {} velocity {}", depth, fixed);
                previous = category;
            }

            let mut previous = HazardCategory::H1;
            for &velocity in &steps {
                let category = classify_cell(fixed, velocity);
                assert!(category >= previous, "depth {} velocity {}", fixed, velocity);
                previous = category;
            }
        }
    }
}
