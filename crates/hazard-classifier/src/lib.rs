//! Flood hazard classification.
//!
//! Pairs aligned depth and velocity grids cell by cell and assigns each cell
//! one of six hazard categories (H1 least severe, H6 most severe) from a
//! fixed depth/velocity decision table. See [`rules`] for the table.
//!
//! # Example
//!
//! ```ignore
//! use hazard_classifier::{classify, CategoryStats};
//!
//! let categories = classify(&depth, &velocity)?;
//! let stats = CategoryStats::from_grid(&categories);
//! stats.log();
//! ```

pub mod category;
pub mod classify;
pub mod error;
pub mod rules;
pub mod stats;

pub use category::HazardCategory;
pub use classify::{classify, CategoryGrid};
pub use error::{ClassifyError, Result};
pub use rules::{classify_cell, ClassificationRule, RULES};
pub use stats::CategoryStats;
