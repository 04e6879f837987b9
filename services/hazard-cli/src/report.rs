//! Console summary of a classified grid.

use std::fmt::Write as _;

use hazard_classifier::{CategoryStats, HazardCategory};
use hazard_renderer::legend;
use serde::Serialize;

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub category: HazardCategory,
    pub color: String,
    pub count: u64,
    /// Squared CRS units (square metres for projected CRSs).
    pub area: f64,
    /// Share of classified cells, 0..=100.
    pub percent: f64,
}

/// Category counts and areas, ready for printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub shape: (usize, usize),
    pub cell_area: f64,
    pub rows: Vec<ReportRow>,
    pub nodata: u64,
    pub total: u64,
}

impl Report {
    pub fn new(stats: &CategoryStats, shape: (usize, usize)) -> Self {
        let classified = stats.classified().max(1) as f64;
        let rows = legend()
            .into_iter()
            .map(|entry| {
                let count = stats.count(entry.category);
                ReportRow {
                    category: entry.category,
                    color: entry.color_name.to_string(),
                    count,
                    area: stats.area(entry.category),
                    percent: count as f64 / classified * 100.0,
                }
            })
            .collect();

        Self {
            shape,
            cell_area: stats.cell_area(),
            rows,
            nodata: stats.nodata(),
            total: stats.total(),
        }
    }

    /// Fixed-width table.
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Grid: {} rows x {} cols, cell area {}",
            self.shape.0, self.shape.1, self.cell_area
        );
        let _ = writeln!(
            out,
            "{:<8} {:<12} {:>12} {:>16} {:>8}",
            "Category", "Colour", "Count", "Area", "%"
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<8} {:<12} {:>12} {:>16.2} {:>7.2}%",
                row.category.label(),
                row.color,
                row.count,
                row.area,
                row.percent
            );
        }
        let _ = writeln!(out, "{:<8} {:<12} {:>12}", "NoData", "", self.nodata);
        let _ = write!(out, "{:<8} {:<12} {:>12}", "Total", "", self.total);
        out
    }

    pub fn format_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
