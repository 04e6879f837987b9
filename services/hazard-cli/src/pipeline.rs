//! Read, resample, classify, then persist or report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hazard_classifier::{classify, CategoryGrid, CategoryStats};
use hazard_grid::{resample, GridIo, RasterGrid};
use hazard_renderer::render;
use tracing::{info, warn};

use crate::config::PipelineConfig;

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub categories: CategoryGrid,
    pub stats: CategoryStats,
    /// Written category raster (`Save` mode only).
    pub raster_path: Option<PathBuf>,
    /// Written PNG (`Save` mode only).
    pub image_path: Option<PathBuf>,
}

/// Run the full classification pipeline.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let io = GridIo::new(&config.data_dir);

    let depth = load_resampled(&io, &config.depth, "depth", config.resolution)?;
    let velocity = load_resampled(&io, &config.velocity, "velocity", config.resolution)?;

    if depth.crs() != velocity.crs() {
        warn!(
            depth_crs = %depth.crs(),
            velocity_crs = %velocity.crs(),
            "Depth and velocity rasters declare different CRSs"
        );
    }

    let categories = classify(&depth, &velocity).context("classifying flood hazard")?;
    let stats = CategoryStats::from_grid(&categories);
    stats.log();

    // Invalid codes must fail before anything is written
    let image = render(&categories).context("rendering hazard image")?;

    let (raster_path, image_path) = if config.mode.persists() {
        let raster_path = io
            .write(config.output_raster_path(), &categories, config.driver)
            .with_context(|| {
                format!(
                    "writing category raster {}",
                    io.resolve(config.output_raster_path()).display()
                )
            })?;
        let image_path = io.resolve(&config.output_image);
        image
            .save(&image_path)
            .with_context(|| format!("writing hazard image {}", image_path.display()))?;
        (Some(raster_path), Some(image_path))
    } else {
        info!("View mode: outputs not written");
        (None, None)
    };

    Ok(PipelineOutput {
        categories,
        stats,
        raster_path,
        image_path,
    })
}

fn load_resampled(
    io: &GridIo,
    path: &Path,
    name: &str,
    resolution: (f64, f64),
) -> Result<RasterGrid> {
    let resolved = io.resolve(path);
    let (grid, metadata) = io
        .read(path)
        .with_context(|| format!("reading {} raster {}", name, resolved.display()))?;
    info!(
        raster = name,
        driver = %metadata.driver,
        cell_type = %metadata.cell_type,
        nodata = ?metadata.nodata,
        "Loaded {} raster",
        name
    );

    let resampled = resample(&grid, resolution)
        .with_context(|| format!("resampling {} raster {}", name, resolved.display()))?;
    info!(
        raster = name,
        rows = resampled.rows(),
        cols = resampled.cols(),
        "Resample complete. New shape: ({}, {})",
        resampled.rows(),
        resampled.cols()
    );
    Ok(resampled)
}

/// Read an existing category raster.
pub fn load_categories(io: &GridIo, path: &Path) -> Result<CategoryGrid> {
    let (grid, _) = io
        .read_as::<u8>(path)
        .with_context(|| format!("reading category raster {}", io.resolve(path).display()))?;
    Ok(grid)
}

/// Render an existing category raster to a PNG.
pub fn render_file(io: &GridIo, raster: &Path, png: &Path) -> Result<PathBuf> {
    let categories = load_categories(io, raster)?;
    let image = render(&categories)
        .with_context(|| format!("rendering {}", io.resolve(raster).display()))?;
    let out = io.resolve(png);
    image
        .save(&out)
        .with_context(|| format!("writing hazard image {}", out.display()))?;
    Ok(out)
}
