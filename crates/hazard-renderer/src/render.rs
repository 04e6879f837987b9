//! Category grid to image.

use std::path::Path;

use hazard_classifier::CategoryGrid;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::palette::{Color, PALETTE};
use crate::png;

/// A rendered category grid: one palette index per pixel.
///
/// Pixels follow the grid's row-major order. No georeferencing is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryImage {
    width: usize,
    height: usize,
    indices: Vec<u8>,
}

/// Render `grid` with the fixed hazard palette.
///
/// Fails with [`RenderError::Invariant`] if any cell holds a code outside
/// `0..=6`. Nodata cells (`0`) become transparent pixels.
pub fn render(grid: &CategoryGrid) -> Result<CategoryImage> {
    let data = grid.data();
    if let Some(index) = data
        .par_iter()
        .position_first(|&code| code as usize >= PALETTE.len())
    {
        let cols = grid.cols();
        return Err(RenderError::Invariant {
            code: data[index],
            row: index / cols,
            col: index % cols,
        });
    }

    debug!(rows = grid.rows(), cols = grid.cols(), "Rendered category grid");

    Ok(CategoryImage {
        width: grid.cols(),
        height: grid.rows(),
        indices: data.to_vec(),
    })
}

impl CategoryImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Palette index per pixel, equal to the category code.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Colour of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.indices
            .get(y * self.width + x)
            .map(|&i| PALETTE[i as usize])
    }

    /// RGBA bytes, four per pixel.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut pixels = vec![0u8; self.indices.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(self.indices.par_iter())
            .for_each(|(px, &i)| px.copy_from_slice(&PALETTE[i as usize].to_array()));
        pixels
    }

    /// Encode as an indexed PNG using the hazard palette.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        png::create_png_indexed(self.width, self.height, &PALETTE, &self.indices)
    }

    /// Encode as an RGBA PNG.
    pub fn to_rgba_png(&self) -> Result<Vec<u8>> {
        png::create_png(&self.to_rgba(), self.width, self.height)
    }

    /// Write the indexed PNG to `path`. Parent directories are not created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_png()?;
        std::fs::write(path, &bytes).map_err(|e| RenderError::io(path, e))?;
        info!(
            path = %path.display(),
            width = self.width,
            height = self.height,
            bytes = bytes.len(),
            "Wrote hazard image"
        );
        Ok(())
    }
}
