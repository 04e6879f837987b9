//! Core types for geo-referenced raster grids.

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::error::{GridError, Result};
use crate::transform::AffineTransform;

/// Storage type of raster cells on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    U8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Whether the type holds integers.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raster file driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Driver {
    /// GeoTIFF.
    #[default]
    #[serde(rename = "GTiff", alias = "gtiff")]
    GTiff,
    /// ESRI ASCII grid with a `.prj` sidecar.
    #[serde(rename = "AAIGrid", alias = "aaigrid")]
    AAIGrid,
}

impl Driver {
    /// Parse a driver name (case-insensitive, GDAL short names).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gtiff" | "geotiff" | "tif" | "tiff" => Some(Self::GTiff),
            "aaigrid" | "asc" | "ascii" => Some(Self::AAIGrid),
            _ => None,
        }
    }

    /// GDAL short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GTiff => "GTiff",
            Self::AAIGrid => "AAIGrid",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::GTiff => "tif",
            Self::AAIGrid => "asc",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cell sample type that can live in a [`Raster`].
pub trait RasterSample: Copy + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// The on-disk type this sample is written as.
    const CELL_TYPE: CellType;

    fn to_f64(self) -> f64;

    /// Convert from f64, saturating for integer types.
    fn from_f64(value: f64) -> Self;

    /// Whether the value is NaN (always false for integers).
    fn is_nan(self) -> bool {
        false
    }
}

impl RasterSample for f32 {
    const CELL_TYPE: CellType = CellType::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

impl RasterSample for u8 {
    const CELL_TYPE: CellType = CellType::U8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

/// A single-band raster held in memory.
///
/// Cells are stored row-major, top row first. Grids are built once and not
/// mutated afterwards; every processing stage returns a new raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    transform: AffineTransform,
    crs: Crs,
    nodata: Option<T>,
}

/// Floating-point measurement grid (flood depth, flood velocity).
pub type RasterGrid = Raster<f32>;

impl<T: RasterSample> Raster<T> {
    /// Create a raster, checking that `data` holds `rows * cols` cells.
    pub fn new(
        data: Vec<T>,
        rows: usize,
        cols: usize,
        transform: AffineTransform,
        crs: Crs,
        nodata: Option<T>,
    ) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(GridError::InvalidGrid(format!(
                "{} cells supplied for a {}x{} grid",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            data,
            rows,
            cols,
            transform,
            crs,
            nodata,
        })
    }

    /// Replace the nodata sentinel.
    pub fn with_nodata(mut self, nodata: Option<T>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Replace the CRS.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Absolute cell size `(x, y)`.
    pub fn resolution(&self) -> (f64, f64) {
        self.transform.resolution()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Slice of one row.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Whether `value` marks a missing measurement in this grid.
    #[inline]
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nan() || self.nodata == Some(value)
    }

    /// Fail with `ShapeMismatch` unless `other` is cell-for-cell aligned
    /// with this grid (same shape and transform).
    pub fn ensure_aligned<U: RasterSample>(&self, other: &Raster<U>) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(GridError::shape_mismatch(
                format!("{}x{}", self.rows, self.cols),
                format!("{}x{}", other.rows(), other.cols()),
            ));
        }
        if self.transform != *other.transform() {
            return Err(GridError::shape_mismatch(
                self.transform.to_string(),
                other.transform().to_string(),
            ));
        }
        Ok(())
    }

    /// Build a grid with the same georeferencing from new cell values.
    pub fn derive<U: RasterSample>(&self, data: Vec<U>, nodata: Option<U>) -> Result<Raster<U>> {
        Raster::new(
            data,
            self.rows,
            self.cols,
            self.transform,
            self.crs.clone(),
            nodata,
        )
    }

    /// Metadata describing this grid as written by `driver`.
    pub fn metadata(&self, driver: Driver) -> Metadata {
        Metadata {
            driver,
            crs: self.crs.clone(),
            cell_type: T::CELL_TYPE,
            nodata: self.nodata.map(RasterSample::to_f64),
            rows: self.rows,
            cols: self.cols,
            transform: self.transform,
        }
    }
}

/// Descriptive metadata of a raster file.
///
/// Carries enough to write an output file with matching characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub driver: Driver,
    pub crs: Crs,
    /// Cell type as stored in the file.
    pub cell_type: CellType,
    pub nodata: Option<f64>,
    pub rows: usize,
    pub cols: usize,
    pub transform: AffineTransform,
}
