//! Raster file I/O.
//!
//! [`GridIo`] reads single-band rasters into [`Raster`] values and writes
//! them back out. The driver for a read is detected from the file's leading
//! bytes rather than its extension:
//!
//! - **GTiff**: classic or BigTIFF, georeferenced with GeoTIFF tags
//! - **AAIGrid**: ESRI ASCII grid, CRS in a `.prj` sidecar
//!
//! Relative paths resolve against the data directory the `GridIo` was
//! constructed with; there is no process-wide data path.

pub mod ascii;
pub mod geotiff;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::crs::Crs;
use crate::error::{GridError, Result};
use crate::transform::AffineTransform;
use crate::types::{CellType, Driver, Metadata, Raster, RasterGrid, RasterSample};

/// Number of leading bytes inspected for format detection.
const SIGNATURE_LEN: usize = 64;

/// Reads and writes rasters relative to a data directory.
#[derive(Debug, Clone)]
pub struct GridIo {
    data_dir: PathBuf,
}

impl GridIo {
    /// Create a reader/writer rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve `path` against the data directory. Absolute paths are kept.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Read a single-band raster as `f32` cells.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<(RasterGrid, Metadata)> {
        self.read_as::<f32>(path)
    }

    /// Read a single-band raster, converting cells to `T`.
    pub fn read_as<T: RasterSample>(&self, path: impl AsRef<Path>) -> Result<(Raster<T>, Metadata)> {
        let path = self.resolve(path);
        let driver = detect_driver(&path)?;
        debug!(path = %path.display(), driver = %driver, "Reading raster");

        let decoded = match driver {
            Driver::GTiff => geotiff::read(&path)?,
            Driver::AAIGrid => ascii::read(&path)?,
        };

        let metadata = Metadata {
            driver,
            crs: decoded.crs.clone(),
            cell_type: decoded.band.cell_type(),
            nodata: decoded.nodata,
            rows: decoded.rows,
            cols: decoded.cols,
            transform: decoded.transform,
        };

        let nodata = decoded.nodata.map(T::from_f64);
        let grid = Raster::new(
            decoded.band.into_samples(),
            decoded.rows,
            decoded.cols,
            decoded.transform,
            decoded.crs,
            nodata,
        )?;

        info!(
            path = %path.display(),
            driver = %driver,
            rows = grid.rows(),
            cols = grid.cols(),
            crs = %grid.crs(),
            cell_type = %metadata.cell_type,
            "Read raster"
        );

        Ok((grid, metadata))
    }

    /// Write `grid` with `driver`, creating or overwriting the file.
    ///
    /// The header encodes the grid's shape, CRS and transform. Missing
    /// parent directories are not created. Returns the resolved path.
    pub fn write<T: RasterSample>(
        &self,
        path: impl AsRef<Path>,
        grid: &Raster<T>,
        driver: Driver,
    ) -> Result<PathBuf> {
        let path = self.resolve(path);
        match driver {
            Driver::GTiff => geotiff::write(&path, grid)?,
            Driver::AAIGrid => ascii::write(&path, grid)?,
        }
        info!(
            path = %path.display(),
            driver = %driver,
            rows = grid.rows(),
            cols = grid.cols(),
            cell_type = %T::CELL_TYPE,
            "Wrote raster"
        );
        Ok(path)
    }
}

/// Identify the raster driver from the file's leading bytes.
pub fn detect_driver(path: &Path) -> Result<Driver> {
    let mut file = File::open(path).map_err(|e| GridError::io(path, e))?;
    let mut header = Vec::with_capacity(SIGNATURE_LEN);
    file.by_ref()
        .take(SIGNATURE_LEN as u64)
        .read_to_end(&mut header)
        .map_err(|e| GridError::io(path, e))?;

    if header.is_empty() {
        return Err(GridError::format(path, "file is empty"));
    }
    if geotiff::is_tiff(&header) {
        return Ok(Driver::GTiff);
    }
    if ascii::is_ascii_grid(&header) {
        return Ok(Driver::AAIGrid);
    }
    Err(GridError::format(path, "unrecognized raster signature"))
}

/// Cell values of a decoded band in their on-disk type.
#[derive(Debug, Clone, PartialEq)]
pub enum Band {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Band {
    pub fn cell_type(&self) -> CellType {
        match self {
            Self::U8(_) => CellType::U8,
            Self::U16(_) => CellType::U16,
            Self::I16(_) => CellType::I16,
            Self::I32(_) => CellType::I32,
            Self::F32(_) => CellType::F32,
            Self::F64(_) => CellType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert every cell to `T`.
    pub fn into_samples<T: RasterSample>(self) -> Vec<T> {
        fn convert<S: Copy, T: RasterSample>(values: Vec<S>, f: impl Fn(S) -> f64) -> Vec<T> {
            values.into_iter().map(|v| T::from_f64(f(v))).collect()
        }
        match self {
            Self::U8(v) => convert(v, f64::from),
            Self::U16(v) => convert(v, f64::from),
            Self::I16(v) => convert(v, f64::from),
            Self::I32(v) => convert(v, f64::from),
            Self::F32(v) => convert(v, f64::from),
            Self::F64(v) => convert(v, |x| x),
        }
    }
}

/// A band plus the georeferencing read alongside it.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub band: Band,
    pub rows: usize,
    pub cols: usize,
    pub transform: AffineTransform,
    pub crs: Crs,
    pub nodata: Option<f64>,
}

/// Format a nodata value the way GDAL stores it (shortest round-trip text).
pub(crate) fn format_nodata(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{}", value)
    }
}

pub(crate) fn parse_nodata(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('\0').trim().parse::<f64>().ok()
}
