//! ESRI ASCII grid (`AAIGrid`) driver.
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    1500000
//! yllcorner    5200000
//! cellsize     2
//! NODATA_value -9999
//! 0.1 0.2 0.3 0.4
//! ...
//! ```
//!
//! Rows are stored top row first. Non-square cells use `dx`/`dy` instead of
//! `cellsize`. The CRS lives in a `.prj` file next to the grid.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{format_nodata, parse_nodata, Band, DecodedRaster};
use crate::crs::Crs;
use crate::error::{GridError, Result};
use crate::transform::AffineTransform;
use crate::types::{Raster, RasterSample};

const HEADER_KEYS: &[&str] = &[
    "ncols",
    "nrows",
    "xllcorner",
    "yllcorner",
    "xllcenter",
    "yllcenter",
    "cellsize",
    "dx",
    "dy",
    "nodata_value",
];

/// Whether `header` looks like the start of an ASCII grid.
pub fn is_ascii_grid(header: &[u8]) -> bool {
    let text = String::from_utf8_lossy(header);
    let first = text
        .split_whitespace()
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    first == "ncols" || first == "nrows"
}

/// Path of the `.prj` sidecar for `path`.
pub fn prj_path(path: &Path) -> PathBuf {
    path.with_extension("prj")
}

#[derive(Debug, Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<f64>,
    yll: Option<f64>,
    center: bool,
    cellsize: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    nodata: Option<f64>,
}

/// Read an ASCII grid and its optional `.prj` sidecar.
pub fn read(path: &Path) -> Result<DecodedRaster> {
    let text = fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
    let bad = |msg: String| GridError::format(path, msg);

    let mut header = Header::default();
    let mut lines = text.lines().peekable();

    while let Some(&line) = lines.peek() {
        let mut parts = line.split_whitespace();
        let key = match parts.next() {
            Some(k) => k.to_lowercase(),
            None => {
                lines.next();
                continue;
            }
        };
        if !HEADER_KEYS.contains(&key.as_str()) {
            break;
        }
        let value = parts
            .next()
            .ok_or_else(|| bad(format!("header key '{}' has no value", key)))?;
        let number = |v: &str| -> Result<f64> {
            v.parse::<f64>()
                .map_err(|_| bad(format!("invalid value '{}' for '{}'", v, key)))
        };
        let dimension = |v: &str| -> Result<usize> {
            match v.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(bad(format!(
                    "'{}' must be a positive integer, got '{}'",
                    key, v
                ))),
            }
        };
        match key.as_str() {
            "ncols" => header.ncols = Some(dimension(value)?),
            "nrows" => header.nrows = Some(dimension(value)?),
            "xllcorner" => header.xll = Some(number(value)?),
            "yllcorner" => header.yll = Some(number(value)?),
            "xllcenter" => {
                header.xll = Some(number(value)?);
                header.center = true;
            }
            "yllcenter" => {
                header.yll = Some(number(value)?);
                header.center = true;
            }
            "cellsize" => header.cellsize = Some(number(value)?),
            "dx" => header.dx = Some(number(value)?),
            "dy" => header.dy = Some(number(value)?),
            "nodata_value" => header.nodata = parse_nodata(value),
            _ => {}
        }
        lines.next();
    }

    let cols = header.ncols.ok_or_else(|| bad("missing ncols".into()))?;
    let rows = header.nrows.ok_or_else(|| bad("missing nrows".into()))?;
    let xll = header.xll.ok_or_else(|| bad("missing xllcorner".into()))?;
    let yll = header.yll.ok_or_else(|| bad("missing yllcorner".into()))?;
    let dx = header.dx.or(header.cellsize).ok_or_else(|| bad("missing cellsize".into()))?;
    let dy = header.dy.or(header.cellsize).ok_or_else(|| bad("missing cellsize".into()))?;

    let (west, south) = if header.center {
        (xll - dx / 2.0, yll - dy / 2.0)
    } else {
        (xll, yll)
    };
    let transform = AffineTransform::from_origin(west, south + rows as f64 * dy, dx, dy);

    let cells = rows
        .checked_mul(cols)
        .ok_or_else(|| bad(format!("{}x{} grid is too large", rows, cols)))?;

    let mut integral = true;
    // Every cell token takes at least two bytes of text
    let mut values = Vec::with_capacity(cells.min(text.len() / 2 + 1));
    for token in lines.flat_map(str::split_whitespace) {
        if integral && token.contains(['.', 'e', 'E', 'n', 'N', 'i', 'I']) {
            integral = false;
        }
        let value = token
            .parse::<f64>()
            .map_err(|_| bad(format!("invalid cell value '{}'", token)))?;
        values.push(value);
    }

    if values.len() != cells {
        return Err(bad(format!(
            "found {} cell values for a {}x{} grid",
            values.len(),
            rows,
            cols
        )));
    }

    let band = match integral.then(|| as_i32(&values)).flatten() {
        Some(ints) => Band::I32(ints),
        None if integral => Band::F64(values),
        None => Band::F32(values.into_iter().map(|v| v as f32).collect()),
    };

    let prj = prj_path(path);
    let crs = match fs::read_to_string(&prj) {
        Ok(body) => Crs::new(body),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Crs::unknown(),
        Err(e) => return Err(GridError::io(&prj, e)),
    };

    debug!(path = %path.display(), rows, cols, "Decoded ASCII grid");

    Ok(DecodedRaster {
        band,
        rows,
        cols,
        transform,
        crs,
        nodata: header.nodata,
    })
}

/// Integer cells as `i32`, or `None` if any falls outside its range.
fn as_i32(values: &[f64]) -> Option<Vec<i32>> {
    values
        .iter()
        .map(|&v| {
            if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
                Some(v as i32)
            } else {
                None
            }
        })
        .collect()
}

/// Write an ASCII grid, plus a `.prj` sidecar when the CRS is known.
pub fn write<T: RasterSample>(path: &Path, grid: &Raster<T>) -> Result<()> {
    let t = grid.transform();
    if t.cell_height > 0.0 || t.cell_width < 0.0 {
        return Err(GridError::format(
            path,
            "ASCII grids require a north-up transform",
        ));
    }
    let (dx, dy) = t.resolution();
    let (west, south, _, _) = t.bounds(grid.rows(), grid.cols());

    let file = fs::File::create(path).map_err(|e| GridError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let io_err = |e| GridError::io(path, e);

    writeln!(out, "ncols        {}", grid.cols()).map_err(io_err)?;
    writeln!(out, "nrows        {}", grid.rows()).map_err(io_err)?;
    writeln!(out, "xllcorner    {}", west).map_err(io_err)?;
    writeln!(out, "yllcorner    {}", south).map_err(io_err)?;
    if dx == dy {
        writeln!(out, "cellsize     {}", dx).map_err(io_err)?;
    } else {
        writeln!(out, "dx           {}", dx).map_err(io_err)?;
        writeln!(out, "dy           {}", dy).map_err(io_err)?;
    }
    if let Some(nodata) = grid.nodata() {
        writeln!(out, "NODATA_value {}", format_nodata(nodata.to_f64())).map_err(io_err)?;
    }

    let integer = T::CELL_TYPE.is_integer();
    for row in 0..grid.rows() {
        let line = grid
            .row(row)
            .iter()
            .map(|v| {
                let v = v.to_f64();
                if integer {
                    format!("{}", v as i64)
                } else {
                    format!("{:?}", v as f32)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    if !grid.crs().is_unknown() {
        let prj = prj_path(path);
        fs::write(&prj, grid.crs().as_str()).map_err(|e| GridError::io(&prj, e))?;
    }

    Ok(())
}
