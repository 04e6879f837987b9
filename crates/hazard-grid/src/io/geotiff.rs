//! GeoTIFF driver.
//!
//! Georeferencing is stored with the standard GeoTIFF tags:
//!
//! | Tag | Id | Content |
//! |---|---|---|
//! | ModelPixelScale | 33550 | `[sx, sy, 0]` |
//! | ModelTiepoint | 33922 | `[0, 0, 0, x0, y0, 0]` (top-left corner) |
//! | ModelTransformation | 34264 | 4x4 matrix, used when `sy > 0` |
//! | GeoKeyDirectory | 34735 | model type, raster type, EPSG code |
//! | GeoAsciiParams | 34737 | citation for non-EPSG CRS strings |
//! | GDAL_NODATA | 42113 | nodata value as ASCII |

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;

use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::{ColorType, TiffResult};
use tracing::debug;

use super::{format_nodata, parse_nodata, Band, DecodedRaster};
use crate::crs::Crs;
use crate::error::{GridError, Result};
use crate::transform::AffineTransform;
use crate::types::{CellType, Raster, RasterSample};

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GEO_ASCII_PARAMS: Tag = Tag::GeoAsciiParamsTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

// GeoKey ids and values (GeoTIFF 1.0, section 6.3)
const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GT_CITATION: u16 = 1026;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const USER_DEFINED: u16 = 32767;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Whether `header` starts with a classic or BigTIFF signature.
pub fn is_tiff(header: &[u8]) -> bool {
    matches!(
        header.get(..4),
        Some(b"II*\0") | Some(b"MM\0*") | Some(b"II+\0") | Some(b"MM\0+")
    )
}

/// Read the first image of a GeoTIFF.
pub fn read(path: &Path) -> Result<DecodedRaster> {
    let tiff_err = |e| GridError::from_tiff(path, e);

    let file = File::open(path).map_err(|e| GridError::io(path, e))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(tiff_err)?
        .with_limits(Limits::unlimited());

    match decoder.colortype().map_err(tiff_err)? {
        ColorType::Gray(_) => {}
        other => {
            return Err(GridError::format(
                path,
                format!("expected a single-band raster, found {:?}", other),
            ))
        }
    }

    let (width, height) = decoder.dimensions().map_err(tiff_err)?;
    let (cols, rows) = (width as usize, height as usize);

    let geo_keys = read_geo_keys(&mut decoder).map_err(tiff_err)?;
    let mut transform = read_transform(&mut decoder).map_err(tiff_err)?;
    if geo_keys.pixel_is_point {
        // Tiepoint names the centre of cell (0, 0); shift to its outer corner
        transform.origin_x -= transform.cell_width / 2.0;
        transform.origin_y -= transform.cell_height / 2.0;
    }
    let crs = geo_keys.crs;
    let nodata = match decoder.find_tag(GDAL_NODATA).map_err(tiff_err)? {
        Some(Value::Ascii(text)) => parse_nodata(&text),
        _ => None,
    };

    let band = match decoder.read_image().map_err(tiff_err)? {
        DecodingResult::U8(v) => Band::U8(v),
        DecodingResult::U16(v) => Band::U16(v),
        DecodingResult::I8(v) => Band::I16(v.into_iter().map(i16::from).collect()),
        DecodingResult::I16(v) => Band::I16(v),
        DecodingResult::I32(v) => Band::I32(v),
        DecodingResult::U32(v) => Band::F64(v.into_iter().map(f64::from).collect()),
        DecodingResult::F32(v) => Band::F32(v),
        DecodingResult::F64(v) => Band::F64(v),
        _ => {
            return Err(GridError::format(path, "unsupported 64-bit integer samples"));
        }
    };

    if band.len() != rows * cols {
        return Err(GridError::format(
            path,
            format!("decoded {} samples for a {}x{} image", band.len(), rows, cols),
        ));
    }

    debug!(path = %path.display(), rows, cols, transform = %transform, "Decoded GeoTIFF");

    Ok(DecodedRaster {
        band,
        rows,
        cols,
        transform,
        crs,
        nodata,
    })
}

fn find_f64s<R: std::io::Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> TiffResult<Option<Vec<f64>>> {
    match decoder.find_tag(tag)? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

fn read_transform<R: std::io::Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<AffineTransform> {
    let scale = find_f64s(decoder, MODEL_PIXEL_SCALE)?;
    let tiepoint = find_f64s(decoder, MODEL_TIEPOINT)?;

    if let (Some(scale), Some(tie)) = (&scale, &tiepoint) {
        if scale.len() >= 2 && tie.len() >= 6 {
            let (sx, sy) = (scale[0], scale[1]);
            // Tiepoint maps raster (i, j) to model (x, y)
            let origin_x = tie[3] - tie[0] * sx;
            let origin_y = tie[4] + tie[1] * sy;
            return Ok(AffineTransform::new(origin_x, origin_y, sx, -sy));
        }
    }

    if let Some(m) = find_f64s(decoder, MODEL_TRANSFORMATION)? {
        if m.len() >= 8 {
            return Ok(AffineTransform::new(m[3], m[7], m[0], m[5]));
        }
    }

    // GDAL's default geotransform for ungeoreferenced images
    Ok(AffineTransform::new(0.0, 0.0, 1.0, 1.0))
}

/// What the reader takes from the GeoKeyDirectory.
#[derive(Debug)]
struct GeoKeys {
    crs: Crs,
    pixel_is_point: bool,
}

fn read_geo_keys<R: std::io::Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<GeoKeys> {
    let keys = match decoder.find_tag(GEO_KEY_DIRECTORY)? {
        Some(value) => value.into_u16_vec()?,
        None => {
            return Ok(GeoKeys {
                crs: Crs::unknown(),
                pixel_is_point: false,
            })
        }
    };
    let ascii = match decoder.find_tag(GEO_ASCII_PARAMS)? {
        Some(Value::Ascii(text)) => Some(text),
        _ => None,
    };

    let mut epsg = None;
    let mut citation = None;
    let mut pixel_is_point = false;

    // Header is [version, revision, minor, count], then 4-short entries
    for entry in keys.get(4..).unwrap_or(&[]).chunks_exact(4) {
        let (key, location, count, value) = (entry[0], entry[1], entry[2], entry[3]);
        match key {
            GT_RASTER_TYPE if location == 0 => {
                pixel_is_point = value == RASTER_PIXEL_IS_POINT;
            }
            PROJECTED_CS_TYPE | GEOGRAPHIC_TYPE if location == 0 && value != USER_DEFINED => {
                epsg = Some(value);
            }
            GT_CITATION if location == 34737 => {
                if let Some(text) = &ascii {
                    let start = value as usize;
                    let end = (start + count as usize).min(text.len());
                    citation = text
                        .get(start..end)
                        .map(|s| s.trim_end_matches(['|', '\0']).to_string());
                }
            }
            _ => {}
        }
    }

    let crs = match (epsg, citation) {
        (Some(code), _) => Crs::epsg(code),
        (None, Some(text)) if !text.is_empty() => Crs::new(text),
        _ => Crs::unknown(),
    };
    Ok(GeoKeys {
        crs,
        pixel_is_point,
    })
}

/// Write a single-band GeoTIFF.
pub fn write<T: RasterSample>(path: &Path, grid: &Raster<T>) -> Result<()> {
    let tiff_err = |e| GridError::from_tiff(path, e);

    let file = File::create(path).map_err(|e| GridError::io(path, e))?;
    let mut tiff = TiffEncoder::new(BufWriter::new(file)).map_err(tiff_err)?;
    let tags = GeoTags::for_grid(grid);
    let dimension = |n: usize| {
        u32::try_from(n).map_err(|_| {
            GridError::format(path, format!("{} cells exceed the TIFF dimension limit", n))
        })
    };
    let (rows, cols) = (dimension(grid.rows())?, dimension(grid.cols())?);

    match T::CELL_TYPE {
        CellType::U8 => {
            let data: Vec<u8> = grid.data().iter().map(|v| u8::from_f64(v.to_f64())).collect();
            let mut image = tiff.new_image::<colortype::Gray8>(cols, rows).map_err(tiff_err)?;
            tags.write(image.encoder()).map_err(tiff_err)?;
            image.write_data(&data).map_err(tiff_err)?;
        }
        CellType::F32 => {
            let data: Vec<f32> = grid.data().iter().map(|v| v.to_f64() as f32).collect();
            let mut image = tiff
                .new_image::<colortype::Gray32Float>(cols, rows)
                .map_err(tiff_err)?;
            tags.write(image.encoder()).map_err(tiff_err)?;
            image.write_data(&data).map_err(tiff_err)?;
        }
        _ => {
            let data: Vec<f64> = grid.data().iter().map(|v| v.to_f64()).collect();
            let mut image = tiff
                .new_image::<colortype::Gray64Float>(cols, rows)
                .map_err(tiff_err)?;
            tags.write(image.encoder()).map_err(tiff_err)?;
            image.write_data(&data).map_err(tiff_err)?;
        }
    }

    Ok(())
}

/// GeoTIFF tag payloads for one image.
struct GeoTags {
    pixel_scale: Option<[f64; 3]>,
    tiepoint: Option<[f64; 6]>,
    transformation: Option<[f64; 16]>,
    geo_keys: Vec<u16>,
    geo_ascii: Option<String>,
    nodata: Option<String>,
}

impl GeoTags {
    fn for_grid<T: RasterSample>(grid: &Raster<T>) -> Self {
        let t = grid.transform();

        // PixelScale can only express north-up rasters
        let (pixel_scale, tiepoint, transformation) = if t.cell_height < 0.0 && t.cell_width > 0.0 {
            (
                Some([t.cell_width, -t.cell_height, 0.0]),
                Some([0.0, 0.0, 0.0, t.origin_x, t.origin_y, 0.0]),
                None,
            )
        } else {
            (
                None,
                None,
                Some([
                    t.cell_width, 0.0, 0.0, t.origin_x,
                    0.0, t.cell_height, 0.0, t.origin_y,
                    0.0, 0.0, 0.0, 0.0,
                    0.0, 0.0, 0.0, 1.0,
                ]),
            )
        };

        let (geo_keys, geo_ascii) = geo_keys_for(grid.crs());

        Self {
            pixel_scale,
            tiepoint,
            transformation,
            geo_keys,
            geo_ascii,
            nodata: grid.nodata().map(|v| format_nodata(v.to_f64())),
        }
    }

    fn write<W: Write + Seek, K: TiffKind>(&self, dir: &mut DirectoryEncoder<'_, W, K>) -> TiffResult<()> {
        if let Some(scale) = &self.pixel_scale {
            dir.write_tag(MODEL_PIXEL_SCALE, &scale[..])?;
        }
        if let Some(tie) = &self.tiepoint {
            dir.write_tag(MODEL_TIEPOINT, &tie[..])?;
        }
        if let Some(matrix) = &self.transformation {
            dir.write_tag(MODEL_TRANSFORMATION, &matrix[..])?;
        }
        dir.write_tag(GEO_KEY_DIRECTORY, &self.geo_keys[..])?;
        if let Some(text) = &self.geo_ascii {
            dir.write_tag(GEO_ASCII_PARAMS, text.as_str())?;
        }
        if let Some(nodata) = &self.nodata {
            dir.write_tag(GDAL_NODATA, nodata.as_str())?;
        }
        Ok(())
    }
}

/// GeoKeyDirectory entries (sorted by key id) and GeoAsciiParams for a CRS.
fn geo_keys_for(crs: &Crs) -> (Vec<u16>, Option<String>) {
    let mut entries: Vec<[u16; 4]> = Vec::new();
    let mut ascii = None;

    match crs.epsg_code() {
        Some(code) if crs.is_geographic() => {
            entries.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_GEOGRAPHIC]);
            entries.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
            entries.push([GEOGRAPHIC_TYPE, 0, 1, code]);
        }
        Some(code) => {
            entries.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED]);
            entries.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
            entries.push([PROJECTED_CS_TYPE, 0, 1, code]);
        }
        None if !crs.is_unknown() => {
            let text = format!("{}|", crs.as_str());
            entries.push([GT_MODEL_TYPE, 0, 1, USER_DEFINED]);
            entries.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
            entries.push([GT_CITATION, 34737, text.len() as u16, 0]);
            ascii = Some(text);
        }
        None => {
            entries.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
        }
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.iter().flatten());
    (keys, ascii)
}
