//! Minimal PNG encoder.
//!
//! Two encodings are supported:
//! - **Indexed PNG (color type 3)**: one byte per pixel plus a PLTE/tRNS
//!   palette. Used for category images, where the cell code is the index.
//! - **RGBA PNG (color type 6)**: four bytes per pixel.

use std::io::Write;

use crate::error::{RenderError, Result};
use crate::palette::Color;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
pub const MAX_PALETTE_SIZE: usize = 256;

/// Create an indexed PNG (color type 3) from palette and indices.
///
/// A tRNS chunk is written when any palette entry is not fully opaque.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[Color],
    indices: &[u8],
) -> Result<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }
    check_len(indices.len(), width * height, "palette indices")?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3)?);

    let plte_data: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS may stop after the last non-opaque entry
    if let Some(last) = palette.iter().rposition(|c| c.a < 255) {
        let trns_data: Vec<u8> = palette[..=last].iter().map(|c| c.a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from RGBA pixel data (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    check_len(pixels.len(), width * height * 4, "RGBA bytes")?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6)?);

    let idat_data = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_len(actual: usize, expected: usize, what: &str) -> Result<()> {
    if actual != expected {
        return Err(RenderError::Encode(format!(
            "expected {} {}, got {}",
            expected, what, actual
        )));
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Result<Vec<u8>> {
    let to_u32 = |v: usize| {
        u32::try_from(v)
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| RenderError::Encode(format!("invalid image dimension {}", v)))
    };

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&to_u32(width)?.to_be_bytes());
    ihdr_data.extend_from_slice(&to_u32(height)?.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    Ok(ihdr_data)
}

/// Deflate image rows for the IDAT chunk, prefixing each with filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
