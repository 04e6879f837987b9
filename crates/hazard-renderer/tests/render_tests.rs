//! Rendering tests: classified scenarios through to PNG bytes on disk.

use hazard_classifier::{classify, HazardCategory};
use hazard_grid::{AffineTransform, Crs, Raster, RasterGrid};
use hazard_renderer::{color_for, legend, render, Color, RenderError, PALETTE};
use test_utils::{grid::SMALL_4X4, hazard, temp_test_dir};

fn raster(data: &[f32]) -> RasterGrid {
    Raster::new(
        data.to_vec(),
        SMALL_4X4.rows,
        SMALL_4X4.cols,
        AffineTransform::from_origin(
            SMALL_4X4.west,
            SMALL_4X4.north,
            SMALL_4X4.cell_size,
            SMALL_4X4.cell_size,
        ),
        Crs::epsg(2193),
        Some(-9999.0),
    )
    .expect("valid test raster")
}

// ============================================================================
// Scenario rendering
// ============================================================================

#[test]
fn test_4x4_scenario_colours() {
    let categories = classify(
        &raster(&hazard::SCENARIO_DEPTH),
        &raster(&hazard::SCENARIO_VELOCITY),
    )
    .unwrap();
    let image = render(&categories).unwrap();

    for row in 0..4 {
        for col in 0..4 {
            let code = hazard::SCENARIO_EXPECTED[row * 4 + col];
            let category = HazardCategory::from_code(code).unwrap();
            assert_eq!(
                image.pixel(col, row),
                Some(color_for(category)),
                "pixel ({}, {})",
                col,
                row
            );
        }
    }

    assert_eq!(image.pixel(0, 0), Some(Color::DARK_BLUE));
    assert_eq!(image.pixel(0, 2), Some(Color::RED));
    assert_eq!(image.pixel(3, 3), Some(Color::YELLOW));
}

#[test]
fn test_nodata_cells_render_transparent() {
    let mut depth = hazard::SCENARIO_DEPTH;
    depth[5] = -9999.0;
    let categories = classify(&raster(&depth), &raster(&hazard::SCENARIO_VELOCITY)).unwrap();
    let image = render(&categories).unwrap();

    assert_eq!(image.pixel(1, 1), Some(Color::TRANSPARENT));
    assert_eq!(image.to_rgba()[5 * 4 + 3], 0);
}

#[test]
fn test_out_of_range_code_fails() {
    let categories = raster(&hazard::SCENARIO_DEPTH)
        .derive(vec![1u8, 2, 3, 4, 5, 6, 0, 1, 2, 3, 4, 5, 6, 42, 1, 1], Some(0))
        .unwrap();
    assert!(matches!(
        render(&categories),
        Err(RenderError::Invariant { code: 42, row: 3, col: 1 })
    ));
}

// ============================================================================
// PNG output
// ============================================================================

#[test]
fn test_png_signature_and_palette() {
    let categories = raster(&hazard::SCENARIO_DEPTH)
        .derive(hazard::SCENARIO_EXPECTED.to_vec(), Some(0))
        .unwrap();
    let png = render(&categories).unwrap().to_png().unwrap();

    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    // IHDR follows the signature: width, height, depth 8, colour type 3
    assert_eq!(&png[12..16], b"IHDR");
    assert_eq!(&png[16..20], &4u32.to_be_bytes());
    assert_eq!(&png[20..24], &4u32.to_be_bytes());
    assert_eq!(png[24], 8);
    assert_eq!(png[25], 3);

    let plte: Vec<u8> = PALETTE.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let plte_at = png
        .windows(4)
        .position(|w| w == b"PLTE")
        .expect("PLTE chunk");
    assert_eq!(&png[plte_at - 4..plte_at], &(plte.len() as u32).to_be_bytes());
    assert_eq!(&png[plte_at + 4..plte_at + 4 + plte.len()], &plte[..]);
    assert!(png.windows(4).any(|w| w == b"tRNS"));
}

#[test]
fn test_save_png() {
    let dir = temp_test_dir();
    let path = dir.path().join("hazard.png");
    let categories = raster(&hazard::SCENARIO_DEPTH)
        .derive(hazard::SCENARIO_EXPECTED.to_vec(), Some(0))
        .unwrap();
    let image = render(&categories).unwrap();

    image.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), image.to_png().unwrap());

    let missing = dir.path().join("missing/hazard.png");
    assert!(matches!(image.save(&missing), Err(RenderError::Io { .. })));
}

#[test]
fn test_rgba_png() {
    let categories = raster(&hazard::SCENARIO_DEPTH)
        .derive(hazard::SCENARIO_EXPECTED.to_vec(), Some(0))
        .unwrap();
    let image = render(&categories).unwrap();
    let rgba = image.to_rgba_png().unwrap();
    assert_eq!(rgba[25], 6);
    assert_eq!(image.to_rgba().len(), 4 * 4 * 4);
}

#[test]
fn test_legend_matches_palette() {
    for entry in legend() {
        assert_eq!(entry.color, PALETTE[entry.category.code() as usize]);
        assert_eq!(entry.label, entry.category.to_string());
    }
}
