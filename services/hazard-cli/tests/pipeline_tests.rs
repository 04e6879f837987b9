//! End-to-end pipeline tests against rasters written to a temp data dir.

use std::fs;
use std::path::Path;

use hazard_classifier::HazardCategory;
use hazard_cli::{pipeline, OutputMode, PipelineConfig, Report};
use hazard_grid::{AffineTransform, Crs, Driver, GridIo, Raster};
use test_utils::{
    grid::SMALL_4X4, hazard, require_test_files, temp_test_dir, temp_test_dir_with_prefix,
};

/// Write the 4x4 scenario as 2 m rasters under `task1/inputs`.
fn write_inputs(data_dir: &Path) {
    fs::create_dir_all(data_dir.join("task1/inputs")).unwrap();
    fs::create_dir_all(data_dir.join("task1/outputs")).unwrap();

    let io = GridIo::new(data_dir);
    let transform = AffineTransform::from_origin(
        SMALL_4X4.west,
        SMALL_4X4.north,
        SMALL_4X4.cell_size,
        SMALL_4X4.cell_size,
    );
    for (name, values) in [
        ("task1/inputs/Flood_depth_metres.tif", hazard::SCENARIO_DEPTH),
        (
            "task1/inputs/Flood_velocity_metres_per_second.tif",
            hazard::SCENARIO_VELOCITY,
        ),
    ] {
        let grid = Raster::new(values.to_vec(), 4, 4, transform, Crs::epsg(2193), Some(-9999.0))
            .unwrap();
        io.write(name, &grid, Driver::GTiff).unwrap();
    }
}

fn config(data_dir: &Path, mode: OutputMode) -> PipelineConfig {
    PipelineConfig {
        data_dir: data_dir.to_path_buf(),
        mode,
        ..PipelineConfig::default()
    }
}

#[test]
fn test_save_mode_writes_outputs() {
    let dir = temp_test_dir();
    write_inputs(dir.path());

    let output = pipeline::run(&config(dir.path(), OutputMode::Save)).unwrap();

    // 2 m cells resampled to 1 m
    assert_eq!(output.categories.shape(), (8, 8));
    assert_eq!(output.stats.total(), 64);

    let raster_path = output.raster_path.expect("raster written");
    let image_path = output.image_path.expect("image written");
    assert!(raster_path.ends_with("task1/outputs/Flood_vulnerability_classification.tif"));
    assert!(image_path.ends_with("task1/outputs/Flood_vulnerability_classification_Colormap.png"));

    let (written, meta) = GridIo::new(dir.path())
        .read_as::<u8>(&raster_path)
        .unwrap();
    assert_eq!(written.data(), output.categories.data());
    assert_eq!(meta.crs, Crs::epsg(2193));
    assert_eq!(meta.nodata, Some(0.0));
    assert_eq!(written.resolution(), (1.0, 1.0));

    let png = fs::read(&image_path).unwrap();
    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}

#[test]
fn test_native_resolution_keeps_scenario() {
    let dir = temp_test_dir();
    write_inputs(dir.path());

    let config = PipelineConfig {
        resolution: (2.0, 2.0),
        ..config(dir.path(), OutputMode::View)
    };
    let output = pipeline::run(&config).unwrap();

    assert_eq!(output.categories.data(), &hazard::SCENARIO_EXPECTED[..]);
    assert_eq!(output.stats.area(HazardCategory::H1), 4.0 * 4.0);
}

#[test]
fn test_view_mode_writes_nothing() {
    let dir = temp_test_dir();
    write_inputs(dir.path());

    let output = pipeline::run(&config(dir.path(), OutputMode::View)).unwrap();
    assert!(output.raster_path.is_none());
    assert!(output.image_path.is_none());
    assert_eq!(fs::read_dir(dir.path().join("task1/outputs")).unwrap().count(), 0);

    let report = Report::new(&output.stats, output.categories.shape());
    assert_eq!(report.rows.iter().map(|r| r.count).sum::<u64>(), 64);
}

#[test]
fn test_ascii_driver_output() {
    let dir = temp_test_dir();
    write_inputs(dir.path());

    let config = PipelineConfig {
        driver: Driver::AAIGrid,
        ..config(dir.path(), OutputMode::Save)
    };
    let output = pipeline::run(&config).unwrap();

    let raster_path = output.raster_path.unwrap();
    assert_eq!(raster_path.extension().and_then(|e| e.to_str()), Some("asc"));
    let (written, meta) = GridIo::new(dir.path()).read_as::<u8>(&raster_path).unwrap();
    assert_eq!(meta.driver, Driver::AAIGrid);
    assert_eq!(written.data(), output.categories.data());
}

#[test]
fn test_missing_input_reports_stage() {
    let dir = temp_test_dir();
    let err = pipeline::run(&config(dir.path(), OutputMode::View)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("reading depth raster"), "{}", message);
}

#[test]
fn test_missing_output_dir_fails() {
    let dir = temp_test_dir();
    write_inputs(dir.path());
    fs::remove_dir(dir.path().join("task1/outputs")).unwrap();

    let err = pipeline::run(&config(dir.path(), OutputMode::Save)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("writing category raster"), "{}", message);
}

#[test]
fn test_invalid_resolution_fails_validation() {
    let dir = temp_test_dir();
    write_inputs(dir.path());

    let config = PipelineConfig {
        resolution: (-1.0, 1.0),
        ..config(dir.path(), OutputMode::View)
    };
    assert!(pipeline::run(&config).is_err());
}

#[test]
fn test_render_file() {
    let dir = temp_test_dir();
    write_inputs(dir.path());
    let output = pipeline::run(&config(dir.path(), OutputMode::Save)).unwrap();

    let io = GridIo::new(dir.path());
    let png = pipeline::render_file(
        &io,
        &output.raster_path.unwrap(),
        Path::new("task1/outputs/rerendered.png"),
    )
    .unwrap();
    assert_eq!(fs::read(png).unwrap(), fs::read(output.image_path.unwrap()).unwrap());
}

#[test]
fn test_real_flood_rasters() {
    let paths = require_test_files!(
        "Flood_depth_metres.tif",
        "Flood_velocity_metres_per_second.tif",
    );
    let out = temp_test_dir_with_prefix("flood_real_");

    let config = PipelineConfig {
        data_dir: out.path().to_path_buf(),
        depth: paths[0].clone(),
        velocity: paths[1].clone(),
        output_raster: out.path().join("classification.tif"),
        output_image: out.path().join("classification.png"),
        ..PipelineConfig::default()
    };
    let output = pipeline::run(&config).unwrap();

    assert_eq!(output.categories.resolution(), (1.0, 1.0));
    assert_eq!(output.stats.invalid(), 0);
    assert_eq!(
        output.stats.total() as usize,
        output.categories.rows() * output.categories.cols()
    );
    assert!(output.stats.classified() > 0);
    assert!(out.path().join("classification.tif").exists());
    assert!(out.path().join("classification.png").exists());
}
