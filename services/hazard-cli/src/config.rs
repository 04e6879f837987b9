//! Pipeline configuration.
//!
//! Layers, later ones winning:
//! 1. [`PipelineConfig::default`]
//! 2. a YAML file (`--config`)
//! 3. environment variables (`HAZARD_DATA_DIR`, `HAZARD_RESOLUTION`,
//!    `HAZARD_OUTPUT_MODE`, `HAZARD_DRIVER`)
//! 4. command-line flags

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hazard_grid::Driver;
use serde::{Deserialize, Serialize};

/// Whether pipeline artifacts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Report to the console only.
    View,
    /// Write the category raster and the colour image.
    #[default]
    Save,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "view" => Some(Self::View),
            "save" => Some(Self::Save),
            _ => None,
        }
    }

    pub fn persists(&self) -> bool {
        matches!(self, Self::Save)
    }
}

/// Configuration of one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base directory for relative input and output paths.
    pub data_dir: PathBuf,

    /// Target cell size `(x, y)` in CRS units.
    pub resolution: (f64, f64),

    pub mode: OutputMode,

    /// Driver of the output category raster.
    pub driver: Driver,

    /// Flood depth raster (metres).
    pub depth: PathBuf,

    /// Flood velocity raster (metres per second).
    pub velocity: PathBuf,

    pub output_raster: PathBuf,

    pub output_image: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            resolution: (1.0, 1.0),
            mode: OutputMode::Save,
            driver: Driver::GTiff,
            depth: PathBuf::from("task1/inputs/Flood_depth_metres.tif"),
            velocity: PathBuf::from("task1/inputs/Flood_velocity_metres_per_second.tif"),
            output_raster: PathBuf::from("task1/outputs/Flood_vulnerability_classification.tif"),
            output_image: PathBuf::from(
                "task1/outputs/Flood_vulnerability_classification_Colormap.png",
            ),
        }
    }
}

impl PipelineConfig {
    /// Load from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Defaults, then the optional YAML file, then the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `HAZARD_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("HAZARD_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("HAZARD_RESOLUTION") {
            self.resolution = parse_resolution(&value)
                .map_err(anyhow::Error::msg)
                .context("invalid HAZARD_RESOLUTION")?;
        }
        if let Some(value) = lookup("HAZARD_OUTPUT_MODE") {
            self.mode = match OutputMode::parse(&value) {
                Some(mode) => mode,
                None => bail!("invalid HAZARD_OUTPUT_MODE '{}': expected view or save", value),
            };
        }
        if let Some(value) = lookup("HAZARD_DRIVER") {
            self.driver = parse_driver(&value)
                .map_err(anyhow::Error::msg)
                .context("invalid HAZARD_DRIVER")?;
        }
        Ok(())
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let (x, y) = self.resolution;
        if !(x.is_finite() && y.is_finite()) || x <= 0.0 || y <= 0.0 {
            bail!("resolution must be positive, got ({}, {})", x, y);
        }
        for (name, path) in [
            ("data_dir", &self.data_dir),
            ("depth", &self.depth),
            ("velocity", &self.velocity),
            ("output_raster", &self.output_raster),
            ("output_image", &self.output_image),
        ] {
            if path.as_os_str().is_empty() {
                bail!("{} must not be empty", name);
            }
        }
        Ok(())
    }

    /// Output raster path with the extension of the configured driver.
    pub fn output_raster_path(&self) -> PathBuf {
        self.output_raster.with_extension(self.driver.extension())
    }
}

/// Parse `"x,y"` or a single `"x"` for square cells.
pub fn parse_resolution(s: &str) -> std::result::Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let number = |p: &str| {
        p.parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", p))
    };
    match parts.as_slice() {
        [x] => {
            let x = number(x)?;
            Ok((x, x))
        }
        [x, y] => Ok((number(x)?, number(y)?)),
        _ => Err(format!("expected 'x,y', got '{}'", s)),
    }
}

/// Parse a raster driver name.
pub fn parse_driver(s: &str) -> std::result::Result<Driver, String> {
    Driver::parse(s).ok_or_else(|| format!("unknown driver '{}': expected GTiff or AAIGrid", s))
}
