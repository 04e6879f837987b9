//! Flood hazard classification CLI.
//!
//! Resamples flood depth and velocity rasters to a common resolution,
//! classifies every cell into hazard categories H1..H6 and writes the
//! result as a geo-referenced raster plus a colour-mapped PNG.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hazard_classifier::CategoryStats;
use hazard_cli::config::{parse_driver, parse_resolution};
use hazard_cli::pipeline::{load_categories, render_file};
use hazard_cli::{pipeline, OutputMode, PipelineConfig, Report};
use hazard_grid::{Driver, GridIo};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hazard")]
#[command(about = "Flood hazard vulnerability classification")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base directory for relative paths
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: resample, classify, write outputs
    Classify {
        /// Flood depth raster (metres)
        #[arg(long)]
        depth: Option<PathBuf>,

        /// Flood velocity raster (metres per second)
        #[arg(long)]
        velocity: Option<PathBuf>,

        /// Target cell size as "x,y" (or "x" for square cells)
        #[arg(short, long, value_parser = parse_resolution)]
        resolution: Option<(f64, f64)>,

        /// Persist outputs or only report them
        #[arg(short, long, value_enum)]
        mode: Option<OutputMode>,

        /// Output raster driver (GTiff or AAIGrid)
        #[arg(long, value_parser = parse_driver)]
        driver: Option<Driver>,

        /// Output category raster
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output PNG
        #[arg(long)]
        image: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-category counts and areas of a category raster
    Stats {
        raster: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a category raster to a PNG
    Render { raster: PathBuf, png: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    match args.command {
        Command::Classify {
            depth,
            velocity,
            resolution,
            mode,
            driver,
            output,
            image,
            json,
        } => {
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if let Some(velocity) = velocity {
                config.velocity = velocity;
            }
            if let Some(resolution) = resolution {
                config.resolution = resolution;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(driver) = driver {
                config.driver = driver;
            }
            if let Some(output) = output {
                config.output_raster = output;
            }
            if let Some(image) = image {
                config.output_image = image;
            }

            info!(
                data_dir = %config.data_dir.display(),
                resolution = ?config.resolution,
                mode = ?config.mode,
                driver = %config.driver,
                "Starting flood hazard classification"
            );

            let output = pipeline::run(&config)?;
            let report = Report::new(&output.stats, output.categories.shape());
            print_report(&report, json)?;

            if let Some(path) = &output.raster_path {
                info!(path = %path.display(), "Saved category raster");
            }
            if let Some(path) = &output.image_path {
                info!(path = %path.display(), "Saved hazard image");
            }
        }
        Command::Stats { raster, json } => {
            let io = GridIo::new(&config.data_dir);
            let categories = load_categories(&io, &raster)?;
            let report = Report::new(&CategoryStats::from_grid(&categories), categories.shape());
            print_report(&report, json)?;
        }
        Command::Render { raster, png } => {
            let io = GridIo::new(&config.data_dir);
            let path = render_file(&io, &raster, &png)?;
            info!(path = %path.display(), "Saved hazard image");
        }
    }

    Ok(())
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", report.format_json()?);
    } else {
        println!("{}", report.format_table());
    }
    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}
