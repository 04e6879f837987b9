//! Flood hazard pipeline: configuration, orchestration and reporting for
//! the `hazard` binary.

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{OutputMode, PipelineConfig};
pub use pipeline::{run, PipelineOutput};
pub use report::Report;
