//! Image rendering for flood hazard category grids.
//!
//! - [`palette`]: the fixed H1..H6 colours and legend
//! - [`render`]: category grid to [`CategoryImage`]
//! - [`png`]: indexed and RGBA PNG encoding

pub mod error;
pub mod palette;
pub mod png;
pub mod render;

pub use error::{RenderError, Result};
pub use palette::{color_for, legend, Color, LegendEntry, PALETTE};
pub use render::{render, CategoryImage};
