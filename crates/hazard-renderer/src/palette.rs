//! Fixed hazard colour palette and legend.

use hazard_classifier::HazardCategory;
use serde::Serialize;

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 139);
    pub const LIGHT_BLUE: Color = Color::rgb(173, 216, 230);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
    pub const LIGHT_GREEN: Color = Color::rgb(144, 238, 144);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Colours indexed by category code. Index 0 (nodata) is transparent.
pub const PALETTE: [Color; 7] = [
    Color::TRANSPARENT,
    Color::DARK_BLUE,
    Color::LIGHT_BLUE,
    Color::DARK_GREEN,
    Color::LIGHT_GREEN,
    Color::YELLOW,
    Color::RED,
];

/// Named colour of each palette entry.
const COLOR_NAMES: [&str; 7] = [
    "transparent",
    "darkblue",
    "lightblue",
    "darkgreen",
    "lightgreen",
    "yellow",
    "red",
];

/// Colour for a category.
pub fn color_for(category: HazardCategory) -> Color {
    PALETTE[category.code() as usize]
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: HazardCategory,
    pub label: &'static str,
    pub color: Color,
    pub color_name: &'static str,
}

/// Legend for H1..H6, least severe first.
pub fn legend() -> Vec<LegendEntry> {
    HazardCategory::ALL
        .into_iter()
        .map(|category| LegendEntry {
            category,
            label: category.label(),
            color: color_for(category),
            color_name: COLOR_NAMES[category.code() as usize],
        })
        .collect()
}
