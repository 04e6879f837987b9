//! Hazard categories.

use serde::{Deserialize, Serialize};

/// Flood hazard category, ordered by severity.
///
/// `H1` is generally safe; `H6` is unsafe for vehicles, people and
/// buildings. `NoData` marks cells where depth or velocity was missing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum HazardCategory {
    NoData = 0,
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl HazardCategory {
    /// The six real categories, least severe first.
    pub const ALL: [HazardCategory; 6] = [
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
    ];

    /// Cell value written to category rasters.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Category for a raster cell value, `None` outside `0..=6`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NoData),
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoData => "NoData",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
        }
    }

    /// Short description of who the water is dangerous to.
    pub fn description(self) -> &'static str {
        match self {
            Self::NoData => "no depth or velocity data",
            Self::H1 => "generally safe for vehicles, people and buildings",
            Self::H2 => "unsafe for small vehicles",
            Self::H3 => "unsafe for vehicles, children and the elderly",
            Self::H4 => "unsafe for vehicles and people",
            Self::H5 => "unsafe for vehicles and people; buildings require special engineering",
            Self::H6 => "unsafe for vehicles, people and all buildings",
        }
    }

    pub fn is_nodata(self) -> bool {
        self == Self::NoData
    }
}

impl std::fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<HazardCategory> for u8 {
    fn from(category: HazardCategory) -> Self {
        category.code()
    }
}
