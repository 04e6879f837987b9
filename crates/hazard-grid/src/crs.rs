//! Coordinate reference system identifiers carried by rasters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG codes treated as geographic (lat/lon) when writing GeoKeys.
const GEOGRAPHIC_EPSG: &[u16] = &[4326, 4269, 4258, 4167, 4283, 4617];

/// A CRS identifier.
///
/// Most rasters carry an `EPSG:<code>` authority code; anything else (a
/// WKT citation, a `.prj` body) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Crs(String);

impl Crs {
    /// Wrap a CRS string, normalising `epsg:NNNN` to `EPSG:NNNN`.
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        match parse_epsg(trimmed) {
            Some(code) => Self::epsg(code),
            None => Self(trimmed.to_string()),
        }
    }

    /// CRS from an EPSG authority code.
    pub fn epsg(code: u16) -> Self {
        Self(format!("EPSG:{}", code))
    }

    /// No CRS information.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    /// The EPSG code, if this CRS is an `EPSG:` identifier.
    pub fn epsg_code(&self) -> Option<u16> {
        parse_epsg(&self.0)
    }

    /// Whether the CRS is geographic (degrees) rather than projected.
    pub fn is_geographic(&self) -> bool {
        self.epsg_code()
            .map(|code| GEOGRAPHIC_EPSG.contains(&code))
            .unwrap_or(false)
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_epsg(s: &str) -> Option<u16> {
    let upper = s.to_uppercase();
    upper.strip_prefix("EPSG:")?.trim().parse().ok()
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Crs {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
