//! Geospatial utilities for busproxy.
//!
//! This crate provides:
//! - A [`GeoPoint`] / [`BoundingBox`] model tagged with its coordinate system
//! - Reprojection between WGS84 and LUREF (EPSG:2169)
//! - Bounding box construction from a point and radius, or a literal WSEN string
//!
//! # Example
//!
//! ```
//! use busproxy_geo::{bbox, Reprojector};
//!
//! let reprojector = Reprojector::global()?;
//! let around = bbox::around(reprojector, 6.13, 49.61, 500.0)?;
//! assert_eq!(around.width(), 1000.0);
//! # Ok::<(), busproxy_geo::GeoError>(())
//! ```

pub mod bbox;
mod error;
mod projection;

pub use error::{GeoError, Result};
pub use projection::{
    Reprojector, GEOGRAPHIC_EXTENT, LUREF_EPSG, LUREF_PROJ,
    PROJECTED_EXTENT, WGS84_PROJ,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference systems this proxy speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Geographic longitude/latitude in degrees
    Wgs84,
    /// Luxembourg 1930 / Gauss, metres
    Luref,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Wgs84 => write!(f, "EPSG:4326"),
            CoordinateSystem::Luref => write!(f, "EPSG:{LUREF_EPSG}"),
        }
    }
}

/// A coordinate pair interpreted under a single coordinate system.
///
/// For [`CoordinateSystem::Wgs84`], `x` is longitude and `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Easting or longitude
    pub x: f64,
    /// Northing or latitude
    pub y: f64,
    /// System both components belong to
    pub system: CoordinateSystem,
}

impl GeoPoint {
    /// Creates a WGS84 point.
    #[inline]
    pub fn wgs84(lon: f64, lat: f64) -> Self {
        Self { x: lon, y: lat, system: CoordinateSystem::Wgs84 }
    }

    /// Creates a LUREF point.
    #[inline]
    pub fn luref(x: f64, y: f64) -> Self {
        Self { x, y, system: CoordinateSystem::Luref }
    }

    /// Returns true if both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle in a stated coordinate system.
///
/// Always satisfies `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    system: CoordinateSystem,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting non-finite or inverted extents.
    ///
    /// Inverted input is an error, never swapped.
    pub fn new(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        system: CoordinateSystem,
    ) -> Result<Self> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(GeoError::InvalidBoundingBox("extents must be finite".to_string()));
        }
        if min_x > max_x {
            return Err(GeoError::InvalidBoundingBox(format!(
                "west edge {min_x} lies east of east edge {max_x}"
            )));
        }
        if min_y > max_y {
            return Err(GeoError::InvalidBoundingBox(format!(
                "south edge {min_y} lies north of north edge {max_y}"
            )));
        }
        Ok(Self { min_x, min_y, max_x, max_y, system })
    }

    /// Smallest box containing every point, all of which must share a system.
    pub fn enclosing(points: &[GeoPoint]) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(GeoError::InvalidBoundingBox("no points to enclose".to_string()));
        };
        if let Some(other) = points.iter().find(|p| p.system != first.system) {
            return Err(GeoError::InvalidBoundingBox(format!(
                "points in different systems ({} and {})",
                first.system, other.system
            )));
        }

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x, max_y, first.system)
    }

    /// West (or minimum x) edge.
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    /// South (or minimum y) edge.
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// East (or maximum x) edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// North (or maximum y) edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Coordinate system of all four extents.
    #[inline]
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// `max_x - min_x`
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// `max_y - min_y`
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Extents as `[min_x, min_y, max_x, max_y]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl fmt::Display for BoundingBox {
    /// `min_x,min_y,max_x,max_y`, the form query strings expect.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}
