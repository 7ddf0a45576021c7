//! Bounding box construction in the projected system.
//!
//! Two entry modes feed the upstream query:
//! - [`around`]: a WGS84 point plus a radius in projected metres
//! - [`from_wsen`]: a literal `west,south,east,north` string in WGS84

use crate::{BoundingBox, CoordinateSystem, GeoError, Reprojector, Result};
use busproxy_core::validation::is_valid_wsen;

/// Radius used when the caller does not supply one, in projected metres.
pub const DEFAULT_RADIUS: f64 = 1000.0;

/// Square box of half-side `radius` centred on (`lon`, `lat`).
///
/// The centre and the radius are each rounded to whole metres
/// (half away from zero), so the box is exactly `2 * radius.round()` wide
/// and high. A positive radius under half a metre still gets a 2 m box.
///
/// # Example
/// ```
/// use busproxy_geo::{bbox, Reprojector};
///
/// let b = bbox::around(Reprojector::global()?, 6.13, 49.61, 1000.0)?;
/// assert_eq!(b.width(), 2000.0);
/// assert_eq!(b.height(), 2000.0);
/// # Ok::<(), busproxy_geo::GeoError>(())
/// ```
pub fn around(reprojector: &Reprojector, lon: f64, lat: f64, radius: f64) -> Result<BoundingBox> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeoError::InvalidRadius(radius));
    }
    let half = radius.round().max(1.0);

    let centre = reprojector.to_projected(lon, lat)?;
    let (cx, cy) = (centre.x.round(), centre.y.round());

    BoundingBox::new(cx - half, cy - half, cx + half, cy + half, CoordinateSystem::Luref)
}

/// Box given by a literal `W,S,E,N` string in WGS84.
///
/// The string is checked against the WSEN grammar before anything is parsed.
/// All four corners are reprojected and the result is their envelope: grid
/// north diverges from true north away from the central meridian, so the
/// projected south-west corner alone is not the minimum.
pub fn from_wsen(reprojector: &Reprojector, wsen: &str) -> Result<BoundingBox> {
    let [west, south, east, north] = parse_wsen(wsen)?;

    if west > east || south > north {
        return Err(GeoError::InvalidBoundingBox(format!(
            "'{wsen}' is inverted; expected west <= east and south <= north"
        )));
    }

    let corners = [
        reprojector.to_projected(west, south)?,
        reprojector.to_projected(east, south)?,
        reprojector.to_projected(west, north)?,
        reprojector.to_projected(east, north)?,
    ];

    BoundingBox::enclosing(&corners)
}

/// Validates and splits a WSEN string into its four numbers.
pub fn parse_wsen(wsen: &str) -> Result<[f64; 4]> {
    if !is_valid_wsen(wsen) {
        return Err(GeoError::InvalidBoundingBox(format!(
            "'{wsen}' is not four comma-separated numbers (west,south,east,north)"
        )));
    }

    let mut values = [0.0; 4];
    for (slot, part) in values.iter_mut().zip(wsen.split(',')) {
        *slot = part
            .parse()
            .map_err(|_| GeoError::InvalidBoundingBox(format!("'{part}' is not a number")))?;
    }
    Ok(values)
}
