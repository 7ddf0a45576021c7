//! WGS84 <-> LUREF reprojection.
//!
//! Both coordinate systems are parsed once, on first use, into a process-wide
//! [`Reprojector`] that is read-only afterwards and shared by every request.

use crate::{GeoError, GeoPoint, Result};
use once_cell::sync::OnceCell;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

/// EPSG code of the projected system used by the upstream search API.
pub const LUREF_EPSG: u16 = 2169;

/// PROJ.4 definition of EPSG:4326.
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// PROJ.4 definition of EPSG:2169 (Luxembourg 1930 / Gauss).
pub const LUREF_PROJ: &str = "+proj=tmerc +lat_0=49.8333333333333 +lon_0=6.16666666666667 +k=1 \
     +x_0=80000 +y_0=100000 +ellps=intl \
     +towgs84=-189.6806,18.3463,-42.7695,-0.33746,-3.09264,2.53861,0.4598 +units=m +no_defs";

/// Accepted WGS84 input, `(min_lon, min_lat, max_lon, max_lat)`.
///
/// Generous around the country; anything outside is not a plausible query.
pub const GEOGRAPHIC_EXTENT: (f64, f64, f64, f64) = (2.0, 47.0, 10.5, 52.5);

/// Accepted LUREF input, `(min_x, min_y, max_x, max_y)` in metres.
pub const PROJECTED_EXTENT: (f64, f64, f64, f64) = (-250_000.0, -250_000.0, 450_000.0, 450_000.0);

static GLOBAL: OnceCell<Reprojector> = OnceCell::new();

/// Converts single coordinate pairs between WGS84 and LUREF.
#[derive(Clone)]
pub struct Reprojector {
    wgs84: Proj,
    luref: Proj,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("geographic", &"EPSG:4326")
            .field("projected", &format_args!("EPSG:{LUREF_EPSG}"))
            .finish()
    }
}

impl Reprojector {
    /// Parses both system definitions.
    pub fn new() -> Result<Self> {
        Ok(Self {
            wgs84: parse_definition("EPSG:4326", WGS84_PROJ)?,
            luref: parse_definition("EPSG:2169", LUREF_PROJ)?,
        })
    }

    /// The shared instance, built on first call.
    pub fn global() -> Result<&'static Self> {
        GLOBAL.get_or_try_init(Self::new)
    }

    /// WGS84 longitude/latitude (degrees) to LUREF easting/northing (metres).
    pub fn to_projected(&self, lon: f64, lat: f64) -> Result<GeoPoint> {
        check_extent("longitude/latitude", lon, lat, GEOGRAPHIC_EXTENT)?;

        // proj4rs takes geographic input in radians
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.wgs84, &self.luref, &mut point).map_err(|e| {
            GeoError::Reprojection(format!("({lon}, {lat}) to EPSG:{LUREF_EPSG}: {e:?}"))
        })?;

        finite_or_err(GeoPoint::luref(point.0, point.1), lon, lat)
    }

    /// LUREF easting/northing (metres) to WGS84 longitude/latitude (degrees).
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<GeoPoint> {
        check_extent("easting/northing", x, y, PROJECTED_EXTENT)?;

        let mut point = (x, y, 0.0);
        transform(&self.luref, &self.wgs84, &mut point).map_err(|e| {
            GeoError::Reprojection(format!("({x}, {y}) from EPSG:{LUREF_EPSG}: {e:?}"))
        })?;

        finite_or_err(GeoPoint::wgs84(point.0.to_degrees(), point.1.to_degrees()), x, y)
    }
}

fn parse_definition(name: &'static str, definition: &str) -> Result<Proj> {
    Proj::from_proj_string(definition).map_err(|e| GeoError::Definition {
        name,
        reason: format!("{e:?}"),
    })
}

fn check_extent(what: &str, a: f64, b: f64, extent: (f64, f64, f64, f64)) -> Result<()> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(GeoError::Reprojection(format!("{what} ({a}, {b}) is not finite")));
    }
    let (min_a, min_b, max_a, max_b) = extent;
    if a < min_a || a > max_a || b < min_b || b > max_b {
        return Err(GeoError::Reprojection(format!(
            "{what} ({a}, {b}) is outside the supported area"
        )));
    }
    Ok(())
}

fn finite_or_err(point: GeoPoint, a: f64, b: f64) -> Result<GeoPoint> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(GeoError::Reprojection(format!("({a}, {b}) has no finite image")))
    }
}
