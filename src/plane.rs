//! Closed-form plane survey computations: joins, radiations, levels and
//! intersections of lines and circles of position.
//!
//! Bearings are whole-circle bearings clockwise from grid north. Degenerate
//! geometry (parallel lines, circles that do not meet) yields `None`.

use crate::angle::{normalize_radians, Angle};
use crate::error::AngleError;
use crate::point::{Point2d, Point3d};

/// Below this `|sin|` two directions are treated as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Distance and bearing from `from` to `to`.
///
/// Returns `(distance, bearing)` with the bearing in decimal degrees,
/// `0 <= bearing < 360`.
pub fn join2d(from: &Point2d, to: &Point2d) -> (f64, f64) {
    let delta_e = to.x - from.x;
    let delta_n = to.y - from.y;
    let distance = delta_e.hypot(delta_n);
    let bearing = normalize_radians(delta_e.atan2(delta_n)).to_degrees();
    (distance, bearing)
}

/// Radiate a new point from `from` along `bearing` for a horizontal `distance`.
pub fn rad2d(from: &Point2d, bearing: Angle, distance: f64) -> Result<Point2d, AngleError> {
    let theta = bearing.to_radians()?;
    Ok(Point2d::new(
        from.x + distance * theta.sin(),
        from.y + distance * theta.cos(),
    ))
}

/// Radiate a 3D point from an instrument set up over `from`.
///
/// The slope distance is reduced to horizontal with the zenith angle, and
/// the level carried through the instrument and target heights.
pub fn rad3d(
    from: &Point3d,
    bearing: Angle,
    slope_distance: f64,
    zenith: Angle,
    instrument_height: f64,
    target_height: f64,
) -> Result<Point3d, AngleError> {
    let theta = bearing.to_radians()?;
    let z = zenith.to_radians()?;
    let horizontal = slope_distance * z.sin();

    Ok(Point3d::new(
        from.x + horizontal * theta.sin(),
        from.y + horizontal * theta.cos(),
        from.z + instrument_height + slope_distance * z.cos() - target_height,
    ))
}

/// Level of the ground mark under the instrument, from a sighting to a
/// target of known level.
pub fn reduced_level(
    known_level: f64,
    instrument_height: f64,
    slope_distance: f64,
    zenith: Angle,
    target_height: f64,
) -> Result<f64, AngleError> {
    let z = zenith.to_radians()?;
    Ok(known_level + target_height - instrument_height - slope_distance * z.cos())
}

/// Intersect the ray from `a` on `bearing_ac` with the ray from `b` on
/// `bearing_bc`.
pub fn bearing_bearing_intersection(
    a: &Point2d,
    b: &Point2d,
    bearing_ac: Angle,
    bearing_bc: Angle,
) -> Result<Option<Point2d>, AngleError> {
    let ta = bearing_ac.to_radians()?;
    let tb = bearing_bc.to_radians()?;

    let denom = (ta - tb).sin();
    if denom.abs() < PARALLEL_TOLERANCE {
        return Ok(None);
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let t = (dx * tb.cos() - dy * tb.sin()) / denom;

    Ok(Some(Point2d::new(a.x + t * ta.sin(), a.y + t * ta.cos())))
}

/// Intersect the circle of radius `dist_ac` about `a` with the circle of
/// radius `dist_bc` about `b`.
///
/// Both solutions are returned: first the one to the right of the line
/// a→b, then the one to the left.
pub fn distance_distance_intersection(
    a: &Point2d,
    b: &Point2d,
    dist_ac: f64,
    dist_bc: f64,
) -> Option<(Point2d, Point2d)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = dx.hypot(dy);
    if d == 0.0 {
        return None;
    }

    let along = (dist_ac * dist_ac - dist_bc * dist_bc + d * d) / (2.0 * d);
    let h2 = dist_ac * dist_ac - along * along;
    if h2.is_nan() || h2 < 0.0 {
        return None;
    }
    let h = h2.sqrt();

    let mx = a.x + along * dx / d;
    let my = a.y + along * dy / d;
    let ox = h * dy / d;
    let oy = h * dx / d;

    Some((
        Point2d::new(mx + ox, my - oy),
        Point2d::new(mx - ox, my + oy),
    ))
}

/// Intersect the infinite line through `a`,`b` with the one through `c`,`d`.
pub fn two_line_intersection(a: &Point2d, b: &Point2d, c: &Point2d, d: &Point2d) -> Option<Point2d> {
    let (d1x, d1y) = (b.x - a.x, b.y - a.y);
    let (d2x, d2y) = (d.x - c.x, d.y - c.y);

    let denom = d1x * d2y - d1y * d2x;
    let scale = d1x.hypot(d1y) * d2x.hypot(d2y);
    if scale == 0.0 || denom.abs() < PARALLEL_TOLERANCE * scale {
        return None;
    }

    let t = ((c.x - a.x) * d2y - (c.y - a.y) * d2x) / denom;
    Some(Point2d::new(a.x + t * d1x, a.y + t * d1y))
}
