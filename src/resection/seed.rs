//! Closed-form starting point for the resection (Milburn & Allaby).
//!
//! The unknown point is placed from each station by solving the triangle
//! A-B-U with the sine rule, and the two placements are averaged.

use std::f64::consts::PI;

use tracing::debug;

use super::Station;
use crate::error::ResectionError;

/// Bearing of the baseline A→B, reckoned the way the seed triangle expects.
fn baseline_direction(a: &Station, b: &Station) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if b.x < a.x {
        0.5 * PI - dy.atan2(dx)
    } else if b.x > a.x {
        0.75 * PI - dy.atan2(dx)
    } else if b.y > a.y {
        PI
    } else {
        0.0
    }
}

fn checked_asin(value: f64, what: &str) -> Result<f64, ResectionError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(ResectionError::InvalidInput(format!(
            "observations inconsistent with station spacing ({what} sine {value:.6})"
        )));
    }
    Ok(value.asin())
}

/// Estimate the unknown point from the two stations' observations.
pub fn initial_estimate(a: &Station, b: &Station) -> Result<(f64, f64), ResectionError> {
    let baseline = (b.x - a.x).hypot(b.y - a.y);
    let direction = baseline_direction(a, b);

    let interior = b.bearing.to_radians()? - a.bearing.to_radians()?;
    let angle_at_b = checked_asin(a.distance * interior.sin() / baseline, "angle at B")?;
    let angle_at_a = checked_asin(b.distance * interior.sin() / baseline, "angle at A")?;

    let from_b = direction - angle_at_b;
    let from_a = 2.0 * PI + (direction - PI + angle_at_a);

    let (bx, by) = (
        b.x + from_b.sin() * b.distance,
        b.y + from_b.cos() * b.distance,
    );
    let (ax, ay) = (
        a.x + from_a.sin() * a.distance,
        a.y + from_a.cos() * a.distance,
    );

    let seed = ((ax + bx) / 2.0, (ay + by) / 2.0);
    debug!(
        from_a_x = ax,
        from_a_y = ay,
        from_b_x = bx,
        from_b_y = by,
        x = seed.0,
        y = seed.1,
        "resection seed"
    );
    Ok(seed)
}
