//! Two-point resection: locate an unknown instrument point from distances and
//! bearings observed to two stations of known coordinates.
//!
//! A closed-form seed ([`seed`]) is refined by weighted Gauss-Newton least
//! squares over the four observations (two distances, two bearings).

pub mod matrix;
pub mod seed;

use tracing::{debug, warn};

use crate::angle::{wrap_pi, Angle};
use crate::error::ResectionError;
use matrix::{residuals, Jacobian, Normal2};

/// Normal matrices with `4·det/trace²` below this are treated as singular.
const MIN_RECIPROCAL_CONDITION: f64 = 1e-6;

/// A known station with the distance and bearing observed from the unknown
/// point to it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub bearing: Angle,
}

impl Station {
    pub fn new(x: f64, y: f64, distance: f64, bearing: Angle) -> Self {
        Self {
            x,
            y,
            distance,
            bearing,
        }
    }
}

/// Adjustment settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResectionConfig {
    /// Standard deviation of a distance observation. Default: 0.001.
    pub sigma_distance: f64,
    /// Standard deviation of a bearing observation, in radians. Default: 5.0,
    /// which leaves the solution driven almost entirely by the distances.
    pub sigma_angle: f64,
    /// Per-axis correction below which the solution has converged. Default: 0.001.
    pub tolerance: f64,
    /// Default: 20.
    pub max_iterations: usize,
}

impl Default for ResectionConfig {
    fn default() -> Self {
        Self {
            sigma_distance: 0.001,
            sigma_angle: 5.0,
            tolerance: 0.001,
            max_iterations: 20,
        }
    }
}

impl ResectionConfig {
    pub fn validate(&self) -> Result<(), ResectionError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.sigma_distance) && positive(self.sigma_angle)) {
            return Err(ResectionError::InvalidInput(
                "observation standard deviations must be positive".into(),
            ));
        }
        if !positive(self.tolerance) {
            return Err(ResectionError::InvalidInput(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(ResectionError::InvalidInput(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn weights(&self) -> [f64; 4] {
        let wd = 1.0 / (self.sigma_distance * self.sigma_distance);
        let wa = 1.0 / (self.sigma_angle * self.sigma_angle);
        [wd, wd, wa, wa]
    }
}

/// Adjusted position of the unknown point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResectionResult {
    pub x: f64,
    pub y: f64,
    /// Final residuals: distance to A, distance to B, bearing to A, bearing to B.
    pub residuals: [f64; 4],
    pub iterations: usize,
    /// Length of the correction vector applied on each pass.
    pub corrections: Vec<f64>,
}

/// Two-point resection solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoPointResection {
    config: ResectionConfig,
}

impl TwoPointResection {
    pub fn new(config: ResectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResectionConfig {
        &self.config
    }

    pub fn solve(&self, a: &Station, b: &Station) -> Result<ResectionResult, ResectionError> {
        self.config.validate()?;
        check_station(a, "A")?;
        check_station(b, "B")?;
        if a.x == b.x && a.y == b.y {
            return Err(ResectionError::InvalidInput(format!(
                "stations A and B coincide at ({}, {})",
                a.x, a.y
            )));
        }

        let bearing_a = a.bearing.to_radians()?;
        let bearing_b = b.bearing.to_radians()?;
        let weights = self.config.weights();

        let bearings = [bearing_a, bearing_b];
        let (mut x, mut y) = seed::initial_estimate(a, b)?;
        let mut corrections = Vec::with_capacity(self.config.max_iterations);
        let mut reflected = false;

        for iteration in 1..=self.config.max_iterations {
            let (j, k) = linearize(a, b, bearings, x, y)?;

            let (normal, rhs) = Normal2::build(&j, &weights, &k);
            let rcond = normal.reciprocal_condition();
            if !rcond.is_finite() || rcond < MIN_RECIPROCAL_CONDITION {
                warn!(iteration, rcond, x, y, "resection normal matrix is singular");
                return Err(ResectionError::SingularSystem(format!(
                    "reciprocal condition {rcond:.3e} on pass {iteration}; \
                     the point may lie on the line through both stations"
                )));
            }
            let delta = normal
                .solve(rhs)
                .filter(|d| d[0].is_finite() && d[1].is_finite())
                .ok_or_else(|| {
                    ResectionError::SingularSystem(format!(
                        "normal equations could not be solved on pass {iteration}"
                    ))
                })?;

            x += delta[0];
            y += delta[1];
            corrections.push(delta[0].hypot(delta[1]));
            debug!(iteration, dx = delta[0], dy = delta[1], rcond, "resection pass");

            if delta[0].abs() < self.config.tolerance && delta[1].abs() < self.config.tolerance {
                // The distances alone cannot tell the point from its mirror
                // image across A-B; the bearings decide.
                if !reflected {
                    let (mx, my) = reflect_across(a, b, x, y);
                    let (_, here) = linearize(a, b, bearings, x, y)?;
                    let (_, mirror) = linearize(a, b, bearings, mx, my)?;
                    if mirror[2].abs() < here[2].abs() && mirror[3].abs() < here[3].abs() {
                        debug!(
                            iteration,
                            from_x = x,
                            from_y = y,
                            to_x = mx,
                            to_y = my,
                            "bearings favour the mirror solution"
                        );
                        reflected = true;
                        x = mx;
                        y = my;
                        continue;
                    }
                }
                return Ok(ResectionResult {
                    x,
                    y,
                    residuals: residuals(&j, delta, &k),
                    iterations: iteration,
                    corrections,
                });
            }
        }

        warn!(
            iterations = self.config.max_iterations,
            x, y, "resection did not converge"
        );
        Err(ResectionError::NonConvergence {
            iterations: self.config.max_iterations,
            x,
            y,
        })
    }
}

/// Design matrix and misclosures (observed minus computed) at `(x, y)`.
///
/// Rows: distance to A, distance to B, bearing to A, bearing to B.
fn linearize(
    a: &Station,
    b: &Station,
    bearings: [f64; 2],
    x: f64,
    y: f64,
) -> Result<(Jacobian, [f64; 4]), ResectionError> {
    let ra = (x - a.x).hypot(y - a.y);
    let rb = (x - b.x).hypot(y - b.y);
    if ra == 0.0 || rb == 0.0 {
        return Err(ResectionError::SingularSystem(
            "estimate fell on a station".into(),
        ));
    }

    let j: Jacobian = [
        [(x - a.x) / ra, (y - a.y) / ra],
        [(x - b.x) / rb, (y - b.y) / rb],
        [(y - a.y) / (ra * ra), (a.x - x) / (ra * ra)],
        [(y - b.y) / (rb * rb), (b.x - x) / (rb * rb)],
    ];
    let k = [
        a.distance - ra,
        b.distance - rb,
        wrap_pi(bearings[0] - (a.x - x).atan2(a.y - y)),
        wrap_pi(bearings[1] - (b.x - x).atan2(b.y - y)),
    ];
    Ok((j, k))
}

/// Mirror `(x, y)` across the line through both stations.
fn reflect_across(a: &Station, b: &Station, x: f64, y: f64) -> (f64, f64) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let t = ((x - a.x) * dx + (y - a.y) * dy) / (dx * dx + dy * dy);
    let (foot_x, foot_y) = (a.x + t * dx, a.y + t * dy);
    (2.0 * foot_x - x, 2.0 * foot_y - y)
}

fn check_station(s: &Station, name: &str) -> Result<(), ResectionError> {
    if !(s.x.is_finite() && s.y.is_finite()) {
        return Err(ResectionError::InvalidInput(format!(
            "station {name} coordinates must be finite"
        )));
    }
    if !(s.distance.is_finite() && s.distance > 0.0) {
        return Err(ResectionError::InvalidInput(format!(
            "distance to station {name} must be positive, got {}",
            s.distance
        )));
    }
    Ok(())
}

/// Resect with the default configuration.
pub fn resect_two_point(a: &Station, b: &Station) -> Result<ResectionResult, ResectionError> {
    TwoPointResection::default().solve(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn reference_stations() -> (Station, Station) {
        (
            Station::new(11813.150, 54078.732, 18.147, Angle::Dms(188.2100)),
            Station::new(11834.832, 54079.154, 4.334, Angle::Dms(329.1659)),
        )
    }

    #[test]
    fn test_reference_case() {
        init_tracing();
        let (a, b) = reference_stations();
        let r = resect_two_point(&a, &b).unwrap();
        assert_relative_eq!(r.x, 11831.105, epsilon = 1e-3);
        assert_relative_eq!(r.y, 54081.366, epsilon = 1e-3);
        assert!(r.iterations < 20);
        assert_eq!(r.iterations, 6);
        assert_eq!(r.corrections.len(), r.iterations);
        // distances are fitted to well under a millimetre
        assert!(r.residuals[0].abs() < 1e-6);
        assert!(r.residuals[1].abs() < 1e-6);
        assert!(r.residuals[2].abs() <= std::f64::consts::PI);
        assert!(r.residuals[3].abs() <= std::f64::consts::PI);
    }

    /// Stations with distances and bearings observed exactly from `u`.
    fn observed_from(u: (f64, f64), a: (f64, f64), b: (f64, f64)) -> (Station, Station) {
        let station = |(sx, sy): (f64, f64)| {
            let bearing = (sx - u.0).atan2(sy - u.1);
            Station::new(sx, sy, (sx - u.0).hypot(sy - u.1), Angle::Radians(bearing))
        };
        (station(a), station(b))
    }

    #[test]
    fn test_recovers_point_from_consistent_observations() {
        init_tracing();
        let cases = [
            ((40.0, 30.0), (0.0, 0.0), (100.0, 0.0)),
            ((60.0, -25.0), (0.0, 0.0), (100.0, 0.0)),
            ((-30.0, 50.0), (0.0, 0.0), (0.0, 100.0)),
            ((65.13, 112.09), (21.92, 53.08), (177.12, 167.15)),
        ];
        for (u, pa, pb) in cases {
            let (a, b) = observed_from(u, pa, pb);
            let r = resect_two_point(&a, &b).unwrap();
            assert_relative_eq!(r.x, u.0, epsilon = 1e-6);
            assert_relative_eq!(r.y, u.1, epsilon = 1e-6);
            assert!(r.residuals.iter().all(|v| v.abs() < 1e-6), "{:?}", r.residuals);
        }
    }

    #[test]
    fn test_seed_on_mirror_side_is_corrected() {
        // The seed for this geometry lands near (35.9, -28.3), across A-B
        let (a, b) = observed_from((40.0, 30.0), (0.0, 0.0), (100.0, 0.0));
        let (_, seed_y) = seed::initial_estimate(&a, &b).unwrap();
        assert!(seed_y < 0.0);

        let r = resect_two_point(&a, &b).unwrap();
        assert_relative_eq!(r.y, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reflect_across_station_line() {
        let a = Station::new(0.0, 0.0, 1.0, Angle::Decimal(0.0));
        let b = Station::new(10.0, 10.0, 1.0, Angle::Decimal(0.0));
        let (x, y) = reflect_across(&a, &b, 0.0, 4.0);
        assert_relative_eq!(x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_corrections_shrink() {
        let (a, b) = reference_stations();
        let r = resect_two_point(&a, &b).unwrap();
        assert_relative_eq!(r.corrections[0], 12.137, epsilon = 1e-3);
        for pair in r.corrections[1..].windows(2) {
            assert!(pair[1] <= pair[0], "corrections grew: {:?}", r.corrections);
        }
    }

    #[test]
    fn test_coincident_stations() {
        let a = Station::new(100.0, 200.0, 10.0, Angle::Dms(45.0));
        let b = Station::new(100.0, 200.0, 12.0, Angle::Dms(90.0));
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_positive_distance() {
        let (a, mut b) = reference_stations();
        b.distance = 0.0;
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::InvalidInput(_))
        ));
        b.distance = -4.334;
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_inconsistent_distances() {
        let (mut a, b) = reference_stations();
        a.distance = 50.0;
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_point_on_station_line_is_singular() {
        init_tracing();
        // Unknown at (40, 0) on the line through both stations
        let a = Station::new(0.0, 0.0, 40.0, Angle::Dms(270.0));
        let b = Station::new(100.0, 0.0, 60.0, Angle::Dms(90.0));
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::SingularSystem(_))
        ));
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        init_tracing();
        let (a, b) = reference_stations();
        let solver = TwoPointResection::new(ResectionConfig {
            max_iterations: 2,
            ..Default::default()
        });
        match solver.solve(&a, &b) {
            Err(ResectionError::NonConvergence { iterations, x, y }) => {
                assert_eq!(iterations, 2);
                assert_relative_eq!(x, 11831.0455, epsilon = 1e-3);
                assert_relative_eq!(y, 54082.2564, epsilon = 1e-3);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config() {
        let (a, b) = reference_stations();
        for config in [
            ResectionConfig {
                sigma_distance: 0.0,
                ..Default::default()
            },
            ResectionConfig {
                tolerance: -1.0,
                ..Default::default()
            },
            ResectionConfig {
                max_iterations: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                TwoPointResection::new(config).solve(&a, &b),
                Err(ResectionError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_bad_bearing_notation() {
        let (mut a, b) = reference_stations();
        a.bearing = Angle::Dms(188.7100);
        assert!(matches!(
            resect_two_point(&a, &b),
            Err(ResectionError::Angle(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let c = ResectionConfig::default();
        assert_relative_eq!(c.sigma_distance, 0.001);
        assert_relative_eq!(c.sigma_angle, 5.0);
        assert_relative_eq!(c.tolerance, 0.001);
        assert_eq!(c.max_iterations, 20);
    }
}
