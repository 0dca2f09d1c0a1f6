use crate::error::ProjError;

/// Reference ellipsoid, defined by semi-major axis and inverse flattening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Inverse flattening 1/f
    pub inverse_flattening: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: f * (2 - f)
    pub e2: f64,
    /// Third flattening: (a - b) / (a + b)
    pub n: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, inverse_flattening: f64) -> Self {
        let f = 1.0 / inverse_flattening;
        let b = a * (1.0 - f);
        let e2 = f * (2.0 - f);
        let n = (a - b) / (a + b);
        Self {
            a,
            inverse_flattening,
            f,
            b,
            e2,
            n,
        }
    }

    /// Like [`Ellipsoid::new`], but rejects non-positive or non-finite axes.
    pub fn checked(a: f64, inverse_flattening: f64) -> Result<Self, ProjError> {
        if !(a.is_finite() && a > 0.0) {
            return Err(ProjError::InvalidParameter(format!(
                "semi-major axis must be positive, got {a}"
            )));
        }
        // 1/f <= 1 would put the semi-minor axis at or below zero
        if !(inverse_flattening.is_finite() && inverse_flattening > 1.0) {
            return Err(ProjError::InvalidParameter(format!(
                "inverse flattening must be greater than 1, got {inverse_flattening}"
            )));
        }
        Ok(Self::new(a, inverse_flattening))
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }
}

pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 298.257_222_101);
pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 298.257_223_563);
