//! Projection parameter sets: ellipsoid plus transverse Mercator grid
//! constants (central scale factor, false origin).

use crate::error::ProjError;
use crate::proj::ellipsoid::{Ellipsoid, GRS80, WGS84};

const UTM_CENTRAL_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_SOUTH_FALSE_NORTHING: f64 = 10_000_000.0;

/// Immutable ellipsoid/projection parameters.
///
/// Fields are read through accessors so a constructed model always satisfies
/// the positivity checks in [`ProjectionModel::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionModel {
    a: f64,
    inverse_flattening: f64,
    central_scale: f64,
    false_easting: f64,
    false_northing: f64,
}

impl ProjectionModel {
    pub fn new(
        a: f64,
        inverse_flattening: f64,
        central_scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, ProjError> {
        let model = Self {
            a,
            inverse_flattening,
            central_scale,
            false_easting,
            false_northing,
        };
        model.validate()?;
        Ok(model)
    }

    /// Map Grid of Australia: GRS80, southern hemisphere UTM grid constants.
    pub fn mga() -> Self {
        Self::from_ellipsoid(GRS80, UTM_SOUTH_FALSE_NORTHING)
    }

    /// Universal Transverse Mercator on WGS84.
    pub fn utm(north: bool) -> Self {
        let false_northing = if north { 0.0 } else { UTM_SOUTH_FALSE_NORTHING };
        Self::from_ellipsoid(WGS84, false_northing)
    }

    fn from_ellipsoid(ellipsoid: Ellipsoid, false_northing: f64) -> Self {
        Self {
            a: ellipsoid.a,
            inverse_flattening: ellipsoid.inverse_flattening,
            central_scale: UTM_CENTRAL_SCALE,
            false_easting: UTM_FALSE_EASTING,
            false_northing,
        }
    }

    /// Re-check the invariants; deserialized models skip [`ProjectionModel::new`].
    pub fn validate(&self) -> Result<(), ProjError> {
        Ellipsoid::checked(self.a, self.inverse_flattening)?;
        if !(self.central_scale.is_finite() && self.central_scale > 0.0) {
            return Err(ProjError::InvalidParameter(format!(
                "central scale factor must be positive, got {}",
                self.central_scale
            )));
        }
        if !(self.false_easting.is_finite() && self.false_northing.is_finite()) {
            return Err(ProjError::InvalidParameter(
                "false easting and northing must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        Ellipsoid::new(self.a, self.inverse_flattening)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    pub fn central_scale(&self) -> f64 {
        self.central_scale
    }

    pub fn false_easting(&self) -> f64 {
        self.false_easting
    }

    pub fn false_northing(&self) -> f64 {
        self.false_northing
    }
}

/// Central meridian (decimal degrees) of a 6° UTM/MGA zone, 1..=60.
pub fn utm_central_meridian(zone: u8) -> Result<f64, ProjError> {
    if !(1..=60).contains(&zone) {
        return Err(ProjError::InvalidParameter(format!(
            "UTM zone must be 1-60, got {zone}"
        )));
    }
    Ok(zone as f64 * 6.0 - 183.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_validates() {
        assert!(ProjectionModel::new(6_378_137.0, 298.257_222_101, 0.9996, 500_000.0, 0.0).is_ok());
        assert!(ProjectionModel::new(0.0, 298.257_222_101, 0.9996, 500_000.0, 0.0).is_err());
        assert!(ProjectionModel::new(6_378_137.0, -1.0, 0.9996, 500_000.0, 0.0).is_err());
        assert!(ProjectionModel::new(6_378_137.0, 298.257_222_101, 0.0, 500_000.0, 0.0).is_err());
        assert!(ProjectionModel::new(6_378_137.0, 298.257_222_101, 0.9996, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_presets() {
        let mga = ProjectionModel::mga();
        assert_eq!(mga.ellipsoid(), GRS80);
        assert_relative_eq!(mga.central_scale(), 0.9996);
        assert_relative_eq!(mga.false_easting(), 500_000.0);
        assert_relative_eq!(mga.false_northing(), 10_000_000.0);
        assert!(mga.validate().is_ok());

        assert_relative_eq!(ProjectionModel::utm(true).false_northing(), 0.0);
        assert_eq!(ProjectionModel::utm(false).ellipsoid(), WGS84);
    }

    #[test]
    fn test_utm_central_meridian() {
        assert_relative_eq!(utm_central_meridian(1).unwrap(), -177.0);
        assert_relative_eq!(utm_central_meridian(33).unwrap(), 15.0);
        assert_relative_eq!(utm_central_meridian(55).unwrap(), 147.0);
        assert_relative_eq!(utm_central_meridian(60).unwrap(), 177.0);
        assert!(utm_central_meridian(0).is_err());
        assert!(utm_central_meridian(61).is_err());
    }
}
