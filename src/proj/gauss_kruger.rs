//! Gauss-Krüger (transverse Mercator) projection, Krüger n-series to 8th order.
//!
//! Besides grid coordinates the forward projection reports the point scale
//! factor and the grid convergence, which survey reductions need for
//! converting ground distances and true bearings to the grid.

use rayon::prelude::*;
use tracing::trace;

use crate::angle::{wrap_pi, Angle};
use crate::error::ProjError;
use crate::proj::common::{
    conformal_tangent, geodetic_tangent, kruger_alpha, kruger_beta, rectifying_radius,
};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::model::{utm_central_meridian, ProjectionModel};
use crate::proj::Projection;

/// Grid position of a projected point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedResult {
    pub easting: f64,
    pub northing: f64,
    pub point_scale_factor: f64,
    /// Angle from true north to grid north, decimal degrees.
    pub grid_convergence: f64,
}

/// Geodetic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
}

/// A projector bound to one model and central meridian.
///
/// Series coefficients and the rectifying radius are computed once here, so
/// reusing a `GaussKruger` across many points avoids recomputing them.
#[derive(Clone, Debug)]
pub struct GaussKruger {
    model: ProjectionModel,
    ellipsoid: Ellipsoid,
    lon0: f64,
    a_hat: f64,
    alpha: [f64; 8],
    beta: [f64; 8],
}

impl GaussKruger {
    pub fn new(model: ProjectionModel, central_meridian: Angle) -> Result<Self, ProjError> {
        model.validate()?;
        let lon0 = central_meridian.to_radians()?;
        let ellipsoid = model.ellipsoid();
        let a_hat = rectifying_radius(&ellipsoid);

        trace!(
            central_meridian = lon0.to_degrees(),
            a = ellipsoid.a,
            inverse_flattening = ellipsoid.inverse_flattening,
            "built Gauss-Krüger projector"
        );

        Ok(Self {
            model,
            ellipsoid,
            lon0,
            a_hat,
            alpha: kruger_alpha(ellipsoid.n),
            beta: kruger_beta(ellipsoid.n),
        })
    }

    /// UTM zone projector on WGS84.
    pub fn utm_zone(zone: u8, north: bool) -> Result<Self, ProjError> {
        let cm = utm_central_meridian(zone)?;
        Self::new(ProjectionModel::utm(north), Angle::Decimal(cm))
    }

    /// Map Grid of Australia zone projector (GRS80).
    pub fn mga_zone(zone: u8) -> Result<Self, ProjError> {
        let cm = utm_central_meridian(zone)?;
        Self::new(ProjectionModel::mga(), Angle::Decimal(cm))
    }

    pub fn model(&self) -> &ProjectionModel {
        &self.model
    }

    /// Central meridian in decimal degrees.
    pub fn central_meridian(&self) -> f64 {
        self.lon0.to_degrees()
    }

    pub fn project(&self, latitude: Angle, longitude: Angle) -> Result<ProjectedResult, ProjError> {
        self.project_radians(latitude.to_radians()?, longitude.to_radians()?)
    }

    /// Forward projection from latitude and longitude in radians.
    pub fn project_radians(&self, phi: f64, lambda: f64) -> Result<ProjectedResult, ProjError> {
        if !(phi.is_finite() && lambda.is_finite()) {
            return Err(ProjError::InvalidInput(
                "latitude and longitude must be finite".into(),
            ));
        }
        if phi.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(ProjError::InvalidInput(format!(
                "latitude {:.9}° is outside (-90°, 90°)",
                phi.to_degrees()
            )));
        }
        let w = wrap_pi(lambda - self.lon0);
        if w.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(ProjError::InvalidInput(format!(
                "longitude is {:.6}° from the central meridian",
                w.to_degrees()
            )));
        }

        let e2 = self.ellipsoid.e2;
        let tau = phi.tan();
        let tau_prime = conformal_tangent(tau, self.ellipsoid.eccentricity());
        let (sin_w, cos_w) = w.sin_cos();

        // Gauss-Schreiber ratios, normalised by a
        let u = tau_prime.atan2(cos_w);
        let v = (sin_w / tau_prime.hypot(cos_w)).asinh();

        let mut xi = u;
        let mut eta = v;
        let mut p = 1.0;
        let mut q = 0.0;
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            let (sin_ku, cos_ku) = (k * u).sin_cos();
            let (sinh_kv, cosh_kv) = ((k * v).sinh(), (k * v).cosh());
            xi += a * sin_ku * cosh_kv;
            eta += a * cos_ku * sinh_kv;
            p += k * a * cos_ku * cosh_kv;
            q -= k * a * sin_ku * sinh_kv;
        }

        let k0 = self.model.central_scale();
        let easting = self.model.false_easting() + k0 * self.a_hat * eta;
        let northing = self.model.false_northing() + k0 * self.a_hat * xi;

        let sin_phi = phi.sin();
        let point_scale_factor = k0 * (self.a_hat / self.ellipsoid.a)
            * q.hypot(p)
            * (1.0 + tau * tau).sqrt()
            * (1.0 - e2 * sin_phi * sin_phi).sqrt()
            / tau_prime.hypot(cos_w);

        let grid_convergence = ((q / p).atan()
            + (tau_prime * w.tan() / (1.0 + tau_prime * tau_prime).sqrt()).atan())
        .to_degrees();

        trace!(easting, northing, point_scale_factor, grid_convergence, "projected");

        Ok(ProjectedResult {
            easting,
            northing,
            point_scale_factor,
            grid_convergence,
        })
    }

    /// Inverse projection back to latitude and longitude in decimal degrees.
    pub fn unproject(&self, easting: f64, northing: f64) -> Result<Geodetic, ProjError> {
        if !(easting.is_finite() && northing.is_finite()) {
            return Err(ProjError::InvalidInput(
                "easting and northing must be finite".into(),
            ));
        }
        let k0a = self.model.central_scale() * self.a_hat;
        let eta = (easting - self.model.false_easting()) / k0a;
        let xi = (northing - self.model.false_northing()) / k0a;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime += b * (k * xi).sin() * (k * eta).cosh();
            eta_prime += b * (k * xi).cos() * (k * eta).sinh();
        }

        // τ' = sin(ξ') / hypot(sinh(η'), cos(ξ'))
        let sinh_eta = eta_prime.sinh();
        let cos_xi = xi_prime.cos();
        let tau_prime = xi_prime.sin() / sinh_eta.hypot(cos_xi);
        let tau = geodetic_tangent(tau_prime, &self.ellipsoid);

        let latitude = tau.atan().to_degrees();
        let longitude = wrap_pi(self.lon0 + sinh_eta.atan2(cos_xi)).to_degrees();
        if !(latitude.is_finite() && longitude.is_finite()) {
            return Err(ProjError::InvalidInput(format!(
                "({easting}, {northing}) does not map to a geodetic position"
            )));
        }

        trace!(latitude, longitude, "unprojected");
        Ok(Geodetic {
            latitude,
            longitude,
        })
    }

    /// Project many `(latitude, longitude)` pairs in parallel.
    ///
    /// Output order matches input order; the first failing point aborts the
    /// batch.
    pub fn project_many(&self, points: &[(Angle, Angle)]) -> Result<Vec<ProjectedResult>, ProjError> {
        points
            .par_iter()
            .map(|&(lat, lon)| self.project(lat, lon))
            .collect()
    }
}

impl Projection for GaussKruger {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let r = self.project_radians(lat, lon)?;
        Ok((r.easting, r.northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let g = self.unproject(x, y)?;
        Ok((g.longitude.to_radians(), g.latitude.to_radians()))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}

/// Project one point onto the grid with central meridian `central_meridian`.
pub fn gauss_kruger(
    latitude: Angle,
    longitude: Angle,
    central_meridian: Angle,
    model: &ProjectionModel,
) -> Result<ProjectedResult, ProjError> {
    GaussKruger::new(*model, central_meridian)?.project(latitude, longitude)
}

/// Inverse of [`gauss_kruger`].
pub fn inverse_gauss_kruger(
    easting: f64,
    northing: f64,
    central_meridian: Angle,
    model: &ProjectionModel,
) -> Result<Geodetic, ProjError> {
    GaussKruger::new(*model, central_meridian)?.unproject(easting, northing)
}
