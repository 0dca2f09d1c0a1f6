//! Common helpers for transverse Mercator math: rectifying radius, Krüger
//! series coefficients and conformal latitude conversions.

use super::ellipsoid::Ellipsoid;

/// Powers n¹..n⁸ of the third flattening, `p[k] = n^(k+1)`.
fn powers(n: f64) -> [f64; 8] {
    let mut p = [n; 8];
    for k in 1..8 {
        p[k] = p[k - 1] * n;
    }
    p
}

/// Rectifying radius A: the radius of the sphere whose great-circle
/// length matches the ellipsoid's meridian.
pub fn rectifying_radius(ellipsoid: &Ellipsoid) -> f64 {
    let [_, n2, _, n4, _, n6, _, n8] = powers(ellipsoid.n);
    ellipsoid.a / (1.0 + ellipsoid.n)
        * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0 + 25.0 / 16384.0 * n8)
}

/// Forward series coefficients α₁..α₈ (Krüger, 8th order in n).
pub fn kruger_alpha(n: f64) -> [f64; 8] {
    let [n1, n2, n3, n4, n5, n6, n7, n8] = powers(n);
    [
        // α₁
        n1 / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
            + 7891.0 / 37800.0 * n6
            + 72161.0 / 387072.0 * n7
            - 18975107.0 / 50803200.0 * n8,
        // α₂
        13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
            - 1983433.0 / 1935360.0 * n6
            + 13769.0 / 28800.0 * n7
            + 148003883.0 / 174182400.0 * n8,
        // α₃
        61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5 + 167603.0 / 181440.0 * n6
            - 67102379.0 / 29030400.0 * n7
            + 79682431.0 / 79833600.0 * n8,
        // α₄
        49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6
            + 97445.0 / 49896.0 * n7
            - 40176129013.0 / 7664025600.0 * n8,
        // α₅
        34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6 + 14644087.0 / 9123840.0 * n7
            + 2605413599.0 / 622702080.0 * n8,
        // α₆
        212378941.0 / 319334400.0 * n6 - 30705481.0 / 10378368.0 * n7
            + 175214326799.0 / 58118860800.0 * n8,
        // α₇
        1522256789.0 / 1383782400.0 * n7 - 16759934899.0 / 3113510400.0 * n8,
        // α₈
        1424729850961.0 / 743921418240.0 * n8,
    ]
}

/// Inverse series coefficients β₁..β₈ (Krüger, 8th order in n).
///
/// Signed so that both directions add their series: ξ' = ξ + Σ β sin·cosh.
pub fn kruger_beta(n: f64) -> [f64; 8] {
    let [n1, n2, n3, n4, n5, n6, n7, n8] = powers(n);
    [
        // β₁
        -n1 / 2.0 + 2.0 / 3.0 * n2 - 37.0 / 96.0 * n3 + 1.0 / 360.0 * n4 + 81.0 / 512.0 * n5
            - 96199.0 / 604800.0 * n6
            + 5406467.0 / 38707200.0 * n7
            - 7944359.0 / 67737600.0 * n8,
        // β₂
        -1.0 / 48.0 * n2 - 1.0 / 15.0 * n3 + 437.0 / 1440.0 * n4 - 46.0 / 105.0 * n5
            + 1118711.0 / 3870720.0 * n6
            - 51841.0 / 1209600.0 * n7
            - 24749483.0 / 348364800.0 * n8,
        // β₃
        -17.0 / 480.0 * n3 + 37.0 / 840.0 * n4 + 209.0 / 4480.0 * n5 - 5569.0 / 90720.0 * n6
            - 9261899.0 / 58060800.0 * n7
            + 6457463.0 / 17740800.0 * n8,
        // β₄
        -4397.0 / 161280.0 * n4 + 11.0 / 504.0 * n5 + 830251.0 / 7257600.0 * n6
            - 466511.0 / 2494800.0 * n7
            - 324154477.0 / 7664025600.0 * n8,
        // β₅
        -4583.0 / 161280.0 * n5 + 108847.0 / 3991680.0 * n6 + 8005831.0 / 63866880.0 * n7
            - 22894433.0 / 124540416.0 * n8,
        // β₆
        -20648693.0 / 638668800.0 * n6 + 16363163.0 / 518918400.0 * n7
            + 2204645983.0 / 12915302400.0 * n8,
        // β₇
        -219941297.0 / 5535129600.0 * n7 + 497323811.0 / 12454041600.0 * n8,
        // β₈
        -191773887257.0 / 3719607091200.0 * n8,
    ]
}

/// Convert geodetic tangent τ = tan φ to conformal tangent τ'.
///
/// Uses the sinh/atanh form instead of `atan(sinh(...))` so the result stays
/// well conditioned towards the poles.
pub fn conformal_tangent(tau: f64, e: f64) -> f64 {
    let tau1 = (1.0 + tau * tau).sqrt(); // = sec(φ)
    let sigma = (e * (e * tau / tau1).atanh()).sinh();
    tau * (1.0 + sigma * sigma).sqrt() - sigma * tau1
}

/// Convert conformal tangent τ' back to geodetic tangent τ via Newton iteration.
pub fn geodetic_tangent(tau_prime: f64, ellipsoid: &Ellipsoid) -> f64 {
    let e = ellipsoid.eccentricity();
    let e2 = ellipsoid.e2;
    let mut tau = tau_prime; // initial guess

    for _ in 0..15 {
        let tau1 = (1.0 + tau * tau).sqrt();
        let tau_prime_est = conformal_tangent(tau, e);
        let dtau = (tau_prime - tau_prime_est) * (1.0 + (1.0 - e2) * tau * tau)
            / ((1.0 - e2) * tau1 * (1.0 + tau_prime_est * tau_prime_est).sqrt());
        tau += dtau;
        if dtau.abs() < 1e-12 * (1.0 + tau.abs()) {
            break;
        }
    }
    tau
}

/// Meridian distance from the equator to latitude `phi` (radians), from the
/// same α series the projection uses.
pub fn meridian_distance(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    let xi_prime = conformal_tangent(phi.tan(), ellipsoid.eccentricity()).atan();
    let alpha = kruger_alpha(ellipsoid.n);
    let xi = alpha
        .iter()
        .enumerate()
        .fold(xi_prime, |acc, (j, &a)| {
            acc + a * (2.0 * (j as f64 + 1.0) * xi_prime).sin()
        });
    rectifying_radius(ellipsoid) * xi
}
