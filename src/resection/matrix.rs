//! Fixed-size normal-equation helpers for the two-unknown adjustment.

/// Design matrix: one row per observation, columns ∂/∂x and ∂/∂y.
pub type Jacobian = [[f64; 2]; 4];

/// Symmetric 2×2 normal matrix JᵀWJ, stored as its three distinct terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normal2 {
    pub n11: f64,
    pub n12: f64,
    pub n22: f64,
}

impl Normal2 {
    /// Form JᵀWJ and JᵀWk for diagonal weights `w`.
    pub fn build(j: &Jacobian, w: &[f64; 4], k: &[f64; 4]) -> (Self, [f64; 2]) {
        let mut n = Normal2 {
            n11: 0.0,
            n12: 0.0,
            n22: 0.0,
        };
        let mut t = [0.0; 2];
        for ((&[jx, jy], &wi), &ki) in j.iter().zip(w).zip(k) {
            n.n11 += wi * jx * jx;
            n.n12 += wi * jx * jy;
            n.n22 += wi * jy * jy;
            t[0] += wi * jx * ki;
            t[1] += wi * jy * ki;
        }
        (n, t)
    }

    pub fn determinant(&self) -> f64 {
        self.n11 * self.n22 - self.n12 * self.n12
    }

    /// Reciprocal condition estimate `4·det / trace²`, in `[0, 1]` for a
    /// positive semi-definite matrix. 1 means perfectly conditioned.
    pub fn reciprocal_condition(&self) -> f64 {
        let trace = self.n11 + self.n22;
        if trace <= 0.0 {
            return 0.0;
        }
        4.0 * self.determinant() / (trace * trace)
    }

    /// Closed-form inverse applied to `t`: returns N⁻¹t, or `None` when the
    /// determinant is zero.
    pub fn solve(&self, t: [f64; 2]) -> Option<[f64; 2]> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        Some([
            (self.n22 * t[0] - self.n12 * t[1]) * inv_det,
            (self.n11 * t[1] - self.n12 * t[0]) * inv_det,
        ])
    }
}

/// Residuals v = JΔ − k.
pub fn residuals(j: &Jacobian, delta: [f64; 2], k: &[f64; 4]) -> [f64; 4] {
    let mut v = [0.0; 4];
    for ((vi, &[jx, jy]), &ki) in v.iter_mut().zip(j).zip(k) {
        *vi = jx * delta[0] + jy * delta[1] - ki;
    }
    v
}
