// SPDX-License-Identifier: AGPL-3.0-only

//! Homogeneous equilibrium figures: Maclaurin spheroids and Jacobi
//! ellipsoids.
//!
//! These give analytic ground truth for the statistics engine: spun at the
//! angular velocity implied by their own potential, their surfaces are
//! exact equipotentials.
//!
//! For a single homogeneous layer, equating the effective potential at the
//! x and z endpoints gives ω² = 2(`Φ_c` − `Φ_a`)/a². A triaxial body also has
//! to satisfy the y condition, which with abc = 1 reduces to the Jacobi
//! residual
//!
//!   a²b²/(b² − a²) · (RD(b²,c²,a²) − RD(a²,c²,b²)) − c² RD(a²,b²,c²) = 0,
//!
//! evaluated here through RD(x,y,z) = RJ(x,y,z,z). Roots exist only past the
//! bifurcation from the Maclaurin sequence (a ≈ 1.197 at abc = 1).
//!
//! # References
//!
//! - S. Chandrasekhar, *Ellipsoidal Figures of Equilibrium* (1969), ch. 6

use super::ellipsoid::{Axis, Ellipsoid};
use super::layered::moment_of_inertia;
use crate::error::StrataError;
use crate::model::{Layer, Model};
use crate::special::{carlson_rj_with, RjExpansion};
use crate::tolerances::{BISECT_CONVERGENCE_TOL, BISECT_MAX_ITER};
use serde::{Deserialize, Serialize};

/// Offset from the open ends of the Jacobi bracket, where the residual is
/// singular (b = a) or degenerate (b = c).
const BRACKET_NUDGE: f64 = 1e-9;

/// A single-layer body together with its equilibrium spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumFigure {
    /// Semi-axis along x.
    pub a: f64,
    /// Semi-axis along y.
    pub b: f64,
    /// Semi-axis along z (rotation axis).
    pub c: f64,
    /// Uniform density.
    pub density: f64,
    /// Angular velocity squared.
    pub omega_squared: f64,
}

impl EquilibriumFigure {
    /// Angular velocity.
    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.omega_squared.max(0.0).sqrt()
    }

    /// Angular momentum Iω.
    #[must_use]
    pub fn angular_momentum(&self) -> f64 {
        let inertia: f64 = moment_of_inertia(&[self.layer()]);
        inertia * self.angular_velocity()
    }

    /// The body as a layer.
    #[must_use]
    pub fn layer(&self) -> Layer {
        Layer::new(self.a, self.b, self.c, self.density)
    }

    /// One-layer model carrying the equilibrium angular momentum.
    ///
    /// # Errors
    ///
    /// Propagates model validation (non-positive axes or density).
    pub fn to_model(&self) -> Result<Model, StrataError> {
        Model::new(self.angular_momentum(), vec![self.layer()])
    }
}

/// ω² that balances the x and z endpoints of a homogeneous body.
#[must_use]
pub fn equilibrium_omega_squared(a: f64, b: f64, c: f64, density: f64) -> f64 {
    let e = Ellipsoid::new(a, b, c);
    let phi_a = e.potential_surface(Axis::X);
    let phi_c = e.potential_surface(Axis::Z);
    2.0 * density * (phi_c - phi_a) / (a * a)
}

/// Maclaurin spheroid with equatorial radius `a` and polar radius `c < a`.
///
/// # Errors
///
/// [`StrataError::InvalidConfig`] unless `0 < c < a`.
pub fn maclaurin_spheroid(a: f64, c: f64, density: f64) -> Result<EquilibriumFigure, StrataError> {
    if !(c > 0.0 && c < a && a.is_finite()) {
        return Err(StrataError::InvalidConfig(format!(
            "Maclaurin spheroid needs 0 < c < a, got a={a}, c={c}"
        )));
    }
    Ok(EquilibriumFigure {
        a,
        b: a,
        c,
        density,
        omega_squared: equilibrium_omega_squared(a, a, c, density),
    })
}

/// Jacobi residual at (a, b) with c = 1/(ab).
#[must_use]
pub fn jacobi_residual(a: f64, b: f64, expansion: RjExpansion) -> f64 {
    let c = 1.0 / (a * b);
    let (a2, b2, c2) = (a * a, b * b, c * c);
    let rd_a = carlson_rj_with(b2, c2, a2, a2, expansion);
    let rd_b = carlson_rj_with(a2, c2, b2, b2, expansion);
    let rd_c = carlson_rj_with(a2, b2, c2, c2, expansion);
    (a2 * b2) / (b2 - a2) * (rd_a - rd_b) - c2 * rd_c
}

/// Bisection for a sign change of `f` on `[lo, hi]`.
///
/// Returns `None` when the endpoints do not bracket a root.
pub fn bisect<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64) -> Option<f64> {
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return None;
    }
    for _ in 0..BISECT_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if hi - lo < BISECT_CONVERGENCE_TOL {
            return Some(mid);
        }
        let f_mid = f(mid);
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Jacobi ellipsoid with longest semi-axis `a` and abc = 1, unit density.
///
/// Solves the Jacobi residual for b on the open bracket (√(1/a), a).
///
/// # Errors
///
/// [`StrataError::InvalidConfig`] when `a` is not beyond the bifurcation
/// point, so no root is bracketed.
pub fn jacobi_ellipsoid(a: f64, expansion: RjExpansion) -> Result<EquilibriumFigure, StrataError> {
    if !(a.is_finite() && a > 1.0) {
        return Err(StrataError::InvalidConfig(format!(
            "Jacobi ellipsoid needs a > 1 at abc = 1, got {a}"
        )));
    }
    let lo = (1.0 / a).sqrt() * (1.0 + BRACKET_NUDGE);
    let hi = a * (1.0 - BRACKET_NUDGE);
    let b = bisect(|b| jacobi_residual(a, b, expansion), lo, hi).ok_or_else(|| {
        StrataError::InvalidConfig(format!(
            "no Jacobi root for a = {a} (below the Maclaurin bifurcation)"
        ))
    })?;
    let c = 1.0 / (a * b);
    Ok(EquilibriumFigure {
        a,
        b,
        c,
        density: 1.0,
        omega_squared: equilibrium_omega_squared(a, b, c, 1.0),
    })
}
