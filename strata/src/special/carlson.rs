// SPDX-License-Identifier: AGPL-3.0-only

//! Carlson symmetric elliptic integrals RC, RF, RD, RJ.
//!
//! Every integral is evaluated by the duplication theorem: a fixed number of
//! argument-averaging steps ([`Real::ITERATIONS`], four more for RJ) shrink
//! the spread between arguments by 4× per step, after which a truncated
//! Taylor series in the normalized deviations closes the result.
//!
//! The kernels are total over nonnegative arguments. Small negative inputs
//! from roundoff are clamped to zero and every denominator is floored at
//! [`DIVISION_GUARD`], so degenerate calls return finite values instead of
//! NaN. RC accepts a negative second argument (Cauchy principal value) and
//! RJ a negative fourth argument.
//!
//! # References
//!
//! - B. C. Carlson, "Numerical computation of real or complex elliptic
//!   integrals", Numer. Algorithms 10, 13–26 (1995)
//! - DLMF §19.36 (series coefficients for RF and RJ)
//! - Press et al., Numerical Recipes §6.12 (RD accumulation, RJ with p < 0)

use crate::precision::Real;
use crate::tolerances::DIVISION_GUARD;

/// Truncation order of the RJ tail polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RjExpansion {
    /// Terms through fifth order in the deviations (E2..E5 products up to
    /// degree 5).
    Standard,
    /// Standard plus the seventh-order cross terms (E2³, E3², E2E4, E2²E3,
    /// E3E4 + E2E5).
    Extended,
}

impl RjExpansion {
    /// Parse `standard`/`extended`, case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "extended" => Some(Self::Extended),
            _ => None,
        }
    }
}

#[inline]
fn guard<T: Real>() -> T {
    T::lit(DIVISION_GUARD)
}

#[inline]
fn clamp0<T: Real>(v: T) -> T {
    v.max(T::zero())
}

/// Degenerate Carlson integral RC(x, y).
///
/// For `y < 0` returns the Cauchy principal value via
/// `RC(x, y) = sqrt(x / (x − y)) · RC(x − y, −y)`.
#[must_use]
pub fn carlson_rc<T: Real>(x: T, y: T) -> T {
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, w) = if y < T::zero() {
        let xt = clamp0(x - y);
        let w = clamp0(x).sqrt() / xt.sqrt().max(guard());
        (xt, clamp0(-y), w)
    } else {
        (clamp0(x), clamp0(y), T::one())
    };

    for _ in 0..T::ITERATIONS {
        let lambda = T::lit(2.0) * xt.sqrt() * yt.sqrt() + yt;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
    }

    let ave = ((xt + yt + yt) / T::lit(3.0)).max(guard());
    let s = (yt - ave) / ave;
    let poly = T::one()
        + s * s
            * (T::lit(3.0 / 10.0)
                + s * (T::lit(1.0 / 7.0) + s * (T::lit(3.0 / 8.0) + s * T::lit(9.0 / 22.0))));
    w * poly / ave.sqrt()
}

/// Carlson integral of the first kind RF(x, y, z).
#[must_use]
pub fn carlson_rf<T: Real>(x: T, y: T, z: T) -> T {
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt) = (clamp0(x), clamp0(y), clamp0(z));

    for _ in 0..T::ITERATIONS {
        let (sx, sy, sz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let lambda = sx * sy + sy * sz + sz * sx;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
    }

    let a = ((xt + yt + zt) / T::lit(3.0)).max(guard());
    let dx = T::one() - xt / a;
    let dy = T::one() - yt / a;
    let dz = T::one() - zt / a;
    let e2 = dx * dy + dy * dz + dz * dx;
    let e3 = dx * dy * dz;

    let poly = T::one() - e2 / T::lit(10.0) + e3 / T::lit(14.0) + e2 * e2 / T::lit(24.0)
        - T::lit(3.0 / 44.0) * e2 * e3
        - T::lit(5.0 / 208.0) * e2 * e2 * e2
        + T::lit(3.0 / 104.0) * e3 * e3
        + e2 * e2 * e3 / T::lit(16.0);
    poly / a.sqrt()
}

/// Carlson integral of the second kind RD(x, y, z); `z` is distinguished.
#[must_use]
pub fn carlson_rd<T: Real>(x: T, y: T, z: T) -> T {
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt) = (clamp0(x), clamp0(y), z.max(guard()));
    let mut sum = T::zero();
    let mut fac = T::one();

    for _ in 0..T::ITERATIONS {
        let (sx, sy, sz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        sum = sum + fac / (sz * (zt + lambda)).max(guard());
        fac = fac * quarter;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
    }

    let a = (T::lit(0.2) * (xt + yt + T::lit(3.0) * zt)).max(guard());
    let dx = (a - xt) / a;
    let dy = (a - yt) / a;
    let dz = (a - zt) / a;
    let ea = dx * dy;
    let eb = dz * dz;
    let ec = ea - eb;
    let ed = ea - T::lit(6.0) * eb;
    let ee = ed + ec + ec;

    let series = T::one()
        + ed * (T::lit(-3.0 / 14.0) + T::lit(9.0 / 88.0) * ed - T::lit(9.0 / 52.0) * dz * ee)
        + dz * (ee / T::lit(6.0)
            + dz * (T::lit(-9.0 / 22.0) * ec + dz * T::lit(3.0 / 26.0) * ea));
    T::lit(3.0) * sum + fac * series / (a * a.sqrt())
}

/// Carlson integral of the third kind RJ(x, y, z, p) with the default tail
/// for the working precision.
#[must_use]
pub fn carlson_rj<T: Real>(x: T, y: T, z: T, p: T) -> T {
    carlson_rj_with(x, y, z, p, T::DEFAULT_RJ_EXPANSION)
}

/// RJ(x, y, z, p) with an explicit tail polynomial tier.
///
/// For `p < 0` the principal value is obtained from the positive-parameter
/// integral at `q = y + (z − y)(y − x)/(y − p)` (arguments sorted so that
/// `x ≤ y ≤ z`), one RF and one RC with a negative second argument.
#[must_use]
pub fn carlson_rj_with<T: Real>(x: T, y: T, z: T, p: T, expansion: RjExpansion) -> T {
    if p >= T::zero() {
        return rj_positive(x, y, z, p, expansion);
    }

    let (xs, ys, zs) = sort3(clamp0(x), clamp0(y), clamp0(z));
    let ys = ys.max(guard());
    let a = T::one() / (ys - p);
    let b = a * (zs - ys) * (ys - xs);
    let q = ys + b;
    let rho = xs * zs / ys;
    let tau = p * q / ys;

    let rj_q = rj_positive(xs, ys, zs, q, expansion);
    let rc = carlson_rc(rho, tau);
    let rf = carlson_rf(xs, ys, zs);
    a * (b * rj_q + T::lit(3.0) * (rc - rf))
}

fn rj_positive<T: Real>(x: T, y: T, z: T, p: T, expansion: RjExpansion) -> T {
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt, mut pt) = (clamp0(x), clamp0(y), clamp0(z), clamp0(p));
    let mut sum = T::zero();
    let mut fac = T::one();

    for _ in 0..T::ITERATIONS + 4 {
        let (sx, sy, sz, sp) = (xt.sqrt(), yt.sqrt(), zt.sqrt(), pt.sqrt());
        let lambda = sx * sy + sy * sz + sz * sx;
        let d = (sp + sx) * (sp + sy) * (sp + sz);
        let delta = (pt - xt) * (pt - yt) * (pt - zt);
        let d2 = d * d;
        sum = sum + T::lit(6.0) * fac * carlson_rc(d2, d2 + delta);
        fac = fac * quarter;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
        pt = quarter * (pt + lambda);
    }

    let a = ((xt + yt + zt + pt + pt) / T::lit(5.0)).max(guard());
    let dx = T::one() - xt / a;
    let dy = T::one() - yt / a;
    let dz = T::one() - zt / a;
    let dp = -(dx + dy + dz) / T::lit(2.0);

    let xyz = dx * dy * dz;
    let dp2 = dp * dp;
    let e2 = dx * dy + dx * dz + dy * dz - T::lit(3.0) * dp2;
    let e3 = xyz + T::lit(2.0) * e2 * dp + T::lit(4.0) * dp2 * dp;
    let e4 = (T::lit(2.0) * xyz + e2 * dp + T::lit(3.0) * dp2 * dp) * dp;
    let e5 = xyz * dp2;

    let mut poly = T::one() - T::lit(3.0 / 14.0) * e2 + e3 / T::lit(6.0)
        + T::lit(9.0 / 88.0) * e2 * e2
        - T::lit(3.0 / 22.0) * e4
        - T::lit(9.0 / 52.0) * e2 * e3
        + T::lit(3.0 / 26.0) * e5;
    if expansion == RjExpansion::Extended {
        poly = poly - e2 * e2 * e2 / T::lit(16.0) + T::lit(3.0 / 40.0) * e3 * e3
            + T::lit(3.0 / 20.0) * e2 * e4
            + T::lit(45.0 / 272.0) * e2 * e2 * e3
            - T::lit(9.0 / 68.0) * (e3 * e4 + e2 * e5);
    }
    sum + fac * poly / (a * a.sqrt())
}

fn sort3<T: Real>(x: T, y: T, z: T) -> (T, T, T) {
    let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
    if z <= lo {
        (z, lo, hi)
    } else if z <= hi {
        (lo, z, hi)
    } else {
        (lo, hi, z)
    }
}
