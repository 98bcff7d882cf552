// SPDX-License-Identifier: AGPL-3.0-only

//! Machine-precision, special-function and root-finding tolerances.

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754)
// ═══════════════════════════════════════════════════════════════════

/// Tolerance for compositions of operations that should be exact in f64.
///
/// f64 has ~15.9 significant digits; 1e-10 leaves 5 digits of headroom for
/// accumulated rounding.
pub const EXACT_F64: f64 = 1e-10;

/// Relative-error denominator floor: below this an expected value is
/// treated as zero and the check falls back to absolute error.
pub const NEAR_ZERO_EXPECTED: f64 = 1e-14;

// ═══════════════════════════════════════════════════════════════════
// Carlson symmetric integrals
// ═══════════════════════════════════════════════════════════════════

/// f64 kernel against tabulated reference values (Carlson 1995, mpmath).
///
/// Eleven duplication steps shrink the argument spread by 4^-11 ≈ 2.4e-7;
/// the fifth-order tail then leaves a truncation error far below f64
/// epsilon. Measured worst relative error on the reference set: 8e-16.
pub const CARLSON_REFERENCE_F64: f64 = 1e-12;

/// Algebraic identities (cyclic RD sum, RD = RJ(z,z), homogeneity) in f64.
pub const CARLSON_IDENTITY_F64: f64 = 1e-12;

/// f32 kernel against the f64 kernel on the same arguments.
///
/// f32 epsilon is 6e-8; roughly forty rounded operations per evaluation
/// give a few 1e-7. 1e-5 keeps an order of magnitude in reserve.
pub const CARLSON_F32_PARITY: f64 = 1e-5;

// ═══════════════════════════════════════════════════════════════════
// Root finding
// ═══════════════════════════════════════════════════════════════════

/// Bisection interval width at which the Jacobi residual root is accepted.
pub const BISECT_CONVERGENCE_TOL: f64 = 1e-12;

/// Bisection iteration cap (halving 1.0 this many times reaches f64 ulp).
pub const BISECT_MAX_ITER: usize = 200;
