// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized tolerances and numerical guards.
//!
//! Every threshold used by the kernels, the validation binaries and the
//! tests is defined here with its origin. No ad-hoc magic numbers.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 | 1e-12 for Carlson reference values |
//! | Numerical guard | Overflow / 0-division | 1e-30 division floor |
//! | Physical model | Analytic closure | sphere potential (4/3)πR² |
//! | Scoring | Search policy | 1e30 invalid-model sentinel |

/// Machine-precision, special-function and root-finding tolerances.
pub mod core;
/// Potential model, statistics engine and search tolerances.
pub mod physics;

pub use self::core::{
    BISECT_CONVERGENCE_TOL, BISECT_MAX_ITER, CARLSON_F32_PARITY, CARLSON_IDENTITY_F64,
    CARLSON_REFERENCE_F64, EXACT_F64, NEAR_ZERO_EXPECTED,
};

pub use self::physics::{
    DIVISION_GUARD, EQUILIBRIUM_REL_ERR, INVALID_SCORE_SENTINEL, POINT_MASS_LIMIT,
    RADIUS_CONSISTENCY_REL, SPHERE_CLOSURE_F32, SPHERE_CLOSURE_F64, SURFACE_CONTINUITY_REL,
    TRIAXIAL_MIN_CV, VOLUME_PRESERVATION,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn all_tolerances_are_positive() {
        let tols = [
            EXACT_F64,
            NEAR_ZERO_EXPECTED,
            CARLSON_REFERENCE_F64,
            CARLSON_IDENTITY_F64,
            CARLSON_F32_PARITY,
            BISECT_CONVERGENCE_TOL,
            DIVISION_GUARD,
            RADIUS_CONSISTENCY_REL,
            SPHERE_CLOSURE_F64,
            SPHERE_CLOSURE_F32,
            POINT_MASS_LIMIT,
            SURFACE_CONTINUITY_REL,
            EQUILIBRIUM_REL_ERR,
            VOLUME_PRESERVATION,
            TRIAXIAL_MIN_CV,
        ];
        for t in tols {
            assert!(t > 0.0 && t.is_finite());
        }
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn f32_looser_than_f64() {
        assert!(SPHERE_CLOSURE_F32 > SPHERE_CLOSURE_F64);
        assert!(CARLSON_F32_PARITY > CARLSON_REFERENCE_F64);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn guard_representable_in_f32() {
        #[allow(clippy::cast_possible_truncation)]
        let g = DIVISION_GUARD as f32;
        assert!(g > 0.0 && g.is_normal());
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn sentinel_dominates_guard() {
        assert!(INVALID_SCORE_SENTINEL * DIVISION_GUARD >= 1.0 - EXACT_F64);
    }
}
