// SPDX-License-Identifier: AGPL-3.0-only

//! Ellipsoid-potential, statistics-engine and search tolerances.

/// Generic division-by-zero guard.
///
/// Applied to every Carlson denominator and to RD's distinguished argument.
/// 1e-30 is representable in f32 (min normal 1.2e-38) and sits far below
/// any squared semi-axis a model can carry.
pub const DIVISION_GUARD: f64 = 1e-30;

/// Score and equipotential error assigned to a structurally invalid model.
pub const INVALID_SCORE_SENTINEL: f64 = 1e30;

/// Relative mismatch allowed between a template's `r` and `cbrt(abc)`.
pub const RADIUS_CONSISTENCY_REL: f64 = 1e-8;

/// Sphere surface potential vs (4/3)πR² at f64 working width.
pub const SPHERE_CLOSURE_F64: f64 = 1e-12;

/// Sphere surface potential vs (4/3)πR² at f32 working width.
pub const SPHERE_CLOSURE_F32: f64 = 1e-6;

/// Exterior potential of a sphere vs the point-mass value M/r.
pub const POINT_MASS_LIMIT: f64 = 1e-12;

/// Interior vs exterior potential a relative 1e-9 either side of the surface.
///
/// The radial slope of Φ at the surface is O(Φ/a), so a 1e-9 offset moves
/// the potential by ~2e-9 relative; 1e-7 absorbs that with margin.
pub const SURFACE_CONTINUITY_REL: f64 = 1e-7;

/// Equipotential error of an exact Maclaurin or Jacobi figure.
///
/// Analytic value is 0; the f64 engine lands at ~4e-16.
pub const EQUILIBRIUM_REL_ERR: f64 = 1e-10;

/// Product of the three perturbation multipliers vs 1.
pub const VOLUME_PRESERVATION: f64 = 1e-12;

/// Minimum coefficient of variation of the three surface potentials of a
/// genuinely triaxial body (3,2,1 gives ~0.16).
pub const TRIAXIAL_MIN_CV: f64 = 1e-3;
