// SPDX-License-Identifier: AGPL-3.0-only

//! Gravitational physics of layered ellipsoidal bodies.
//!
//!   - `ellipsoid` — potential of one homogeneous ellipsoid (Carlson form)
//!   - `layered` — statistics engine for nested layers under rotation
//!   - `figures` — Maclaurin and Jacobi equilibrium figures

pub mod ellipsoid;
pub mod figures;
pub mod layered;

pub use ellipsoid::{layer_potential_energy, Axis, Ellipsoid, InteriorField};
pub use figures::{jacobi_ellipsoid, maclaurin_spheroid, EquilibriumFigure};
pub use layered::{
    evaluate, evaluate_with, moment_of_inertia, score_model, Evaluation, ScoringPolicy,
    SurfacePotentials,
};
