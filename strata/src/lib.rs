// SPDX-License-Identifier: AGPL-3.0-only

#![deny(clippy::expect_used, clippy::unwrap_used)]

//! strata — rotating layered-ellipsoid equilibrium models.
//!
//! A body is a stack of strictly nested homogeneous
//! ellipsoidal layers spinning about the z axis. The crate computes the
//! gravitational potential of each layer through Carlson symmetric elliptic
//! integrals, scores how far the stacked surfaces are from equipotentials of
//! the rotating frame, and searches stochastic perturbations of a template
//! for the best-scoring model in parallel with a deterministic reduction.
//!
//! ## Modules
//!   - `special` — Carlson RC, RF, RD, RJ by duplication
//!   - `physics` — ellipsoid potentials, layered statistics, Maclaurin/Jacobi figures
//!   - `model` — layers, models, JSON templates
//!   - `search` — PCG32 keyed candidates, perturbation, grouped reduction
//!   - `wire` — packed binary template and model records
//!   - `data` — file loading/saving and `--key=value` argument helpers
//!   - `precision` — the f32/f64 abstraction the kernels are generic over
//!   - `tolerances` — every numerical threshold, named
//!   - `validation` — pass/fail harness for the validation binaries
//!
//! ## Binaries
//!   - `explore_variations` — run a batch over a template, print the top candidates
//!   - `validate_potential` — sphere closure, point-mass limit, symmetry, equilibrium figures
//!   - `validate_carlson` — reference values, identities and f32/f64 parity sweep
//!   - `jacobi_case` — solve a Jacobi ellipsoid and emit it as a template

pub mod data;
pub mod error;
pub mod model;
pub mod physics;
pub mod precision;
pub mod search;
pub mod special;
pub mod tolerances;
pub mod validation;
pub mod wire;
