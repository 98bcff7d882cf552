// SPDX-License-Identifier: AGPL-3.0-only

//! Statistics engine for a rotating body of nested homogeneous layers.
//!
//! Each layer is a full homogeneous ellipsoid of its own density; the body
//! is their superposition. For every layer surface `s` the effective
//! potential is sampled at the three axis endpoints `(a_s,0,0)`,
//! `(0,b_s,0)`, `(0,0,c_s)`:
//!
//!   `Φ_eff` = ½ω²(x² + y²) + Σ_m `ρ_m` `Φ_m`
//!
//! where `Φ_m` uses the interior formula for layers at or outside the
//! surface (m ≥ s) and the exterior formula for layers inside it (m < s).
//! A surface in hydrostatic equilibrium is an equipotential, so the spread
//! of the three samples measures how far the shape is from equilibrium.
//!
//! The rotation is about z and the centrifugal term is added to the
//! positive gravitational potential. Maclaurin and Jacobi figures score
//! an error at roundoff level under this convention (see
//! `tests/integration_equilibrium.rs`).

use super::ellipsoid::{layer_potential_energy, Axis, Ellipsoid, InteriorField};
use crate::model::{Layer, Model, ModelStats};
use crate::precision::{Precision, Real};
use crate::tolerances::{DIVISION_GUARD, INVALID_SCORE_SENTINEL};
use serde::{Deserialize, Serialize};

/// Effective potential at the three axis endpoints of one layer surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePotentials {
    /// At `(a, 0, 0)`.
    pub x: f64,
    /// At `(0, b, 0)`.
    pub y: f64,
    /// At `(0, 0, c)`.
    pub z: f64,
}

impl SurfacePotentials {
    /// `(max − min) / min` over the three samples.
    #[must_use]
    pub fn rel_spread(&self) -> f64 {
        let max = self.x.max(self.y).max(self.z);
        let min = self.x.min(self.y).min(self.z);
        (max - min) / min
    }
}

/// How a scored model is turned into the search objective.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringPolicy {
    /// 0 scores the equipotential error itself; a positive value scores the
    /// kinetic energy of models whose error falls below it.
    pub error_threshold: f64,
}

impl ScoringPolicy {
    /// Policy with the given threshold.
    #[must_use]
    pub const fn new(error_threshold: f64) -> Self {
        Self { error_threshold }
    }

    /// Objective for a model with the given error and kinetic energy.
    #[must_use]
    pub fn score(&self, rel_equipotential_err: f64, kinetic_energy: f64) -> f64 {
        let score = if self.error_threshold == 0.0 {
            rel_equipotential_err
        } else if rel_equipotential_err < self.error_threshold {
            kinetic_energy
        } else {
            INVALID_SCORE_SENTINEL
        };
        if score.is_nan() {
            INVALID_SCORE_SENTINEL
        } else {
            score
        }
    }
}

/// Full engine output: statistics plus the per-surface samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Derived statistics and score.
    pub stats: ModelStats,
    /// One entry per layer, innermost first. Empty when nesting is violated
    /// or the angular velocity is undefined.
    pub surfaces: Vec<SurfacePotentials>,
}

/// Moment of inertia about z, (4π/15)·Σ ρ·abc·(a² + b²).
#[must_use]
pub fn moment_of_inertia<T: Real>(layers: &[Layer]) -> T {
    let sum = layers.iter().fold(T::zero(), |acc, l| {
        let (a, b, c, rho) = (T::lit(l.a), T::lit(l.b), T::lit(l.c), T::lit(l.density));
        acc + rho * a * b * c * (a * a + b * b)
    });
    T::lit(4.0) * T::PI() / T::lit(15.0) * sum
}

/// ω = L / I. `None` when I = 0 and L ≠ 0; zero when both vanish.
#[must_use]
pub fn angular_velocity<T: Real>(angular_momentum: T, moment_of_inertia: T) -> Option<T> {
    if moment_of_inertia == T::zero() {
        return (angular_momentum == T::zero()).then(T::zero);
    }
    let omega = angular_momentum / moment_of_inertia;
    omega.is_finite().then_some(omega)
}

/// Effective potential samples for every layer surface.
///
/// Returns `None` when some surface fails to strictly enclose a layer
/// inside it.
#[must_use]
pub fn surface_potentials<T: Real>(layers: &[Layer], omega: T) -> Option<Vec<SurfacePotentials>> {
    let bodies: Vec<(Ellipsoid<T>, InteriorField<T>, T)> = layers
        .iter()
        .map(|l| {
            let body = Ellipsoid::new(T::lit(l.a), T::lit(l.b), T::lit(l.c));
            (body, body.interior_field(), T::lit(l.density))
        })
        .collect();
    let half_omega2 = T::lit(0.5) * omega * omega;

    let mut out = Vec::with_capacity(layers.len());
    for (s, surface) in layers.iter().enumerate() {
        if !layers[..s].iter().all(|inner| surface.strictly_encloses(inner)) {
            return None;
        }
        let shape = &bodies[s].0;
        let mut sample = [T::zero(); 3];
        for axis in Axis::ALL {
            let x = shape.semi_axis(axis);
            let centrifugal = match axis {
                Axis::X | Axis::Y => half_omega2 * x * x,
                Axis::Z => T::zero(),
            };
            let gravity = bodies
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (m, (body, interior, rho))| {
                    let phi = if m >= s {
                        interior.potential(axis, x)
                    } else {
                        body.potential_exterior(axis, x)
                    };
                    acc + *rho * phi
                });
            sample[axis.index()] = centrifugal + gravity;
        }
        out.push(SurfacePotentials {
            x: sample[0].widen(),
            y: sample[1].widen(),
            z: sample[2].widen(),
        });
    }
    Some(out)
}

/// Run the statistics engine at working precision `T`.
#[must_use]
pub fn evaluate<T: Real>(model: &Model, policy: ScoringPolicy) -> Evaluation {
    let layers = &model.layers;
    if layers.is_empty() {
        return Evaluation {
            stats: ModelStats::invalid(),
            surfaces: Vec::new(),
        };
    }

    let inertia: T = moment_of_inertia(layers);
    let Some(omega) = angular_velocity(T::lit(model.angular_momentum), inertia) else {
        return Evaluation {
            stats: ModelStats {
                moment_of_inertia: inertia.widen(),
                ..ModelStats::invalid()
            },
            surfaces: Vec::new(),
        };
    };

    let kinetic = T::lit(0.5) * inertia * omega * omega;
    let potential = layers.iter().fold(T::zero(), |acc, l| {
        acc + layer_potential_energy(T::lit(l.a), T::lit(l.b), T::lit(l.c), T::lit(l.density))
    });
    let virial = T::lit(2.0) * kinetic / potential.abs().max(T::lit(DIVISION_GUARD));

    let mut stats = ModelStats {
        rel_equipotential_err: INVALID_SCORE_SENTINEL,
        total_energy: (potential + kinetic).widen(),
        moment_of_inertia: inertia.widen(),
        angular_velocity: omega.widen(),
        potential_energy: potential.widen(),
        kinetic_energy: kinetic.widen(),
        virial_ratio: virial.widen(),
        score: INVALID_SCORE_SENTINEL,
    };

    let Some(surfaces) = surface_potentials(layers, omega) else {
        return Evaluation {
            stats,
            surfaces: Vec::new(),
        };
    };

    #[allow(clippy::cast_precision_loss)]
    let n = surfaces.len() as f64;
    let rel_err = surfaces.iter().map(SurfacePotentials::rel_spread).sum::<f64>() / n;
    stats.rel_equipotential_err = if rel_err.is_nan() {
        INVALID_SCORE_SENTINEL
    } else {
        rel_err
    };
    stats.score = policy.score(rel_err, stats.kinetic_energy);
    Evaluation { stats, surfaces }
}

/// Run the statistics engine at the selected runtime precision.
#[must_use]
pub fn evaluate_with(model: &Model, policy: ScoringPolicy, precision: Precision) -> Evaluation {
    match precision {
        Precision::Single => evaluate::<f32>(model, policy),
        Precision::Double => evaluate::<f64>(model, policy),
    }
}

/// Statistics only, at the selected precision.
#[must_use]
pub fn score_model(model: &Model, policy: ScoringPolicy, precision: Precision) -> ModelStats {
    evaluate_with(model, policy, precision).stats
}
