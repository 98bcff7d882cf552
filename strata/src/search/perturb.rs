// SPDX-License-Identifier: AGPL-3.0-only

//! Volume-preserving log-normal perturbation of a template model.
//!
//! Each layer takes two uniforms r1, r2 from its candidate's stream and
//! scales its semi-axes by
//!
//!   `mul_a` = 2^((r1 − ½)·T),  `mul_b` = 2^((r2 − ½)·T),  `mul_c` = 1/(`mul_a` `mul_b`)
//!
//! so abc, and with it the layer volume, is unchanged. Volumetric radius and
//! density are copied from the template.

use super::rng::Pcg32;
use crate::model::{Layer, Model};

/// Multipliers applied to one layer's semi-axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationFactors {
    /// Factor on `a`.
    pub mul_a: f64,
    /// Factor on `b`.
    pub mul_b: f64,
    /// Factor on `c`, the reciprocal of the other two.
    pub mul_c: f64,
}

impl PerturbationFactors {
    /// No-op factors.
    pub const IDENTITY: Self = Self {
        mul_a: 1.0,
        mul_b: 1.0,
        mul_c: 1.0,
    };

    /// Factors from two uniforms at annealing temperature `temperature`.
    #[must_use]
    pub fn from_uniforms(r1: f32, r2: f32, temperature: f64) -> Self {
        let mul_a = ((f64::from(r1) - 0.5) * temperature).exp2();
        let mul_b = ((f64::from(r2) - 0.5) * temperature).exp2();
        Self {
            mul_a,
            mul_b,
            mul_c: 1.0 / (mul_a * mul_b),
        }
    }

    /// Draw the next pair of uniforms from `rng`.
    pub fn draw(rng: &mut Pcg32, temperature: f64) -> Self {
        let r1 = rng.next_f32();
        let r2 = rng.next_f32();
        Self::from_uniforms(r1, r2, temperature)
    }

    /// `mul_a·mul_b·mul_c`, 1 up to rounding.
    #[must_use]
    pub fn volume_factor(&self) -> f64 {
        self.mul_a * self.mul_b * self.mul_c
    }

    /// Apply to a layer.
    #[must_use]
    pub fn apply(&self, layer: &Layer) -> Layer {
        layer.scaled(self.mul_a, self.mul_b, self.mul_c)
    }
}

/// Unscored candidate `index` of a batch: a pure function of its key.
#[must_use]
pub fn generate_candidate(template: &Model, seed: u32, index: u32, temperature: f64) -> Model {
    let mut rng = Pcg32::for_candidate(seed, index);
    let layers = template
        .layers
        .iter()
        .map(|layer| PerturbationFactors::draw(&mut rng, temperature).apply(layer))
        .collect();
    template.with_layers(layers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tolerances::VOLUME_PRESERVATION;

    fn template() -> Model {
        Model::new(
            1.0,
            vec![Layer::new(1.0, 1.1, 0.9, 2.0), Layer::new(2.0, 2.1, 1.9, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn volume_preserved_for_extreme_draws() {
        for &(r1, r2) in &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.123, 0.987)] {
            let f = PerturbationFactors::from_uniforms(r1, r2, 4.0);
            assert!((f.volume_factor() - 1.0).abs() < VOLUME_PRESERVATION);
        }
    }

    #[test]
    fn zero_temperature_is_identity() {
        let f = PerturbationFactors::from_uniforms(0.9, 0.1, 0.0);
        assert_eq!(f, PerturbationFactors::IDENTITY);
        let t = template();
        let c = generate_candidate(&t, 42, 17, 0.0);
        assert_eq!(c.layers, t.layers);
    }

    #[test]
    fn factors_bounded_by_temperature() {
        let mut rng = Pcg32::for_candidate(1, 1);
        for _ in 0..1000 {
            let f = PerturbationFactors::draw(&mut rng, 2.0);
            assert!(f.mul_a >= 0.5 - 1e-12 && f.mul_a <= 2.0 + 1e-12);
            assert!(f.mul_b >= 0.5 - 1e-12 && f.mul_b <= 2.0 + 1e-12);
        }
    }

    #[test]
    fn candidate_keeps_radius_density_and_volume() {
        let t = template();
        let c = generate_candidate(&t, 12345, 3, 0.5);
        assert_eq!(c.num_layers(), t.num_layers());
        assert_eq!(c.angular_momentum.to_bits(), t.angular_momentum.to_bits());
        for (orig, new) in t.layers.iter().zip(&c.layers) {
            assert_eq!(orig.density.to_bits(), new.density.to_bits());
            assert_eq!(orig.volumetric_radius.to_bits(), new.volumetric_radius.to_bits());
            let v0 = orig.a * orig.b * orig.c;
            let v1 = new.a * new.b * new.c;
            assert!(((v1 - v0) / v0).abs() < VOLUME_PRESERVATION);
            assert!(new.a.to_bits() != orig.a.to_bits());
        }
    }

    #[test]
    fn candidate_generation_is_pure() {
        let t = template();
        let a = generate_candidate(&t, 12345, 99, 0.3);
        let b = generate_candidate(&t, 12345, 99, 0.3);
        assert_eq!(a, b);
        assert_ne!(a, generate_candidate(&t, 12345, 100, 0.3));
    }
}
