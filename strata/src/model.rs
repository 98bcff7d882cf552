// SPDX-License-Identifier: AGPL-3.0-only

//! Layered ellipsoidal body: layers, models and their derived statistics.
//!
//! Storage is always f64 regardless of the working precision used to score
//! a model. Layers are ordered innermost first; the statistics engine checks
//! nesting instead of assuming it.

use crate::error::StrataError;
use crate::tolerances::{INVALID_SCORE_SENTINEL, RADIUS_CONSISTENCY_REL};
use serde::{Deserialize, Serialize};

/// Layer capacity of a persisted model record.
pub const MAX_LAYERS: usize = 20;

/// One homogeneous ellipsoidal shell (its outer surface and density).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Semi-axis along x.
    pub a: f64,
    /// Semi-axis along y.
    pub b: f64,
    /// Semi-axis along z (rotation axis).
    pub c: f64,
    /// Volume-equivalent radius `cbrt(abc)`; informational.
    pub volumetric_radius: f64,
    /// Mass density in units where G = 1.
    pub density: f64,
}

impl Layer {
    /// Layer with the given semi-axes; the volumetric radius is derived.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, density: f64) -> Self {
        Self {
            a,
            b,
            c,
            volumetric_radius: (a * b * c).cbrt(),
            density,
        }
    }

    /// Spherical layer of radius `r`.
    #[must_use]
    pub const fn sphere(r: f64, density: f64) -> Self {
        Self {
            a: r,
            b: r,
            c: r,
            volumetric_radius: r,
            density,
        }
    }

    /// Semi-axes as `[a, b, c]`.
    #[must_use]
    pub const fn semi_axes(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// Copy with each semi-axis multiplied; radius and density carried over.
    #[must_use]
    pub fn scaled(&self, mul_a: f64, mul_b: f64, mul_c: f64) -> Self {
        Self {
            a: self.a * mul_a,
            b: self.b * mul_b,
            c: self.c * mul_c,
            ..*self
        }
    }

    /// Whether this layer strictly exceeds `inner` along all three axes.
    #[must_use]
    pub fn strictly_encloses(&self, inner: &Self) -> bool {
        self.a > inner.a && self.b > inner.b && self.c > inner.c
    }

    /// Reject non-finite or non-positive semi-axes and density.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidLayer`] naming the offending field.
    pub fn validate(&self, index: usize) -> Result<(), StrataError> {
        let fields = [
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("density", self.density),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(StrataError::InvalidLayer {
                    index,
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Derived statistics of a scored model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelStats {
    /// Mean over layers of the per-surface equipotential spread.
    pub rel_equipotential_err: f64,
    /// Potential plus rotational kinetic energy.
    pub total_energy: f64,
    /// Moment of inertia about the z axis.
    pub moment_of_inertia: f64,
    /// L / I.
    pub angular_velocity: f64,
    /// Sum of layer self-energies.
    pub potential_energy: f64,
    /// ½Iω².
    pub kinetic_energy: f64,
    /// 2KE / |PE|.
    pub virial_ratio: f64,
    /// Search objective; lower is better.
    pub score: f64,
}

impl ModelStats {
    /// Statistics of a structurally invalid model: error and score carry the
    /// sentinel, everything else is zero.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            rel_equipotential_err: INVALID_SCORE_SENTINEL,
            total_energy: 0.0,
            moment_of_inertia: 0.0,
            angular_velocity: 0.0,
            potential_energy: 0.0,
            kinetic_energy: 0.0,
            virial_ratio: 0.0,
            score: INVALID_SCORE_SENTINEL,
        }
    }

    /// Whether the score is finite and below the sentinel.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.score.is_finite() && self.score < INVALID_SCORE_SENTINEL
    }
}

/// A rotating body of nested homogeneous layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Total angular momentum about z (may be zero).
    pub angular_momentum: f64,
    /// Layers, innermost first.
    pub layers: Vec<Layer>,
    /// Filled in by the statistics engine.
    #[serde(flatten, default)]
    pub stats: ModelStats,
}

impl Model {
    /// Validated model with unset statistics.
    ///
    /// # Errors
    ///
    /// Rejects empty models, more than [`MAX_LAYERS`] layers, a non-finite
    /// angular momentum and invalid layers.
    pub fn new(angular_momentum: f64, layers: Vec<Layer>) -> Result<Self, StrataError> {
        let model = Self {
            angular_momentum,
            layers,
            stats: ModelStats::default(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Number of layers.
    #[must_use]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Checks applied to a template before a batch starts.
    ///
    /// Nesting is not checked here; a template that violates it scores the
    /// sentinel like any other invalid candidate.
    ///
    /// # Errors
    ///
    /// See [`Model::new`].
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.layers.is_empty() {
            return Err(StrataError::EmptyModel);
        }
        if self.layers.len() > MAX_LAYERS {
            return Err(StrataError::TooManyLayers {
                count: self.layers.len(),
                max: MAX_LAYERS,
            });
        }
        if !self.angular_momentum.is_finite() {
            return Err(StrataError::InvalidConfig(format!(
                "angular momentum must be finite, got {}",
                self.angular_momentum
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate(i)?;
        }
        Ok(())
    }

    /// Same model with new layers and cleared statistics.
    #[must_use]
    pub fn with_layers(&self, layers: Vec<Layer>) -> Self {
        Self {
            angular_momentum: self.angular_momentum,
            layers,
            stats: ModelStats::default(),
        }
    }

    /// Build from the JSON template description.
    ///
    /// # Errors
    ///
    /// Propagates layer and model validation failures.
    pub fn from_template(template: &ModelTemplate) -> Result<Self, StrataError> {
        let layers = template
            .layers
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.to_layer(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(template.angular_momentum, layers)
    }
}

/// Template file contents: `{ "angular_momentum": L, "layers": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    /// Total angular momentum.
    pub angular_momentum: f64,
    /// Layers, innermost first.
    pub layers: Vec<LayerSpec>,
}

/// One template layer: semi-axes, a sphere radius, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Semi-axes `[a, b, c]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abc: Option<[f64; 3]>,
    /// Sphere radius, or the volumetric radius when `abc` is also given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    /// Layer density.
    pub density: f64,
}

impl LayerSpec {
    /// Resolve into a [`Layer`].
    ///
    /// # Errors
    ///
    /// [`StrataError::InvalidLayer`] when neither `abc` nor `r` is given or a
    /// value is out of range, [`StrataError::InconsistentRadius`] when both
    /// are given and disagree.
    pub fn to_layer(&self, index: usize) -> Result<Layer, StrataError> {
        let layer = match (self.abc, self.r) {
            (Some([a, b, c]), None) => Layer::new(a, b, c, self.density),
            (None, Some(r)) => Layer::sphere(r, self.density),
            (Some([a, b, c]), Some(r)) => {
                let layer = Layer::new(a, b, c, self.density);
                let derived = layer.volumetric_radius;
                if !r.is_finite() || ((r - derived) / derived).abs() > RADIUS_CONSISTENCY_REL {
                    return Err(StrataError::InconsistentRadius {
                        index,
                        given: r,
                        derived,
                    });
                }
                layer
            }
            (None, None) => {
                return Err(StrataError::InvalidLayer {
                    index,
                    reason: "needs `abc` or `r`".into(),
                })
            }
        };
        layer.validate(index)?;
        Ok(layer)
    }
}

impl From<&Layer> for LayerSpec {
    fn from(layer: &Layer) -> Self {
        Self {
            abc: Some(layer.semi_axes()),
            r: None,
            density: layer.density,
        }
    }
}

impl From<&Model> for ModelTemplate {
    fn from(model: &Model) -> Self {
        Self {
            angular_momentum: model.angular_momentum,
            layers: model.layers.iter().map(LayerSpec::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tolerances::EXACT_F64;

    #[test]
    fn layer_new_derives_radius() {
        let l = Layer::new(4.0, 2.0, 1.0, 1.0);
        assert!((l.volumetric_radius - 2.0).abs() < EXACT_F64);
    }

    #[test]
    fn scaled_keeps_radius_and_density() {
        let l = Layer::new(1.0, 2.0, 3.0, 5.0);
        let s = l.scaled(2.0, 0.5, 1.0);
        assert_eq!(s.semi_axes(), [2.0, 1.0, 3.0]);
        assert_eq!(s.volumetric_radius.to_bits(), l.volumetric_radius.to_bits());
        assert_eq!(s.density.to_bits(), l.density.to_bits());
    }

    #[test]
    fn strict_enclosure_requires_all_axes() {
        let inner = Layer::new(1.0, 1.0, 1.0, 1.0);
        assert!(Layer::new(2.0, 2.0, 2.0, 1.0).strictly_encloses(&inner));
        assert!(!Layer::new(2.0, 2.0, 1.0, 1.0).strictly_encloses(&inner));
        assert!(!inner.strictly_encloses(&inner));
    }

    #[test]
    fn validate_rejects_nonpositive_density() {
        let err = Layer::new(1.0, 1.0, 1.0, 0.0).validate(3).unwrap_err();
        assert!(matches!(err, StrataError::InvalidLayer { index: 3, .. }));
    }

    #[test]
    fn validate_rejects_nan_axis() {
        assert!(Layer::new(f64::NAN, 1.0, 1.0, 1.0).validate(0).is_err());
    }

    #[test]
    fn model_rejects_empty() {
        assert_eq!(Model::new(1.0, vec![]).unwrap_err(), StrataError::EmptyModel);
    }

    #[test]
    fn model_rejects_too_many_layers() {
        let layers = (1..=21).map(|i| Layer::sphere(f64::from(i), 1.0)).collect();
        assert!(matches!(
            Model::new(0.0, layers).unwrap_err(),
            StrataError::TooManyLayers { count: 21, max: 20 }
        ));
    }

    #[test]
    fn template_sphere_from_radius() {
        let json = r#"{"angular_momentum": 0.0, "layers": [{"r": 1.5, "density": 2.0}]}"#;
        let t: ModelTemplate = serde_json::from_str(json).unwrap();
        let m = Model::from_template(&t).unwrap();
        assert_eq!(m.layers[0], Layer::sphere(1.5, 2.0));
    }

    #[test]
    fn template_abc_with_consistent_radius() {
        let json = r#"{"angular_momentum": 4.01, "layers": [
            {"abc": [4.0, 2.0, 1.0], "r": 2.0, "density": 1.0}]}"#;
        let t: ModelTemplate = serde_json::from_str(json).unwrap();
        let m = Model::from_template(&t).unwrap();
        assert_eq!(m.layers[0].semi_axes(), [4.0, 2.0, 1.0]);
    }

    #[test]
    fn template_inconsistent_radius_rejected() {
        let json = r#"{"angular_momentum": 0.0, "layers": [
            {"abc": [4.0, 2.0, 1.0], "r": 2.1, "density": 1.0}]}"#;
        let t: ModelTemplate = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Model::from_template(&t).unwrap_err(),
            StrataError::InconsistentRadius { index: 0, .. }
        ));
    }

    #[test]
    fn template_layer_without_geometry_rejected() {
        let spec = LayerSpec {
            abc: None,
            r: None,
            density: 1.0,
        };
        assert!(matches!(
            spec.to_layer(1).unwrap_err(),
            StrataError::InvalidLayer { index: 1, .. }
        ));
    }

    #[test]
    fn model_json_flattens_stats() {
        let m = Model::new(1.0, vec![Layer::sphere(1.0, 1.0)]).unwrap();
        let v = serde_json::to_value(&m).unwrap();
        assert!(v.get("rel_equipotential_err").is_some());
        assert!(v.get("score").is_some());
        assert!(v.get("stats").is_none());
    }

    #[test]
    fn template_from_model_round_trips_geometry() {
        let m = Model::new(2.0, vec![Layer::new(1.0, 2.0, 3.0, 4.0)]).unwrap();
        let back = Model::from_template(&ModelTemplate::from(&m)).unwrap();
        assert_eq!(back.layers, m.layers);
    }

    #[test]
    fn invalid_stats_carry_sentinel() {
        let s = ModelStats::invalid();
        assert!(!s.is_valid());
        assert!(s.score >= INVALID_SCORE_SENTINEL);
    }
}
