// SPDX-License-Identifier: AGPL-3.0-only

//! Batch configuration for the variation search.

use crate::data::{has_cli_flag, parse_cli_f64, parse_cli_str, parse_cli_usize};
use crate::error::StrataError;
use crate::precision::Precision;
use serde::{Deserialize, Serialize};

/// Default number of candidates per worker group.
pub const DEFAULT_GROUP_SIZE: usize = 256;

/// Parameters of one search batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct SearchConfig {
    /// Number of candidates N.
    pub num_variations: usize,
    /// Global seed; candidate `i` draws from the stream keyed `(seed + i, i)`.
    pub seed: u32,
    /// Log₂ width of the perturbation; 0 reproduces the template.
    pub annealing_temperature: f64,
    /// 0 scores the equipotential error; positive gates kinetic energy.
    pub error_threshold: f64,
    /// Working width of the statistics engine.
    pub precision: Precision,
    /// Candidates per worker group.
    pub group_size: usize,
    /// Keep every scored candidate in the batch result.
    pub keep_candidates: bool,
    /// Number of best candidates to report.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_variations: 4096,
            seed: 12345,
            annealing_temperature: 0.001,
            error_threshold: 0.0,
            precision: Precision::Double,
            group_size: DEFAULT_GROUP_SIZE,
            keep_candidates: false,
            top_k: 5,
        }
    }
}

impl SearchConfig {
    /// Reject settings the search cannot run with.
    ///
    /// # Errors
    ///
    /// [`StrataError::InvalidConfig`] for an empty batch, a zero group size,
    /// more candidates than the 32-bit stream key can address, or a negative
    /// or non-finite temperature or threshold.
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.num_variations == 0 {
            return Err(StrataError::InvalidConfig("num_variations must be > 0".into()));
        }
        if u32::try_from(self.num_variations).is_err() {
            return Err(StrataError::InvalidConfig(format!(
                "num_variations {} exceeds the 32-bit candidate key",
                self.num_variations
            )));
        }
        if self.group_size == 0 {
            return Err(StrataError::InvalidConfig("group_size must be > 0".into()));
        }
        if !(self.annealing_temperature.is_finite() && self.annealing_temperature >= 0.0) {
            return Err(StrataError::InvalidConfig(format!(
                "annealing_temperature must be finite and >= 0, got {}",
                self.annealing_temperature
            )));
        }
        if !(self.error_threshold.is_finite() && self.error_threshold >= 0.0) {
            return Err(StrataError::InvalidConfig(format!(
                "error_threshold must be finite and >= 0, got {}",
                self.error_threshold
            )));
        }
        Ok(())
    }

    /// Number of worker groups, the last possibly partial.
    #[must_use]
    pub const fn num_groups(&self) -> usize {
        self.num_variations.div_ceil(self.group_size)
    }

    /// Override fields from `--key=value` arguments; absent keys keep the
    /// current value.
    ///
    /// Recognised: `--n`, `--seed`, `--temperature`, `--threshold`,
    /// `--precision`, `--group-size`, `--top-k`, `--keep-candidates`.
    ///
    /// # Errors
    ///
    /// Unknown precision names, out-of-range seeds and failed validation.
    pub fn with_args(mut self, args: &[String]) -> Result<Self, StrataError> {
        self.num_variations = parse_cli_usize(args, "--n", self.num_variations);
        let seed = parse_cli_usize(args, "--seed", self.seed as usize);
        self.seed = u32::try_from(seed)
            .map_err(|_| StrataError::InvalidConfig(format!("seed {seed} does not fit in u32")))?;
        self.annealing_temperature =
            parse_cli_f64(args, "--temperature", self.annealing_temperature);
        self.error_threshold = parse_cli_f64(args, "--threshold", self.error_threshold);
        if let Some(p) = parse_cli_str(args, "--precision") {
            self.precision = Precision::parse(p)
                .ok_or_else(|| StrataError::InvalidConfig(format!("unknown precision '{p}'")))?;
        }
        self.group_size = parse_cli_usize(args, "--group-size", self.group_size);
        self.top_k = parse_cli_usize(args, "--top-k", self.top_k);
        self.keep_candidates |= has_cli_flag(args, "--keep-candidates");
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn default_is_valid() {
        let c = SearchConfig::default();
        c.validate().unwrap();
        assert_eq!(c.group_size, 256);
        assert_eq!(c.precision, Precision::Double);
    }

    #[test]
    fn num_groups_rounds_up() {
        let c = SearchConfig {
            num_variations: 513,
            ..SearchConfig::default()
        };
        assert_eq!(c.num_groups(), 3);
    }

    #[test]
    fn rejects_bad_values() {
        let base = SearchConfig::default();
        for bad in [
            SearchConfig { num_variations: 0, ..base.clone() },
            SearchConfig { group_size: 0, ..base.clone() },
            SearchConfig { annealing_temperature: -1.0, ..base.clone() },
            SearchConfig { error_threshold: f64::NAN, ..base.clone() },
        ] {
            assert!(matches!(bad.validate(), Err(StrataError::InvalidConfig(_))));
        }
    }

    #[test]
    fn args_override_defaults() {
        let c = SearchConfig::default()
            .with_args(&args(&[
                "--n=100",
                "--seed=7",
                "--temperature=0.5",
                "--precision=single",
                "--keep-candidates",
            ]))
            .unwrap();
        assert_eq!(c.num_variations, 100);
        assert_eq!(c.seed, 7);
        assert!((c.annealing_temperature - 0.5).abs() < f64::EPSILON);
        assert_eq!(c.precision, Precision::Single);
        assert!(c.keep_candidates);
        assert_eq!(c.group_size, DEFAULT_GROUP_SIZE);
    }

    #[test]
    fn args_reject_unknown_precision() {
        let err = SearchConfig::default()
            .with_args(&args(&["--precision=quad"]))
            .unwrap_err();
        assert!(err.to_string().contains("quad"));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let c: SearchConfig = serde_json::from_str(r#"{"seed": 3, "precision": "single"}"#).unwrap();
        assert_eq!(c.seed, 3);
        assert_eq!(c.precision, Precision::Single);
        assert_eq!(c.group_size, DEFAULT_GROUP_SIZE);
    }
}
