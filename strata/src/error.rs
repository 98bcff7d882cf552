// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for template loading, configuration and record encoding.
//!
//! Numerical kernels never return these: degenerate arguments are floored
//! and structurally invalid candidates are scored with a sentinel. Errors
//! are reserved for input that must be rejected before a batch starts.

use std::fmt;

/// Errors arising from model validation, configuration, or data loading.
#[derive(Debug, Clone, PartialEq)]
pub enum StrataError {
    /// A model with no layers cannot be scored (zero moment of inertia).
    EmptyModel,

    /// A layer has a non-positive or non-finite semi-axis or density.
    InvalidLayer {
        /// Position of the offending layer (innermost = 0).
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Layer gave both `abc` and `r`, and `r` is not `cbrt(a·b·c)`.
    InconsistentRadius {
        /// Position of the offending layer.
        index: usize,
        /// Radius supplied by the caller.
        given: f64,
        /// Volume-equivalent radius derived from the semi-axes.
        derived: f64,
    },

    /// More layers than a persisted model record can hold.
    TooManyLayers {
        /// Number of layers requested.
        count: usize,
        /// Record capacity.
        max: usize,
    },

    /// Search or CLI configuration rejected by validation.
    InvalidConfig(String),

    /// Template or result file could not be read, parsed or written.
    DataLoad(String),

    /// A byte buffer does not match the persisted record layout.
    RecordLayout(String),
}

impl fmt::Display for StrataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModel => write!(f, "Model has no layers"),
            Self::InvalidLayer { index, reason } => write!(f, "Invalid layer {index}: {reason}"),
            Self::InconsistentRadius {
                index,
                given,
                derived,
            } => write!(
                f,
                "Layer {index}: radius {given} inconsistent with semi-axes (cbrt(abc) = {derived})"
            ),
            Self::TooManyLayers { count, max } => {
                write!(f, "Model has {count} layers, record capacity is {max}")
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::DataLoad(msg) => write!(f, "Data loading failed: {msg}"),
            Self::RecordLayout(msg) => write!(f, "Record layout mismatch: {msg}"),
        }
    }
}

impl std::error::Error for StrataError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_model() {
        assert_eq!(StrataError::EmptyModel.to_string(), "Model has no layers");
    }

    #[test]
    fn display_invalid_layer() {
        let err = StrataError::InvalidLayer {
            index: 2,
            reason: "density must be positive".into(),
        };
        assert_eq!(err.to_string(), "Invalid layer 2: density must be positive");
    }

    #[test]
    fn display_too_many_layers() {
        let err = StrataError::TooManyLayers { count: 25, max: 20 };
        assert!(err.to_string().contains("25"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn display_inconsistent_radius_mentions_cbrt() {
        let err = StrataError::InconsistentRadius {
            index: 0,
            given: 1.5,
            derived: 1.0,
        };
        assert!(err.to_string().contains("cbrt(abc)"));
    }

    #[test]
    fn error_trait_works() {
        let err = StrataError::DataLoad("missing file".into());
        let dyn_err: &dyn std::error::Error = &err;
        assert_eq!(dyn_err.to_string(), "Data loading failed: missing file");
    }
}
