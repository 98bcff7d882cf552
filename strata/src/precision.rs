// SPDX-License-Identifier: AGPL-3.0-only

//! Working-precision abstraction for the numerical core.
//!
//! Models are always stored in f64. The Carlson kernel, the ellipsoid
//! potentials and the statistics engine are generic over [`Real`] so the
//! same code runs at single or double working width; [`Precision`] selects
//! between them at runtime.

use crate::special::RjExpansion;
use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Floating-point type the numerical core can run at.
pub trait Real:
    Float + FloatConst + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    /// Carlson duplication steps. RJ runs four more.
    const ITERATIONS: usize;

    /// RJ tail polynomial used when no override is given.
    const DEFAULT_RJ_EXPANSION: RjExpansion;

    /// Short name for log lines and reports.
    const NAME: &'static str;

    /// Convert a literal or stored f64 into the working type.
    fn lit(v: f64) -> Self;

    /// Widen back to the f64 storage type.
    fn widen(self) -> f64;
}

impl Real for f32 {
    const ITERATIONS: usize = 8;
    const DEFAULT_RJ_EXPANSION: RjExpansion = RjExpansion::Standard;
    const NAME: &'static str = "f32";

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn lit(v: f64) -> Self {
        v as Self
    }

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }
}

impl Real for f64 {
    const ITERATIONS: usize = 11;
    const DEFAULT_RJ_EXPANSION: RjExpansion = RjExpansion::Extended;
    const NAME: &'static str = "f64";

    #[inline]
    fn lit(v: f64) -> Self {
        v
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

/// Runtime working-precision selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// f32 working width.
    Single,
    /// f64 working width.
    #[default]
    Double,
}

impl Precision {
    /// Parse `single`/`double` (also `f32`/`f64`), case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "f32" => Some(Self::Single),
            "double" | "f64" => Some(Self::Double),
            _ => None,
        }
    }

    /// Default RJ tier for this width.
    #[must_use]
    pub const fn default_rj_expansion(self) -> RjExpansion {
        match self {
            Self::Single => <f32 as Real>::DEFAULT_RJ_EXPANSION,
            Self::Double => <f64 as Real>::DEFAULT_RJ_EXPANSION,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
        }
    }
}
