// SPDX-License-Identifier: AGPL-3.0-only

//! Special functions used by the ellipsoid potential model.

pub mod carlson;

pub use carlson::{carlson_rc, carlson_rd, carlson_rf, carlson_rj, carlson_rj_with, RjExpansion};
