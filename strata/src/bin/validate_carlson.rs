// SPDX-License-Identifier: AGPL-3.0-only

//! Validate the Carlson symmetric integrals RC, RF, RD, RJ.
//!
//! Tests: reference values, principal values for negative arguments,
//! diagonal closed forms, RD = RJ(x,y,z,z), homogeneity, the RD cyclic sum,
//! and an f32 vs f64 parity sweep over PCG32-sampled arguments.
//!
//! Reference: Carlson (1995) Numer. Algorithms 10, DLMF §19.20, §19.36
//! Run: cargo run --release --bin validate_carlson -- [--rj=standard|extended] [--samples=2000]

use std::f64::consts::{LN_2, PI};

use strata_equilibrium::data;
use strata_equilibrium::search::Pcg32;
use strata_equilibrium::special::{
    carlson_rc, carlson_rd, carlson_rf, carlson_rj, carlson_rj_with, RjExpansion,
};
use strata_equilibrium::tolerances;
use strata_equilibrium::validation::ValidationHarness;

fn rel(a: f64, b: f64) -> f64 {
    ((a - b) / b).abs()
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(v: f64) -> f32 {
    v as f32
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let expansion = match data::parse_cli_str(&args, "--rj") {
        Some(s) => RjExpansion::parse(s).unwrap_or_else(|| {
            eprintln!("error: unknown RJ expansion '{s}' (standard|extended)");
            std::process::exit(2);
        }),
        None => RjExpansion::Extended,
    };
    let samples = data::parse_cli_usize(&args, "--samples", 2000);

    println!("═══════════════════════════════════════════════════════════");
    println!("  Carlson Symmetric Integrals Validation");
    println!("  Reference: Carlson (1995), DLMF §19.20");
    println!("  RJ expansion: {expansion:?}");
    println!("═══════════════════════════════════════════════════════════\n");

    let mut harness = ValidationHarness::new("carlson");
    let tol = tolerances::CARLSON_REFERENCE_F64;

    // ─── Reference values ───────────────────────────────────────────
    println!("── Reference values ──");
    let rj = |x: f64, y: f64, z: f64, p: f64| carlson_rj_with(x, y, z, p, expansion);
    let refs: Vec<(&str, f64, f64)> = vec![
        ("RC(0, 1/4) = π", carlson_rc(0.0, 0.25), PI),
        ("RC(9/4, 2) = ln 2", carlson_rc(2.25, 2.0), LN_2),
        ("RC(1/4, -2) = ln2/3", carlson_rc(0.25, -2.0), LN_2 / 3.0),
        ("RF(1, 2, 0)", carlson_rf(1.0, 2.0, 0.0), 1.311_028_777_146_06),
        ("RF(2, 3, 4)", carlson_rf(2.0, 3.0, 4.0), 0.584_082_841_677_151_7),
        ("RD(0, 2, 1)", carlson_rd(0.0, 2.0, 1.0), 1.797_210_352_103_389),
        ("RD(2, 3, 4)", carlson_rd(2.0, 3.0, 4.0), 0.165_105_272_942_610_5),
        ("RJ(0, 1, 2, 3)", rj(0.0, 1.0, 2.0, 3.0), 0.776_886_237_785_823_3),
        ("RJ(2, 3, 4, 5)", rj(2.0, 3.0, 4.0, 5.0), 0.142_975_796_671_567_5),
        ("RJ(2, 3, 4, -0.5)", rj(2.0, 3.0, 4.0, -0.5), 0.247_238_197_030_515_86),
        ("RJ(2, 3, 4, -5)", rj(2.0, 3.0, 4.0, -5.0), -0.127_112_300_429_639_1),
    ];
    for (label, got, expected) in &refs {
        println!("  {label:22} = {got:.15}  (ref {expected:.15})");
        harness.check_rel(label, *got, *expected, tol);
    }
    println!();

    // ─── Identities ─────────────────────────────────────────────────
    println!("── Identities ──");
    let itol = tolerances::CARLSON_IDENTITY_F64;
    let x = 2.7_f64;
    harness.check_rel("RF(x,x,x) = x^-1/2", carlson_rf(x, x, x), x.powf(-0.5), itol);
    harness.check_rel("RD(x,x,x) = x^-3/2", carlson_rd(x, x, x), x.powf(-1.5), itol);
    harness.check_rel("RJ(x,x,x,x) = x^-3/2", rj(x, x, x, x), x.powf(-1.5), itol);
    harness.check_rel("RC(x,x) = x^-1/2", carlson_rc(x, x), x.powf(-0.5), itol);
    for &(x, y, z) in &[(1.0, 2.0, 3.0), (0.0, 0.5, 4.0), (7.0, 0.1, 0.3)] {
        harness.check_rel(
            &format!("RD = RJ(p=z) at ({x},{y},{z})"),
            rj(x, y, z, z),
            carlson_rd(x, y, z),
            itol,
        );
    }
    let (a, b, c) = (1.0_f64, 2.0, 3.0);
    let cyclic = carlson_rd(a, b, c) + carlson_rd(b, c, a) + carlson_rd(c, a, b);
    harness.check_rel("RD cyclic sum = 3/√(xyz)", cyclic, 3.0 / (a * b * c).sqrt(), itol);
    let k = 9.0;
    harness.check_rel(
        "RF homogeneity k^-1/2",
        carlson_rf(k * 0.3, k * 1.1, k * 2.5),
        carlson_rf(0.3, 1.1, 2.5) / 3.0,
        itol,
    );
    harness.check_rel(
        "RJ homogeneity k^-3/2",
        rj(k * 0.3, k * 1.1, k * 2.5, k * 0.8),
        rj(0.3, 1.1, 2.5, 0.8) / 27.0,
        itol,
    );
    harness.check_bits(
        "RJ deterministic",
        carlson_rj(0.4, 1.7, 2.2, 0.9),
        carlson_rj(0.4, 1.7, 2.2, 0.9),
    );
    println!();

    // ─── f32 vs f64 sweep ───────────────────────────────────────────
    println!("── f32 vs f64 parity ({samples} samples in [0.05, 4)) ──");
    let mut rng = Pcg32::new(2024, 7);
    let mut draw = || 0.05 + 3.95 * f64::from(rng.next_f32());
    let (mut worst_rf, mut worst_rd, mut worst_rj) = (0.0_f64, 0.0_f64, 0.0_f64);
    let mut all_finite = true;
    for _ in 0..samples {
        let (x, y, z, p) = (draw(), draw(), draw(), draw());
        let (xf, yf, zf, pf) = (narrow(x), narrow(y), narrow(z), narrow(p));
        // Reference computed from the narrowed arguments widened back.
        let (xw, yw, zw, pw) = (f64::from(xf), f64::from(yf), f64::from(zf), f64::from(pf));
        let rf32 = f64::from(carlson_rf(xf, yf, zf));
        let rd32 = f64::from(carlson_rd(xf, yf, zf));
        let rj32 = f64::from(carlson_rj_with(xf, yf, zf, pf, expansion));
        all_finite &= rf32.is_finite() && rd32.is_finite() && rj32.is_finite();
        worst_rf = worst_rf.max(rel(rf32, carlson_rf(xw, yw, zw)));
        worst_rd = worst_rd.max(rel(rd32, carlson_rd(xw, yw, zw)));
        worst_rj = worst_rj.max(rel(rj32, rj(xw, yw, zw, pw)));
    }
    println!("  worst rel: RF {worst_rf:.3e}  RD {worst_rd:.3e}  RJ {worst_rj:.3e}");
    harness.check_bool("f32 sweep finite", all_finite);
    harness.check_upper("RF f32 parity", worst_rf, tolerances::CARLSON_F32_PARITY);
    harness.check_upper("RD f32 parity", worst_rd, tolerances::CARLSON_F32_PARITY);
    harness.check_upper("RJ f32 parity", worst_rj, tolerances::CARLSON_F32_PARITY);

    harness.finish();
}
