// SPDX-License-Identifier: AGPL-3.0-only

//! Validate the ellipsoid potential model and the statistics engine
//! against closed forms.
//!
//! Checks: homogeneous sphere (centre, surface, exterior), point-mass limit,
//! surface continuity, axial symmetry of spheroids, triaxial ordering,
//! sphere self-energy, and the Maclaurin/Jacobi equilibrium figures scored
//! by the layered engine.
//!
//! Reference: Chandrasekhar, *Ellipsoidal Figures of Equilibrium* (1969)
//! Run: cargo run --release --bin validate_potential

use std::f64::consts::PI;

use strata_equilibrium::physics::{
    evaluate_with, figures, jacobi_ellipsoid, maclaurin_spheroid, Axis, Ellipsoid, ScoringPolicy,
};
use strata_equilibrium::precision::Precision;
use strata_equilibrium::special::RjExpansion;
use strata_equilibrium::tolerances;
use strata_equilibrium::validation::ValidationHarness;

fn main() {
    println!("═══════════════════════════════════════════════════════════");
    println!("  Ellipsoid Potential Validation");
    println!("  Reference: Chandrasekhar (1969), closed-form sphere");
    println!("═══════════════════════════════════════════════════════════\n");

    let mut harness = ValidationHarness::new("potential");

    // ─── Homogeneous sphere ─────────────────────────────────────────
    println!("── Homogeneous sphere, unit density ──");
    for r in [0.5, 1.0, 2.5] {
        let s = Ellipsoid::<f64>::sphere(r);
        let centre = s.potential_interior(Axis::X, 0.0);
        let surface = s.potential_surface(Axis::Z);
        let outside = s.potential_exterior(Axis::Y, 3.0 * r);
        println!("  R={r}: Φ(0)={centre:.10}  Φ(R)={surface:.10}  Φ(3R)={outside:.10}");
        harness.check_rel(
            &format!("sphere R={r} centre 2πR²"),
            centre,
            2.0 * PI * r * r,
            tolerances::SPHERE_CLOSURE_F64,
        );
        harness.check_rel(
            &format!("sphere R={r} surface 4πR²/3"),
            surface,
            4.0 * PI * r * r / 3.0,
            tolerances::SPHERE_CLOSURE_F64,
        );
        harness.check_rel(
            &format!("sphere R={r} exterior M/3R"),
            outside,
            4.0 * PI * r * r * r / 3.0 / (3.0 * r),
            tolerances::SPHERE_CLOSURE_F64,
        );
    }
    let s32 = Ellipsoid::<f32>::sphere(1.0);
    harness.check_rel(
        "sphere f32 centre 2π",
        f64::from(s32.potential_interior(Axis::X, 0.0)),
        2.0 * PI,
        tolerances::SPHERE_CLOSURE_F32,
    );
    println!();

    // ─── Point-mass limit ───────────────────────────────────────────
    println!("── Point-mass limit (triaxial, x ≫ a) ──");
    let tri = Ellipsoid::<f64>::new(1.5, 1.0, 0.7);
    for x in [1e3, 1e4] {
        let phi = tri.potential_exterior(Axis::X, x);
        let expected = tri.volume() / x;
        println!("  x={x:e}: Φ·x/M = {:.12}", phi / expected);
        harness.check_rel(
            &format!("point mass x={x:e}"),
            phi,
            expected,
            1e-5 * (1e3 / x).powi(2) + tolerances::POINT_MASS_LIMIT,
        );
    }
    println!();

    // ─── Continuity at the surface ──────────────────────────────────
    println!("── Interior/exterior continuity ──");
    for axis in Axis::ALL {
        let s = tri.semi_axis(axis);
        let inside = tri.potential_interior(axis, s);
        let outside = tri.potential_exterior(axis, s);
        harness.check_rel(
            &format!("continuity {axis:?}"),
            outside,
            inside,
            tolerances::SURFACE_CONTINUITY_REL,
        );
    }
    let zero = 0.0;
    let coeff_sum: f64 = Axis::ALL.iter().map(|&ax| tri.axis_coefficient(ax, zero)).sum();
    harness.check_rel("ΣA_i = 2", coeff_sum, 2.0, tolerances::SPHERE_CLOSURE_F64);
    println!();

    // ─── Symmetry and ordering ──────────────────────────────────────
    println!("── Spheroid symmetry, triaxial ordering ──");
    let oblate = Ellipsoid::<f64>::new(1.3, 1.3, 0.8);
    harness.check_rel(
        "oblate Φ(a) = Φ(b)",
        oblate.potential_surface(Axis::X),
        oblate.potential_surface(Axis::Y),
        tolerances::SPHERE_CLOSURE_F64,
    );
    let prolate = Ellipsoid::<f64>::new(1.6, 0.9, 0.9);
    harness.check_rel(
        "prolate Φ(b) = Φ(c)",
        prolate.potential_surface(Axis::Y),
        prolate.potential_surface(Axis::Z),
        tolerances::SPHERE_CLOSURE_F64,
    );
    let p: Vec<f64> = Axis::ALL.iter().map(|&ax| tri.potential_surface(ax)).collect();
    harness.check_bool("triaxial Φ(a) < Φ(b) < Φ(c)", p[0] < p[1] && p[1] < p[2]);
    println!("  triaxial surface Φ = {:.8} {:.8} {:.8}", p[0], p[1], p[2]);
    println!();

    // ─── Self-energy ────────────────────────────────────────────────
    println!("── Sphere self-energy ──");
    let pe = Ellipsoid::<f64>::sphere(1.2).self_energy(2.0);
    let expected = -(4.0 * PI * PI / 5.0) * 4.0 * 1.2_f64.powi(5);
    harness.check_rel("PE sphere −(4π²/5)ρ²R⁵", pe, expected, tolerances::SPHERE_CLOSURE_F64);
    println!("  PE = {pe:.10}");
    println!();

    // ─── Equilibrium figures through the layered engine ─────────────
    println!("── Equilibrium figures ──");
    let policy = ScoringPolicy::default();
    match maclaurin_spheroid(1.2, 0.8, 1.0).and_then(|f| f.to_model()) {
        Ok(model) => {
            let eval = evaluate_with(&model, policy, Precision::Double);
            println!(
                "  Maclaurin (1.2, 0.8): ω={:.10} rel_err={:.3e}",
                eval.stats.angular_velocity, eval.stats.rel_equipotential_err
            );
            harness.check_upper(
                "Maclaurin rel_err",
                eval.stats.rel_equipotential_err,
                tolerances::EQUILIBRIUM_REL_ERR,
            );
            harness.check_lower("Maclaurin ω > 0", eval.stats.angular_velocity, 0.0);
        }
        Err(e) => {
            println!("  Maclaurin failed: {e}");
            harness.check_bool("Maclaurin construction", false);
        }
    }

    for expansion in [RjExpansion::Standard, RjExpansion::Extended] {
        match jacobi_ellipsoid(1.3, expansion) {
            Ok(fig) => {
                println!(
                    "  Jacobi a=1.3 ({expansion:?}): b={:.10} c={:.10} ω²={:.10}",
                    fig.b, fig.c, fig.omega_squared
                );
                harness.check_abs(
                    &format!("Jacobi b ({expansion:?})"),
                    fig.b,
                    1.105_575_570_700_127,
                    1e-8,
                );
                harness.check_lower(
                    &format!("Jacobi ω² > 0 ({expansion:?})"),
                    fig.omega_squared,
                    0.0,
                );
                let scored = fig
                    .to_model()
                    .map(|m| evaluate_with(&m, policy, Precision::Double).stats);
                match scored {
                    Ok(stats) => harness.check_upper(
                        &format!("Jacobi rel_err ({expansion:?})"),
                        stats.rel_equipotential_err,
                        tolerances::EQUILIBRIUM_REL_ERR,
                    ),
                    Err(e) => {
                        println!("  Jacobi model failed: {e}");
                        harness.check_bool("Jacobi model", false);
                    }
                }
            }
            Err(e) => {
                println!("  Jacobi failed: {e}");
                harness.check_bool(&format!("Jacobi solve ({expansion:?})"), false);
            }
        }
    }
    harness.check_bool(
        "no Jacobi root below bifurcation",
        jacobi_ellipsoid(1.15, RjExpansion::Extended).is_err(),
    );
    harness.check_rel(
        "ω² ∝ ρ",
        figures::equilibrium_omega_squared(1.2, 1.2, 0.8, 3.0),
        3.0 * figures::equilibrium_omega_squared(1.2, 1.2, 0.8, 1.0),
        tolerances::EXACT_F64,
    );

    harness.finish();
}
