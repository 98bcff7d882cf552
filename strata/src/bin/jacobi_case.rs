// SPDX-License-Identifier: AGPL-3.0-only

//! Solve a Jacobi ellipsoid (abc = 1, unit density) and emit it as a
//! one-layer template carrying its equilibrium angular momentum.
//!
//! With `--c=<polar>` a Maclaurin spheroid with equatorial radius `a` is
//! produced instead. The emitted template scores an equipotential error at
//! roundoff level when fed back to `explore_variations` at `--temperature=0`.
//!
//! Run: cargo run --release --bin jacobi_case -- --a=1.3 [--rj=extended] [--out=jacobi.json]

use std::path::Path;

use strata_equilibrium::data;
use strata_equilibrium::model::ModelTemplate;
use strata_equilibrium::physics::{
    evaluate_with, jacobi_ellipsoid, maclaurin_spheroid, ScoringPolicy,
};
use strata_equilibrium::precision::Precision;
use strata_equilibrium::special::RjExpansion;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let a = data::parse_cli_f64(&args, "--a", 1.3);
    let expansion = match data::parse_cli_str(&args, "--rj") {
        Some(s) => RjExpansion::parse(s).unwrap_or_else(|| {
            eprintln!("error: unknown RJ expansion '{s}' (standard|extended)");
            std::process::exit(2);
        }),
        None => Precision::Double.default_rj_expansion(),
    };

    let figure = match data::parse_cli_str(&args, "--c") {
        Some(c) => {
            let c: f64 = c.parse().unwrap_or_else(|e| {
                eprintln!("error: --c: {e}");
                std::process::exit(2);
            });
            maclaurin_spheroid(a, c, 1.0)
        }
        None => jacobi_ellipsoid(a, expansion),
    }
    .unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let model = figure.to_model().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let stats = evaluate_with(&model, ScoringPolicy::default(), Precision::Double).stats;
    log::info!(
        "figure a={} b={} c={} ω²={} rel_err={:.3e}",
        figure.a,
        figure.b,
        figure.c,
        figure.omega_squared,
        stats.rel_equipotential_err
    );

    eprintln!("  a        {:.12}", figure.a);
    eprintln!("  b        {:.12}", figure.b);
    eprintln!("  c        {:.12}", figure.c);
    eprintln!("  ω²       {:.12}", figure.omega_squared);
    eprintln!("  L = Iω   {:.12}", model.angular_momentum);
    eprintln!("  rel_err  {:.3e}", stats.rel_equipotential_err);

    let template = ModelTemplate::from(&model);
    let value = serde_json::to_value(&template).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    match data::parse_cli_str(&args, "--out") {
        Some(out) => match data::save_results_json(Path::new(out), &value) {
            Ok(path) => eprintln!("  Template saved to: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        None => println!("{value:#}"),
    }
}
