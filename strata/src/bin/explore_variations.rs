// SPDX-License-Identifier: AGPL-3.0-only

//! Run one variation batch over a layered template and report the winners.
//!
//! Run: cargo run --release --bin explore_variations -- \
//!        --template=data/three_layer.json --n=4096 --temperature=0.01
//!
//! Options (all `--key=value`):
//!   --template     JSON template, or packed binary for any other extension
//!   --config       JSON `SearchConfig`; command-line keys override it
//!   --n --seed --temperature --threshold --precision --group-size --top-k
//!   --keep-candidates   retain every scored candidate (needed for --records)
//!   --out          write the batch summary and top candidates as JSON
//!   --records      write all candidates as packed model records
//!
//! Set `RUST_LOG=debug` for per-group winners.

use std::path::{Path, PathBuf};
use std::time::Instant;

use strata_equilibrium::data;
use strata_equilibrium::search::{SearchConfig, VariationSearch};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Layered Equilibrium — Variation Search                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let template_path = data::parse_cli_str(&args, "--template").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/three_layer.json"),
        PathBuf::from,
    );
    let template = data::load_template(&template_path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    });

    let base = match data::parse_cli_str(&args, "--config") {
        Some(path) => load_config(Path::new(path)),
        None => SearchConfig::default(),
    };
    let config = base.with_args(&args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    });

    println!("  Template:     {}", template_path.display());
    println!("  Layers:       {}", template.num_layers());
    println!("  L:            {:.6}", template.angular_momentum);
    println!("  Candidates:   {}", config.num_variations);
    println!("  Groups:       {} × {}", config.num_groups(), config.group_size);
    println!("  Seed:         {}", config.seed);
    println!("  Temperature:  {}", config.annealing_temperature);
    println!("  Threshold:    {}", config.error_threshold);
    println!("  Precision:    {}", config.precision);
    println!();

    let search = VariationSearch::new(&template, config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    });

    let t0 = Instant::now();
    let result = search.run().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let elapsed = t0.elapsed();

    let s = &result.best.stats;
    println!("── Best candidate ─────────────────────────────────────────");
    println!("  index            {}", result.best_index);
    println!("  score            {:.10e}", result.best_score);
    println!("  rel_err          {:.10e}", s.rel_equipotential_err);
    println!("  total energy     {:.10e}", s.total_energy);
    println!("  potential        {:.10e}", s.potential_energy);
    println!("  kinetic          {:.10e}", s.kinetic_energy);
    println!("  I                {:.10e}", s.moment_of_inertia);
    println!("  ω                {:.10e}", s.angular_velocity);
    println!("  virial 2T/|W|    {:.6}", s.virial_ratio);
    for (i, l) in result.best.layers.iter().enumerate() {
        println!(
            "  layer {i:2}  a={:.6} b={:.6} c={:.6}  ρ={:.4}",
            l.a, l.b, l.c, l.density
        );
    }
    println!();

    let top = search.top_k(&result, search.config().top_k);
    println!("── Top {} ───────────────────────────────────────────────────", top.len());
    println!("  {:>8}  {:>16}  {:>16}  {:>16}", "index", "score", "rel_err", "energy");
    for (i, m) in &top {
        println!(
            "  {i:>8}  {:>16.8e}  {:>16.8e}  {:>16.8e}",
            m.stats.score, m.stats.rel_equipotential_err, m.stats.total_energy
        );
    }
    println!();

    let summary = &result.summary;
    println!("  Valid / invalid: {} / {}", summary.valid, summary.invalid);
    if let Some(mean) = summary.mean_valid_score {
        println!("  Mean valid score: {mean:.8e}");
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = summary.evaluated as f64 / elapsed.as_secs_f64().max(f64::MIN_POSITIVE);
    println!("  Wall time: {:.3} s ({rate:.0} candidates/s)", elapsed.as_secs_f64());

    if let Some(out) = data::parse_cli_str(&args, "--out") {
        let top_json: Vec<serde_json::Value> = top
            .iter()
            .map(|(i, m)| serde_json::json!({ "index": i, "model": m }))
            .collect();
        let report = serde_json::json!({
            "template": template_path.display().to_string(),
            "config": search.config(),
            "best_index": result.best_index,
            "best_score": result.best_score,
            "best": result.best,
            "top": top_json,
            "summary": result.summary,
            "elapsed_s": elapsed.as_secs_f64(),
        });
        match data::save_results_json(Path::new(out), &report) {
            Ok(path) => println!("  Results saved to: {}", path.display()),
            Err(e) => eprintln!("  Failed to save results: {e}"),
        }
    }

    if let Some(path) = data::parse_cli_str(&args, "--records") {
        match &result.candidates {
            Some(all) => match data::write_records(Path::new(path), all) {
                Ok(()) => println!("  {} records written to: {path}", all.len()),
                Err(e) => eprintln!("  Failed to write records: {e}"),
            },
            None => eprintln!("  --records needs --keep-candidates"),
        }
    }
}

fn load_config(path: &Path) -> SearchConfig {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: read {}: {e}", path.display());
        std::process::exit(2);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: parse {}: {e}", path.display());
        std::process::exit(2);
    })
}
