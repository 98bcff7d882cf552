// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: template files and packed model records on disk.

use std::io::Write;

use strata_equilibrium::data;
use strata_equilibrium::error::StrataError;
use strata_equilibrium::model::Layer;
use strata_equilibrium::search::{run_batch, SearchConfig};
use strata_equilibrium::wire::{self, ModelRecord};

const THREE_LAYER: &str = r#"{
  "angular_momentum": 4.01,
  "layers": [
    { "abc": [0.99, 1.0, 1.01], "density": 1.05 },
    { "abc": [1.98, 2.0, 2.02], "density": 2.10 },
    { "abc": [2.97, 3.0, 3.03], "density": 3.15 }
  ]
}"#;

fn write_json(text: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("temp file");
    f.write_all(text.as_bytes()).expect("write");
    f
}

#[test]
fn json_and_binary_templates_load_the_same_model() {
    let json = write_json(THREE_LAYER);
    let from_json = data::load_template(json.path()).expect("json template");
    assert_eq!(from_json.num_layers(), 3);

    let dir = tempfile::tempdir().expect("temp dir");
    let bin = dir.path().join("three_layer.tpl");
    std::fs::write(&bin, wire::encode_template(&from_json).expect("encode")).expect("write");
    let from_bin = data::load_template(&bin).expect("binary template");
    assert_eq!(from_bin.layers, from_json.layers);
    assert_eq!(
        from_bin.angular_momentum.to_bits(),
        from_json.angular_momentum.to_bits()
    );
}

#[test]
fn inconsistent_radius_rejected_on_load() {
    let json = write_json(
        r#"{"angular_momentum": 1.0, "layers": [{"abc": [1.0, 2.0, 3.0], "r": 1.5, "density": 1.0}]}"#,
    );
    let err = data::load_template(json.path()).expect_err("radius disagrees with abc");
    assert!(matches!(err, StrataError::InconsistentRadius { index: 0, .. }));
}

#[test]
fn empty_template_rejected_on_load() {
    let json = write_json(r#"{"angular_momentum": 1.0, "layers": []}"#);
    assert!(matches!(
        data::load_template(json.path()),
        Err(StrataError::EmptyModel)
    ));
}

#[test]
fn batch_candidates_persist_as_records() {
    let json = write_json(THREE_LAYER);
    let template = data::load_template(json.path()).expect("template");
    let cfg = SearchConfig {
        num_variations: 48,
        group_size: 16,
        annealing_temperature: 0.05,
        keep_candidates: true,
        ..SearchConfig::default()
    };
    let result = run_batch(&template, cfg).expect("batch");
    let candidates = result.candidates.expect("kept");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("batch.bin");
    data::write_records(&path, &candidates).expect("write records");
    assert_eq!(
        std::fs::metadata(&path).expect("metadata").len(),
        48 * std::mem::size_of::<ModelRecord>() as u64
    );

    let back = data::read_records(&path).expect("read records");
    assert_eq!(back.len(), 48);
    let best = &back[result.best_index];
    assert_eq!(best.layers, result.best.layers);
    assert_eq!(
        best.stats.rel_equipotential_err.to_bits(),
        result.best.stats.rel_equipotential_err.to_bits()
    );
    assert_eq!(
        best.stats.total_energy.to_bits(),
        result.best.stats.total_energy.to_bits()
    );
}

#[test]
fn truncated_record_file_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("short.bin");
    let m = strata_equilibrium::model::Model::new(0.0, vec![Layer::sphere(1.0, 1.0)])
        .expect("model");
    let mut bytes = wire::encode_records(&[m]).expect("encode");
    bytes.pop();
    std::fs::write(&path, bytes).expect("write");
    assert!(matches!(
        data::read_records(&path),
        Err(StrataError::RecordLayout(_))
    ));
}

#[test]
fn results_json_round_trips_through_serde() {
    let json = write_json(THREE_LAYER);
    let template = data::load_template(json.path()).expect("template");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("out").join("template.json");
    let value = serde_json::to_value(
        strata_equilibrium::model::ModelTemplate::from(&template),
    )
    .expect("serialize");
    data::save_results_json(&path, &value).expect("save");
    let reloaded = data::load_template(&path).expect("reload");
    assert_eq!(reloaded.layers, template.layers);
}
