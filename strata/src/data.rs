// SPDX-License-Identifier: AGPL-3.0-only

//! Template loading, result writing and `--key=value` argument helpers.
//!
//! Templates come either as JSON (`.json`, see [`ModelTemplate`]) or as the
//! packed binary layout of [`crate::wire`] (any other extension).

use crate::error::StrataError;
use crate::model::{Model, ModelTemplate};
use crate::wire;
use std::path::{Path, PathBuf};

/// Load a JSON template and build a validated model.
///
/// Uses streaming `from_reader` so the file is never buffered as a string.
///
/// # Errors
///
/// [`StrataError::DataLoad`] when the file cannot be opened or parsed;
/// model validation errors for its contents.
pub fn load_template_json(path: &Path) -> Result<Model, StrataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| StrataError::DataLoad(format!("open {}: {e}", path.display())))?;
    let template: ModelTemplate = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| StrataError::DataLoad(format!("parse {}: {e}", path.display())))?;
    Model::from_template(&template)
}

/// Load a template, choosing the format from the extension.
///
/// # Errors
///
/// See [`load_template_json`] and [`wire::decode_template`].
pub fn load_template(path: &Path) -> Result<Model, StrataError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_template_json(path)
    } else {
        let bytes = std::fs::read(path)
            .map_err(|e| StrataError::DataLoad(format!("read {}: {e}", path.display())))?;
        wire::decode_template(&bytes)
    }
}

/// Write a JSON value pretty-printed to `path`, creating parent directories.
///
/// # Errors
///
/// [`StrataError::DataLoad`] if serialization, directory creation or the
/// write fails.
pub fn save_results_json(path: &Path, value: &serde_json::Value) -> Result<PathBuf, StrataError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| StrataError::DataLoad(format!("create {}: {e}", dir.display())))?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StrataError::DataLoad(format!("JSON serialize: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| StrataError::DataLoad(format!("write {}: {e}", path.display())))?;
    Ok(path.to_path_buf())
}

/// Write models as packed [`wire::ModelRecord`]s.
///
/// # Errors
///
/// Record encoding errors and [`StrataError::DataLoad`] on I/O failure.
pub fn write_records(path: &Path, models: &[Model]) -> Result<(), StrataError> {
    let bytes = wire::encode_records(models)?;
    std::fs::write(path, bytes)
        .map_err(|e| StrataError::DataLoad(format!("write {}: {e}", path.display())))
}

/// Read packed [`wire::ModelRecord`]s.
///
/// # Errors
///
/// [`StrataError::DataLoad`] on I/O failure, record layout errors otherwise.
pub fn read_records(path: &Path) -> Result<Vec<Model>, StrataError> {
    let bytes = std::fs::read(path)
        .map_err(|e| StrataError::DataLoad(format!("read {}: {e}", path.display())))?;
    wire::decode_records(&bytes)
}

/// Parse `--key=value` from CLI args as `usize`, returning `default` if missing or invalid.
#[must_use]
pub fn parse_cli_usize(args: &[String], key: &str, default: usize) -> usize {
    parse_cli_str(args, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse `--key=value` as `f64`, returning `default` if missing or invalid.
#[must_use]
pub fn parse_cli_f64(args: &[String], key: &str, default: f64) -> f64 {
    parse_cli_str(args, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Raw value of `--key=value`, if present.
#[must_use]
pub fn parse_cli_str<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    let prefix = format!("{key}=");
    args.iter().find_map(|a| a.strip_prefix(&prefix))
}

/// Whether the bare flag `--key` is present.
#[must_use]
pub fn has_cli_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::Layer;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn cli_parsing() {
        let a = args(&["bin", "--n=64", "--t=0.5", "--name=x", "--flag"]);
        assert_eq!(parse_cli_usize(&a, "--n", 1), 64);
        assert_eq!(parse_cli_usize(&a, "--missing", 9), 9);
        assert!((parse_cli_f64(&a, "--t", 0.0) - 0.5).abs() < f64::EPSILON);
        assert_eq!(parse_cli_str(&a, "--name"), Some("x"));
        assert!(has_cli_flag(&a, "--flag"));
        assert!(!has_cli_flag(&a, "--n"));
    }

    #[test]
    fn cli_invalid_number_falls_back() {
        let a = args(&["--n=lots"]);
        assert_eq!(parse_cli_usize(&a, "--n", 3), 3);
    }

    #[test]
    fn cli_key_prefix_not_confused() {
        let a = args(&["--nn=5"]);
        assert_eq!(parse_cli_usize(&a, "--n", 3), 3);
    }

    #[test]
    fn load_json_template_from_disk() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            f,
            r#"{{"angular_momentum": 1.0, "layers": [{{"r": 1.0, "density": 2.0}}]}}"#
        )
        .unwrap();
        let m = load_template(f.path()).expect("should parse JSON template");
        assert_eq!(m.layers, vec![Layer::sphere(1.0, 2.0)]);
    }

    #[test]
    fn load_binary_template_from_disk() {
        let m = Model::new(0.5, vec![Layer::new(1.0, 2.0, 3.0, 1.0)]).unwrap();
        let f = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        std::fs::write(f.path(), crate::wire::encode_template(&m).unwrap()).unwrap();
        assert_eq!(load_template(f.path()).unwrap().layers, m.layers);
    }

    #[test]
    fn load_missing_file_errors() {
        let err = load_template(Path::new("/nonexistent/template.json")).unwrap_err();
        assert!(matches!(err, StrataError::DataLoad(_)));
    }

    #[test]
    fn load_malformed_json_errors() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(f, "{{ not json").unwrap();
        assert!(matches!(load_template(f.path()), Err(StrataError::DataLoad(_))));
    }

    #[test]
    fn save_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        save_results_json(&path, &serde_json::json!({"best": 1})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"best\""));
    }

    #[test]
    fn records_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.bin");
        let m = Model::new(1.0, vec![Layer::sphere(1.0, 1.0)]).unwrap();
        write_records(&path, &[m.clone(), m.clone()]).unwrap();
        let back = read_records(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].layers, m.layers);
    }
}
