// tests/config_test.rs
use helm_release::config::{load_config, Config, SourceKind};
use helm_release::HelmReleaseError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.chart.chart_file, "Chart.yaml");
    assert_eq!(config.chart.values_file, "values.yaml");
    assert_eq!(config.chart.tag_path, "image.tag");
    assert!(config.behavior.strict);
    assert_eq!(config.behavior.source, SourceKind::Git);
}

#[test]
fn test_load_fixture() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/helm-release.toml");
    let config = load_config(Some(path.as_path())).unwrap();

    assert_eq!(config.chart.values_file, "values-prod.yaml");
    assert_eq!(config.chart.tag_path, "app.image.tag");
    assert!(!config.behavior.strict);
    assert_eq!(config.behavior.source, SourceKind::Helm);
}

#[test]
fn test_load_partial_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[behavior]
strict = false
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert!(!config.behavior.strict);
    assert_eq!(config.chart, Config::default().chart);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[chart\ntag_path = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(matches!(err, HelmReleaseError::Config(_)));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[chart]\nchart_file = \"Chart.yaml\"\nflavor = \"vanilla\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path())).is_ok());
}
