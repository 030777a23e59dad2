//! Startup loading tests
//!
//! The server must refuse to start when the weather table or the model
//! artifacts are unusable, with a message naming what is wrong.

use std::fs;
use std::path::Path;

use sugarcane_yield_backend::{
    artifacts::{self, ArtifactPaths},
    config::ArtifactsConfig,
    error::StartupError,
    weather_table,
};
use tempfile::TempDir;

const SECRETS: &str = r#"
[taluka_weather.Karad]
rainfall = 1200
max_temp = 34
min_temp = 22
humidity = 70
solar = 5.5
ndvi = 0.65
lat = 17.28
lon = 74.18
"#;

const COLUMNS: &str = r#"["Avg_NDVI", "Taluka_Karad", "Season_Suru"]"#;

const LINEAR: &str =
    r#"{"kind": "linear", "intercept": 60.0, "coefficients": {"Avg_NDVI": 40.0}}"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Weather table
// ============================================================================

#[test]
fn test_missing_secrets_file() {
    let dir = TempDir::new().unwrap();
    let err = weather_table::load(&dir.path().join("secrets.toml")).unwrap_err();

    assert!(matches!(err, StartupError::ConfigurationMissing { .. }));
    assert!(err.to_string().starts_with("Secrets file not found at"));
}

#[test]
fn test_secrets_without_weather_key() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "secrets.toml", "[other]\nvalue = 1\n");
    let err = weather_table::load(&path).unwrap_err();

    assert_eq!(err.to_string(), "Key 'taluka_weather' not found in secrets");
}

#[test]
fn test_secrets_with_incomplete_record() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "secrets.toml",
        "[taluka_weather.Karad]\nrainfall = 1200\nmax_temp = 34\n",
    );

    assert!(matches!(
        weather_table::load(&path),
        Err(StartupError::ConfigurationInvalid(_))
    ));
}

#[test]
fn test_secrets_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "secrets.toml", SECRETS);
    let table = weather_table::load(&path).unwrap();

    assert_eq!(table.talukas().collect::<Vec<_>>(), vec!["Karad"]);
    assert_eq!(table.lookup("Karad").unwrap().rainfall, 1200.0);
}

// ============================================================================
// Model artifacts
// ============================================================================

#[test]
fn test_missing_model_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), artifacts::COLUMNS_FILE, COLUMNS);
    let err = artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();

    assert!(matches!(err, StartupError::ArtifactMissing { .. }));
    assert!(err.to_string().starts_with("Model file not found at:"));
    assert!(err.to_string().contains(artifacts::MODEL_FILE));
}

#[test]
fn test_missing_columns_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), artifacts::MODEL_FILE, LINEAR);
    let err = artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();

    assert!(err.to_string().contains(artifacts::COLUMNS_FILE));
}

#[test]
fn test_model_referencing_unknown_column() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), artifacts::COLUMNS_FILE, COLUMNS);
    write(
        dir.path(),
        artifacts::MODEL_FILE,
        r#"{"kind": "linear", "intercept": 1.0, "coefficients": {"Soil_Type_Loess": 2.0}}"#,
    );
    let err = artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();

    assert!(matches!(err, StartupError::ArtifactInvalid { .. }));
    assert!(err.to_string().contains("Soil_Type_Loess"));
}

#[test]
fn test_duplicate_columns_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), artifacts::COLUMNS_FILE, r#"["Avg_NDVI", "Avg_NDVI"]"#);
    write(dir.path(), artifacts::MODEL_FILE, LINEAR);

    assert!(matches!(
        artifacts::load(&ArtifactPaths::in_dir(dir.path())),
        Err(StartupError::ArtifactInvalid { .. })
    ));
}

#[test]
fn test_paths_from_config() {
    let config = ArtifactsConfig {
        model_dir: Some("/srv/models".into()),
        model_file: "model.json".into(),
        columns_file: "columns.json".into(),
    };
    let paths = ArtifactPaths::from_config(&config).unwrap();

    assert_eq!(paths.model, Path::new("/srv/models/model.json"));
    assert_eq!(paths.columns, Path::new("/srv/models/columns.json"));
}

#[test]
fn test_default_paths_next_to_executable() {
    let paths = ArtifactPaths::from_config(&ArtifactsConfig::default()).unwrap();

    assert!(paths.model.ends_with("models/sugarcane_yield_model.json"));
    assert!(paths.columns.ends_with("models/model_columns.json"));
}

#[test]
fn test_sample_artifacts_load() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let bundle = artifacts::load(&ArtifactPaths::in_dir(root.join("models"))).unwrap();

    assert_eq!(bundle.schema().len(), 30);
    assert_eq!(bundle.model().kind(), "gradient_boosting");
    assert_eq!(bundle.model().width(), 30);
}
