//! Model artifact loading
//!
//! The model and its column schema are read once at startup into an
//! immutable [`ArtifactBundle`] that every request shares.

use std::fs;
use std::path::{Path, PathBuf};

use shared::ColumnSchema;

use crate::config::ArtifactsConfig;
use crate::error::StartupError;
use crate::inference::{ModelArtifact, Regressor};

pub const MODEL_FILE: &str = "sugarcane_yield_model.json";
pub const COLUMNS_FILE: &str = "model_columns.json";

/// Directory name searched next to the executable when none is configured
pub const MODELS_DIR: &str = "models";

/// Filesystem locations of the two artifact files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub columns: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            columns: dir.join(COLUMNS_FILE),
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Result<Self, StartupError> {
        let dir = match &config.model_dir {
            Some(dir) => dir.clone(),
            None => default_model_dir()?,
        };

        Ok(Self {
            model: dir.join(&config.model_file),
            columns: dir.join(&config.columns_file),
        })
    }
}

/// `models/` next to the running executable
fn default_model_dir() -> Result<PathBuf, StartupError> {
    let exe = std::env::current_exe()?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(MODELS_DIR))
}

/// Loaded model and the column order it was trained with
pub struct ArtifactBundle {
    schema: ColumnSchema,
    model: Box<dyn Regressor>,
}

impl ArtifactBundle {
    pub fn new(schema: ColumnSchema, model: impl Regressor + 'static) -> Self {
        Self {
            schema,
            model: Box::new(model),
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("columns", &self.schema.len())
            .field("model", &self.model.kind())
            .finish()
    }
}

/// Reads both artifact files and compiles the model against the schema
pub fn load(paths: &ArtifactPaths) -> Result<ArtifactBundle, StartupError> {
    for path in [&paths.model, &paths.columns] {
        if !path.exists() {
            return Err(StartupError::ArtifactMissing { path: path.clone() });
        }
    }

    let schema: ColumnSchema = read_json(&paths.columns)?;
    let artifact: ModelArtifact = read_json(&paths.model)?;

    let model = artifact
        .compile(&schema)
        .map_err(|e| StartupError::ArtifactInvalid {
            path: paths.model.clone(),
            reason: e.to_string(),
        })?;

    tracing::info!(
        "Loaded {} model with {} columns from {}",
        model.kind(),
        schema.len(),
        paths.model.display()
    );

    Ok(ArtifactBundle::new(schema, model))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StartupError> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| StartupError::ArtifactInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
