//! Model evaluation
//!
//! A trained model is shipped as a JSON artifact ([`ModelArtifact`]) that
//! names features by column. At load time it is compiled against the
//! [`ColumnSchema`] into an index-based [`Model`], so prediction is a plain
//! walk over the aligned row's values.

mod forest;
mod linear;

use serde::Deserialize;
use shared::{ColumnSchema, FeatureRow};
use thiserror::Error;

pub use forest::{Aggregation, ForestArtifact, ForestModel, NodeArtifact, TreeArtifact};
pub use linear::{LinearArtifact, LinearModel};

/// Failure while evaluating a model on one row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("feature shape mismatch, expected {expected} features but got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature '{column}' is not a finite number")]
    NonFiniteInput { column: String },

    #[error("model produced a non-finite output")]
    NonFiniteOutput,

    #[error("{0}")]
    Fault(String),
}

/// Problem found while compiling an artifact against the schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model references column '{0}' which is not in the column schema")]
    UnknownFeature(String),

    #[error("model has no trees")]
    EmptyForest,

    #[error("tree {0} has no nodes")]
    EmptyTree(usize),

    #[error("tree {tree} node {node} points to child {child}, which is out of range or not after its parent")]
    InvalidChild { tree: usize, node: usize, child: usize },

    #[error("model parameter '{0}' is not a finite number")]
    NonFiniteParameter(String),
}

/// A regression model evaluated on schema-aligned rows
pub trait Regressor: Send + Sync {
    /// Short model family name, for logs and the health endpoint
    fn kind(&self) -> &'static str;

    /// Number of input values the model expects
    fn width(&self) -> usize;

    /// Evaluates one row whose values are in schema order
    fn predict_row(&self, values: &[f64]) -> Result<f64, PredictionError>;
}

/// Serialized model document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearArtifact),
    Forest(ForestArtifact),
}

impl ModelArtifact {
    /// Resolves feature names to schema positions and checks the structure
    pub fn compile(self, schema: &ColumnSchema) -> Result<Model, ModelError> {
        match self {
            ModelArtifact::Linear(artifact) => LinearModel::compile(artifact, schema).map(Model::Linear),
            ModelArtifact::Forest(artifact) => ForestModel::compile(artifact, schema).map(Model::Forest),
        }
    }
}

/// Compiled model ready for evaluation
#[derive(Debug, Clone)]
pub enum Model {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl Regressor for Model {
    fn kind(&self) -> &'static str {
        match self {
            Model::Linear(m) => m.kind(),
            Model::Forest(m) => m.kind(),
        }
    }

    fn width(&self) -> usize {
        match self {
            Model::Linear(m) => m.width(),
            Model::Forest(m) => m.width(),
        }
    }

    fn predict_row(&self, values: &[f64]) -> Result<f64, PredictionError> {
        match self {
            Model::Linear(m) => m.predict_row(values),
            Model::Forest(m) => m.predict_row(values),
        }
    }
}

/// Runs the model on a single assembled row and returns its one output
pub fn predict(row: &FeatureRow<'_>, model: &dyn Regressor) -> Result<f64, PredictionError> {
    if row.len() != model.width() {
        return Err(PredictionError::ShapeMismatch {
            expected: model.width(),
            actual: row.len(),
        });
    }

    if let Some((column, _)) = row.iter().find(|(_, v)| !v.is_finite()) {
        return Err(PredictionError::NonFiniteInput {
            column: column.to_string(),
        });
    }

    let output = model.predict_row(row.values())?;
    if !output.is_finite() {
        return Err(PredictionError::NonFiniteOutput);
    }

    Ok(output)
}
