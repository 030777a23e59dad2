//! Tree ensembles: random forests (mean of trees) and gradient boosting
//! (base score plus sum of trees).

use serde::Deserialize;
use shared::ColumnSchema;

use super::{ModelError, PredictionError, Regressor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestArtifact {
    pub trees: Vec<TreeArtifact>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
}

/// Flat node array with the root at index 0
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<NodeArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeArtifact {
    /// Samples with `value <= threshold` go left. The value is rounded to
    /// `f32` before the comparison; thresholds are kept as exported.
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<Vec<Node>>,
    aggregation: Aggregation,
    base_score: f64,
    width: usize,
}

impl ForestModel {
    pub fn compile(artifact: ForestArtifact, schema: &ColumnSchema) -> Result<Self, ModelError> {
        if artifact.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        if !artifact.base_score.is_finite() {
            return Err(ModelError::NonFiniteParameter("base_score".into()));
        }

        let mut trees = Vec::with_capacity(artifact.trees.len());
        for (t, tree) in artifact.trees.into_iter().enumerate() {
            trees.push(compile_tree(t, tree, schema)?);
        }

        Ok(Self {
            trees,
            aggregation: artifact.aggregation,
            base_score: artifact.base_score,
            width: schema.len(),
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

/// Children must point strictly forward, which rules out cycles
fn compile_tree(t: usize, tree: TreeArtifact, schema: &ColumnSchema) -> Result<Vec<Node>, ModelError> {
    if tree.nodes.is_empty() {
        return Err(ModelError::EmptyTree(t));
    }

    let len = tree.nodes.len();
    tree.nodes
        .into_iter()
        .enumerate()
        .map(|(n, node)| match node {
            NodeArtifact::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                for child in [left, right] {
                    if child <= n || child >= len {
                        return Err(ModelError::InvalidChild { tree: t, node: n, child });
                    }
                }
                if !threshold.is_finite() {
                    return Err(ModelError::NonFiniteParameter(format!("tree {} node {} threshold", t, n)));
                }
                let feature = schema
                    .position(&feature)
                    .ok_or(ModelError::UnknownFeature(feature))?;
                Ok(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                })
            }
            NodeArtifact::Leaf { value } => {
                if !value.is_finite() {
                    return Err(ModelError::NonFiniteParameter(format!("tree {} node {} value", t, n)));
                }
                Ok(Node::Leaf(value))
            }
        })
        .collect()
}

fn walk(t: usize, nodes: &[Node], values: &[f64]) -> Result<f64, PredictionError> {
    let mut i = 0;
    loop {
        match nodes.get(i) {
            Some(Node::Leaf(value)) => return Ok(*value),
            Some(Node::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let x = values
                    .get(*feature)
                    .ok_or(PredictionError::ShapeMismatch {
                        expected: feature + 1,
                        actual: values.len(),
                    })?;
                // Inputs are compared at single precision, as the trees were fitted
                let x = f64::from(*x as f32);
                i = if x <= *threshold { *left } else { *right };
            }
            // Unreachable for compiled trees; children are checked at load time
            None => {
                return Err(PredictionError::Fault(format!(
                    "tree {} has no node {}",
                    t, i
                )))
            }
        }
    }
}

impl Regressor for ForestModel {
    fn kind(&self) -> &'static str {
        match self.aggregation {
            Aggregation::Mean => "random_forest",
            Aggregation::Sum => "gradient_boosting",
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn predict_row(&self, values: &[f64]) -> Result<f64, PredictionError> {
        let mut total = 0.0;
        for (t, nodes) in self.trees.iter().enumerate() {
            total += walk(t, nodes, values)?;
        }

        Ok(match self.aggregation {
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        })
    }
}
