use std::collections::BTreeMap;

use serde::Deserialize;
use shared::ColumnSchema;

use super::{ModelError, PredictionError, Regressor};

/// Linear regression as exported from training: one weight per column name
///
/// Columns without a coefficient have weight 0.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    pub intercept: f64,
    #[serde(default)]
    pub coefficients: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn compile(artifact: LinearArtifact, schema: &ColumnSchema) -> Result<Self, ModelError> {
        if !artifact.intercept.is_finite() {
            return Err(ModelError::NonFiniteParameter("intercept".into()));
        }

        let mut weights = vec![0.0; schema.len()];
        for (column, weight) in artifact.coefficients {
            let i = schema
                .position(&column)
                .ok_or_else(|| ModelError::UnknownFeature(column.clone()))?;
            if !weight.is_finite() {
                return Err(ModelError::NonFiniteParameter(column));
            }
            weights[i] = weight;
        }

        Ok(Self {
            intercept: artifact.intercept,
            weights,
        })
    }
}

impl Regressor for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn width(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, values: &[f64]) -> Result<f64, PredictionError> {
        if values.len() != self.weights.len() {
            return Err(PredictionError::ShapeMismatch {
                expected: self.weights.len(),
                actual: values.len(),
            });
        }

        let dot: f64 = self.weights.iter().zip(values).map(|(w, x)| w * x).sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ColumnSchema {
        ColumnSchema::new(vec!["a".into(), "b".into(), "c".into()]).unwrap()
    }

    #[test]
    fn test_missing_coefficients_are_zero() {
        let artifact = LinearArtifact {
            intercept: 10.0,
            coefficients: BTreeMap::from([("b".to_string(), 2.0)]),
        };
        let model = LinearModel::compile(artifact, &schema()).unwrap();

        assert_eq!(model.width(), 3);
        assert_eq!(model.predict_row(&[100.0, 3.0, 100.0]), Ok(16.0));
    }

    #[test]
    fn test_row_width_checked() {
        let artifact = LinearArtifact {
            intercept: 0.0,
            coefficients: BTreeMap::new(),
        };
        let model = LinearModel::compile(artifact, &schema()).unwrap();

        assert_eq!(
            model.predict_row(&[1.0]),
            Err(PredictionError::ShapeMismatch { expected: 3, actual: 1 })
        );
    }
}
