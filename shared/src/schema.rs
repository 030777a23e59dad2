//! Column schema of the trained model and row reconciliation against it

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("column schema is empty")]
    Empty,

    #[error("column schema contains a blank column name at position {0}")]
    BlankColumn(usize),

    #[error("column schema lists '{0}' more than once")]
    DuplicateColumn(String),
}

/// Ordered column names the model was trained on
///
/// Always non-empty and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankColumn(i));
            }
            if positions.insert(name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self { columns, positions })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Aligns produced `(column, value)` pairs to the schema.
    ///
    /// Output values follow schema order. Schema columns that were not
    /// produced are zero-filled; produced columns unknown to the schema are
    /// dropped. Both sets are reported in the returned [`Reconciliation`].
    pub fn reindex<'a, I>(&self, produced: I) -> (Vec<f64>, Reconciliation)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values: Vec<Option<f64>> = vec![None; self.columns.len()];
        let mut dropped = Vec::new();

        for (column, value) in produced {
            match self.position(column) {
                Some(i) => values[i] = Some(value),
                None => dropped.push(column.to_string()),
            }
        }

        let mut filled = Vec::new();
        let values = values
            .into_iter()
            .zip(&self.columns)
            .map(|(value, column)| {
                value.unwrap_or_else(|| {
                    filled.push(column.clone());
                    0.0
                })
            })
            .collect();

        (values, Reconciliation { filled, dropped })
    }
}

impl TryFrom<Vec<String>> for ColumnSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        ColumnSchema::new(columns)
    }
}

impl From<ColumnSchema> for Vec<String> {
    fn from(schema: ColumnSchema) -> Self {
        schema.columns
    }
}

/// Outcome of aligning one row to the schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Schema columns absent from the produced row, set to 0
    pub filled: Vec<String>,
    /// Produced columns absent from the schema, discarded
    pub dropped: Vec<String>,
}

impl Reconciliation {
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// True when nothing was dropped, i.e. every produced value reached the model
    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(cols: &[&str]) -> ColumnSchema {
        ColumnSchema::new(cols.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_schema_rejects_empty() {
        assert_eq!(ColumnSchema::new(vec![]), Err(SchemaError::Empty));
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let result = ColumnSchema::new(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(result, Err(SchemaError::DuplicateColumn("a".into())));
    }

    #[test]
    fn test_schema_rejects_blank() {
        let result = ColumnSchema::new(vec!["a".into(), " ".into()]);
        assert_eq!(result, Err(SchemaError::BlankColumn(1)));
    }

    #[test]
    fn test_schema_from_json() {
        let schema: ColumnSchema = serde_json::from_str(r#"["Latitude", "Season_Suru"]"#).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.position("Season_Suru"), Some(1));

        let err = serde_json::from_str::<ColumnSchema>(r#"["x", "x"]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_reindex_fills_and_drops() {
        let schema = schema(&["a", "b", "c"]);
        let (values, rec) = schema.reindex([("c", 3.0), ("z", 9.0), ("a", 1.0)]);

        assert_eq!(values, vec![1.0, 0.0, 3.0]);
        assert_eq!(rec.filled, vec!["b".to_string()]);
        assert_eq!(rec.dropped, vec!["z".to_string()]);
        assert!(!rec.is_lossless());
    }

    #[test]
    fn test_reindex_exact_match() {
        let schema = schema(&["a", "b"]);
        let (values, rec) = schema.reindex([("b", 2.0), ("a", 1.0)]);

        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(rec, Reconciliation::default());
        assert!(rec.is_lossless());
    }
}
