//! Prediction service: lookup, feature assembly and model evaluation for one
//! form submission

use std::sync::Arc;

use serde::Serialize;
use shared::{
    assemble, field_columns, one_hot_column, CaneVariety, CategoricalField, Choice, FarmSelection,
    IrrigationMethod, Reconciliation, Season, SoilType, WeatherRecord, YieldEstimate,
};

use crate::artifacts::ArtifactBundle;
use crate::error::{AppError, AppResult};
use crate::inference;
use crate::weather_table::{LookupError, WeatherTable};

/// Prediction service over the loaded artifacts and weather table
#[derive(Clone)]
pub struct PredictionService {
    artifacts: Arc<ArtifactBundle>,
    weather: Arc<WeatherTable>,
}

/// Result of one successful prediction
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub taluka: String,
    pub yield_tonnes_per_ha: f64,
    /// Formatted for display, e.g. "84.37 Tonnes/Ha"
    pub display: String,
    pub reconciliation: Reconciliation,
}

impl PredictionService {
    pub fn new(artifacts: Arc<ArtifactBundle>, weather: Arc<WeatherTable>) -> Self {
        Self { artifacts, weather }
    }

    /// Weather record for the taluka
    pub fn weather_for(&self, taluka: &str) -> AppResult<&WeatherRecord> {
        self.weather.lookup(taluka).map_err(|e| match e {
            LookupError::UnknownLocation(name) => AppError::UnknownLocation(name),
        })
    }

    /// Form choices whose one-hot column the model never saw
    ///
    /// Such a choice still predicts, but its value is dropped during
    /// alignment. A field with no columns at all is reported once by prefix.
    pub fn unseen_choices(&self) -> Vec<String> {
        let schema = self.artifacts.schema();
        let mut unseen = Vec::new();

        for field in CategoricalField::ALL {
            if field_columns(schema, field).next().is_none() {
                unseen.push(format!("{}_*", field.column_prefix()));
                continue;
            }

            let labels: Vec<&str> = match field {
                CategoricalField::Taluka => self.weather.talukas().collect(),
                CategoricalField::Season => Season::labels(),
                CategoricalField::CaneVariety => CaneVariety::labels(),
                CategoricalField::SoilType => SoilType::labels(),
                CategoricalField::IrrigationMethod => IrrigationMethod::labels(),
            };
            unseen.extend(
                labels
                    .into_iter()
                    .map(|label| one_hot_column(field, label))
                    .filter(|column| !schema.contains(column)),
            );
        }

        unseen
    }

    /// Runs assemble and predict for the selection
    pub fn estimate(&self, selection: &FarmSelection) -> AppResult<Estimate> {
        tracing::info!(
            taluka = %selection.taluka,
            season = %selection.season,
            variety = %selection.variety,
            soil_type = %selection.soil_type,
            irrigation = %selection.irrigation,
            "Predicting yield"
        );

        let weather = self.weather_for(&selection.taluka)?;
        let row = assemble(selection, weather, self.artifacts.schema());

        let reconciliation = row.reconciliation().clone();
        tracing::debug!(
            filled = reconciliation.filled_count(),
            dropped = reconciliation.dropped_count(),
            "Feature row aligned to schema"
        );
        if !reconciliation.is_lossless() {
            // Unseen categories fall out of the row silently; keep a trace of them
            tracing::debug!("Columns not in schema: {:?}", reconciliation.dropped);
        }

        let output = inference::predict(&row, self.artifacts.model()).map_err(|e| {
            tracing::warn!("Prediction failed for {}: {}", selection.taluka, e);
            AppError::Prediction(e)
        })?;

        let estimate = YieldEstimate(output);
        tracing::info!("Estimated yield for {}: {}", selection.taluka, estimate);

        Ok(Estimate {
            taluka: selection.taluka.clone(),
            yield_tonnes_per_ha: estimate.tonnes_per_ha(),
            display: estimate.to_string(),
            reconciliation,
        })
    }
}
