//! Feature assembly
//!
//! Builds the single model input row from a farm selection and the weather
//! record of its taluka. The encoding mirrors the training pipeline:
//!
//! 1. numeric weather features plus a fixed harvested area of one hectare,
//! 2. two derived features (`Avg_EVI`, `Avg_LST_Celsius`),
//! 3. one-hot columns named `<field>_<label>` for the selected values only,
//! 4. reindexing against the model's [`ColumnSchema`].
//!
//! A selected value whose one-hot column is missing from the schema is
//! dropped during reindexing, so that field contributes nothing to the row.
//! This matches the training-time behaviour for categories the model has
//! never seen and is surfaced through [`Reconciliation::dropped`].

use crate::models::{CategoricalField, FarmSelection, WeatherRecord};
use crate::schema::{ColumnSchema, Reconciliation};

/// Harvested area fed to the model; estimates are per hectare
pub const AREA_HARVESTED_HA: f64 = 1.0;

/// EVI is approximated from NDVI by this factor
pub const EVI_PER_NDVI: f64 = 0.8;

/// Land surface temperature is approximated as max air temperature minus this offset
pub const LST_OFFSET_CELSIUS: f64 = 5.0;

/// Numeric model features, in training column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFeature {
    Latitude,
    Longitude,
    AreaHarvestedHa,
    AvgNdvi,
    AvgEvi,
    AvgLstCelsius,
    AvgMaxTempCelsius,
    AvgMinTempCelsius,
    AvgHumidityPercent,
    SolarRadiationKwh,
    AccumulatedRainfallMm,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 11] = [
        NumericFeature::Latitude,
        NumericFeature::Longitude,
        NumericFeature::AreaHarvestedHa,
        NumericFeature::AvgNdvi,
        NumericFeature::AvgEvi,
        NumericFeature::AvgLstCelsius,
        NumericFeature::AvgMaxTempCelsius,
        NumericFeature::AvgMinTempCelsius,
        NumericFeature::AvgHumidityPercent,
        NumericFeature::SolarRadiationKwh,
        NumericFeature::AccumulatedRainfallMm,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            NumericFeature::Latitude => "Latitude",
            NumericFeature::Longitude => "Longitude",
            NumericFeature::AreaHarvestedHa => "Area_Harvested_Ha",
            NumericFeature::AvgNdvi => "Avg_NDVI",
            NumericFeature::AvgEvi => "Avg_EVI",
            NumericFeature::AvgLstCelsius => "Avg_LST_Celsius",
            NumericFeature::AvgMaxTempCelsius => "Avg_Max_Temp_Celsius",
            NumericFeature::AvgMinTempCelsius => "Avg_Min_Temp_Celsius",
            NumericFeature::AvgHumidityPercent => "Avg_Humidity_Percent",
            NumericFeature::SolarRadiationKwh => "Solar_Radiation_kWh",
            NumericFeature::AccumulatedRainfallMm => "Accumulated_Rainfall_mm",
        }
    }
}

/// One-hot column name for a categorical value
pub fn one_hot_column(field: CategoricalField, label: &str) -> String {
    format!("{}_{}", field.column_prefix(), label)
}

/// Flat feature record before alignment with the model schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub area_harvested_ha: f64,
    pub avg_ndvi: f64,
    pub avg_evi: f64,
    pub avg_lst_celsius: f64,
    pub avg_max_temp_celsius: f64,
    pub avg_min_temp_celsius: f64,
    pub avg_humidity_percent: f64,
    pub solar_radiation_kwh: f64,
    pub accumulated_rainfall_mm: f64,
    /// One-hot columns set to 1, one per categorical field
    pub one_hot: Vec<String>,
}

impl FeatureRecord {
    /// Merges the selection with its weather record and expands the categoricals
    pub fn new(selection: &FarmSelection, weather: &WeatherRecord) -> Self {
        let one_hot = selection
            .categorical_values()
            .iter()
            .map(|(field, label)| one_hot_column(*field, label))
            .collect();

        Self {
            latitude: weather.lat,
            longitude: weather.lon,
            area_harvested_ha: AREA_HARVESTED_HA,
            avg_ndvi: weather.ndvi,
            avg_evi: weather.ndvi * EVI_PER_NDVI,
            avg_lst_celsius: weather.max_temp - LST_OFFSET_CELSIUS,
            avg_max_temp_celsius: weather.max_temp,
            avg_min_temp_celsius: weather.min_temp,
            avg_humidity_percent: weather.humidity,
            solar_radiation_kwh: weather.solar,
            accumulated_rainfall_mm: weather.rainfall,
            one_hot,
        }
    }

    pub fn numeric(&self, feature: NumericFeature) -> f64 {
        match feature {
            NumericFeature::Latitude => self.latitude,
            NumericFeature::Longitude => self.longitude,
            NumericFeature::AreaHarvestedHa => self.area_harvested_ha,
            NumericFeature::AvgNdvi => self.avg_ndvi,
            NumericFeature::AvgEvi => self.avg_evi,
            NumericFeature::AvgLstCelsius => self.avg_lst_celsius,
            NumericFeature::AvgMaxTempCelsius => self.avg_max_temp_celsius,
            NumericFeature::AvgMinTempCelsius => self.avg_min_temp_celsius,
            NumericFeature::AvgHumidityPercent => self.avg_humidity_percent,
            NumericFeature::SolarRadiationKwh => self.solar_radiation_kwh,
            NumericFeature::AccumulatedRainfallMm => self.accumulated_rainfall_mm,
        }
    }

    /// Every produced column with its value, numeric columns first
    pub fn columns(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        NumericFeature::ALL
            .into_iter()
            .map(move |f| (f.column(), self.numeric(f)))
            .chain(self.one_hot.iter().map(|c| (c.as_str(), 1.0)))
    }

    /// Aligns the record to the model schema
    pub fn align(self, schema: &ColumnSchema) -> FeatureRow<'_> {
        let (values, reconciliation) = schema.reindex(self.columns());
        FeatureRow {
            schema,
            values,
            reconciliation,
        }
    }
}

/// Model input row aligned to a [`ColumnSchema`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow<'s> {
    schema: &'s ColumnSchema,
    values: Vec<f64>,
    reconciliation: Reconciliation,
}

impl<'s> FeatureRow<'s> {
    pub fn schema(&self) -> &'s ColumnSchema {
        self.schema
    }

    /// Values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'s str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }
}

/// Builds the model input row for one form submission
pub fn assemble<'s>(
    selection: &FarmSelection,
    weather: &WeatherRecord,
    schema: &'s ColumnSchema,
) -> FeatureRow<'s> {
    FeatureRecord::new(selection, weather).align(schema)
}

/// All one-hot columns a schema carries for a categorical field
pub fn field_columns<'s>(
    schema: &'s ColumnSchema,
    field: CategoricalField,
) -> impl Iterator<Item = &'s str> + 's {
    let prefix = format!("{}_", field.column_prefix());
    schema
        .columns()
        .iter()
        .map(String::as_str)
        .filter(move |c| c.starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaneVariety, IrrigationMethod, Season, SoilType};

    fn weather() -> WeatherRecord {
        WeatherRecord {
            rainfall: 1200.0,
            max_temp: 34.0,
            min_temp: 22.0,
            humidity: 70.0,
            solar: 5.5,
            ndvi: 0.65,
            lat: 17.1,
            lon: 74.2,
        }
    }

    fn selection() -> FarmSelection {
        FarmSelection {
            taluka: "X".to_string(),
            season: Season::Suru,
            variety: CaneVariety::Co86032,
            soil_type: SoilType::BlackCotton,
            irrigation: IrrigationMethod::Drip,
        }
    }

    fn training_schema() -> ColumnSchema {
        let mut columns: Vec<String> = NumericFeature::ALL
            .iter()
            .map(|f| f.column().to_string())
            .collect();
        for taluka in ["X", "Y"] {
            columns.push(format!("Taluka_{}", taluka));
        }
        for season in ["Adsali", "Pre-seasonal", "Suru"] {
            columns.push(format!("Season_{}", season));
        }
        for variety in ["Co 86032", "Co 92005", "CoM 0265", "VSI 434"] {
            columns.push(format!("Cane_Variety_{}", variety));
        }
        for soil in ["Black Cotton", "Clay Loam", "Medium Black", "Sandy Loam"] {
            columns.push(format!("Soil_Type_{}", soil));
        }
        for irrigation in ["Drip", "Flood", "Rainfed"] {
            columns.push(format!("Irrigation_Method_{}", irrigation));
        }
        ColumnSchema::new(columns).unwrap()
    }

    #[test]
    fn test_one_hot_column_naming() {
        assert_eq!(
            one_hot_column(CategoricalField::CaneVariety, "Co 86032"),
            "Cane_Variety_Co 86032"
        );
        assert_eq!(
            one_hot_column(CategoricalField::IrrigationMethod, "Drip"),
            "Irrigation_Method_Drip"
        );
    }

    #[test]
    fn test_record_derived_fields() {
        let record = FeatureRecord::new(&selection(), &weather());
        assert_eq!(record.avg_evi, 0.65 * 0.8);
        assert_eq!(record.avg_lst_celsius, 29.0);
        assert_eq!(record.area_harvested_ha, 1.0);
        assert_eq!(record.one_hot.len(), 5);
        assert_eq!(record.columns().count(), 16);
    }

    #[test]
    fn test_assemble_reference_scenario() {
        let schema = training_schema();
        let row = assemble(&selection(), &weather(), &schema);

        assert_eq!(row.len(), schema.len());
        assert!((row.get("Avg_EVI").unwrap() - 0.52).abs() < 1e-12);
        assert_eq!(row.get("Avg_LST_Celsius"), Some(29.0));
        assert_eq!(row.get("Area_Harvested_Ha"), Some(1.0));
        assert_eq!(row.get("Accumulated_Rainfall_mm"), Some(1200.0));

        let hot = [
            "Taluka_X",
            "Season_Suru",
            "Cane_Variety_Co 86032",
            "Soil_Type_Black Cotton",
            "Irrigation_Method_Drip",
        ];
        for field in CategoricalField::ALL {
            for column in field_columns(&schema, field) {
                let expected = if hot.contains(&column) { 1.0 } else { 0.0 };
                assert_eq!(row.get(column), Some(expected), "column {}", column);
            }
        }

        assert!(row.reconciliation().is_lossless());
        assert_eq!(row.reconciliation().filled_count(), 11);
    }

    #[test]
    fn test_assemble_follows_schema_order() {
        let schema = training_schema();
        let row = assemble(&selection(), &weather(), &schema);

        let columns: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        let expected: Vec<&str> = schema.columns().iter().map(String::as_str).collect();
        assert_eq!(columns, expected);
    }

    #[test]
    fn test_unseen_category_contributes_nothing() {
        // Schema trained without Co 86032
        let columns: Vec<String> = training_schema()
            .columns()
            .iter()
            .filter(|c| c.as_str() != "Cane_Variety_Co 86032")
            .cloned()
            .collect();
        let schema = ColumnSchema::new(columns).unwrap();

        let row = assemble(&selection(), &weather(), &schema);

        for column in field_columns(&schema, CategoricalField::CaneVariety) {
            assert_eq!(row.get(column), Some(0.0));
        }
        assert_eq!(
            row.reconciliation().dropped,
            vec!["Cane_Variety_Co 86032".to_string()]
        );
        assert_eq!(row.get("Season_Suru"), Some(1.0));
    }

    #[test]
    fn test_unknown_taluka_is_dropped() {
        let schema = training_schema();
        let mut selection = selection();
        selection.taluka = "Z".to_string();

        let row = assemble(&selection, &weather(), &schema);
        assert_eq!(row.get("Taluka_X"), Some(0.0));
        assert_eq!(row.get("Taluka_Y"), Some(0.0));
        assert_eq!(row.reconciliation().dropped, vec!["Taluka_Z".to_string()]);
    }
}
