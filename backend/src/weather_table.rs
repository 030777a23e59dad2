//! Taluka weather table
//!
//! Typical weather per taluka, read once at startup from the secrets file:
//!
//! ```toml
//! [taluka_weather.Karad]
//! rainfall = 1200
//! max_temp = 34
//! min_temp = 22
//! humidity = 70
//! solar = 5.5
//! ndvi = 0.65
//! lat = 17.28
//! lon = 74.18
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use shared::{validate_taluka_name, validate_weather_record, WeatherRecord};
use thiserror::Error;

use crate::error::StartupError;

/// Top-level key of the table in the secrets file
pub const WEATHER_KEY: &str = "taluka_weather";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown taluka '{0}'")]
    UnknownLocation(String),
}

/// Immutable mapping from taluka name to its weather record
#[derive(Debug, Clone)]
pub struct WeatherTable {
    records: BTreeMap<String, WeatherRecord>,
}

impl WeatherTable {
    pub fn new(records: BTreeMap<String, WeatherRecord>) -> Result<Self, StartupError> {
        if records.is_empty() {
            return Err(StartupError::ConfigurationInvalid(format!(
                "'{}' has no talukas",
                WEATHER_KEY
            )));
        }

        for (name, record) in &records {
            validate_taluka_name(name).map_err(|e| {
                StartupError::ConfigurationInvalid(format!("taluka '{}': {}", name, e))
            })?;
            validate_weather_record(record).map_err(|e| {
                StartupError::ConfigurationInvalid(format!("taluka '{}': {}", name, e))
            })?;
        }

        Ok(Self { records })
    }

    /// Parses the secrets document and extracts the weather table
    pub fn from_toml_str(text: &str) -> Result<Self, StartupError> {
        let mut document: toml::Table = toml::from_str(text)
            .map_err(|e| StartupError::ConfigurationInvalid(e.to_string()))?;

        let section = document
            .remove(WEATHER_KEY)
            .ok_or_else(|| StartupError::ConfigurationKeyMissing {
                key: WEATHER_KEY.to_string(),
            })?;

        let records: BTreeMap<String, WeatherRecord> = section
            .try_into()
            .map_err(|e: toml::de::Error| StartupError::ConfigurationInvalid(e.to_string()))?;

        Self::new(records)
    }

    /// Taluka names in the order the form offers them
    pub fn talukas(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.talukas().next()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, taluka: &str) -> bool {
        self.records.contains_key(taluka)
    }

    pub fn lookup(&self, taluka: &str) -> Result<&WeatherRecord, LookupError> {
        self.records
            .get(taluka)
            .ok_or_else(|| LookupError::UnknownLocation(taluka.to_string()))
    }
}

/// Loads the weather table from the secrets file at `path`
pub fn load(path: &Path) -> Result<WeatherTable, StartupError> {
    if !path.exists() {
        return Err(StartupError::ConfigurationMissing {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path)?;
    let table = WeatherTable::from_toml_str(&text)?;

    tracing::info!(
        "Loaded weather for {} talukas from {}",
        table.len(),
        path.display()
    );

    Ok(table)
}
