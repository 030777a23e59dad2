//! Weather data models

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Typical environmental readings for a taluka during the growing period
///
/// Field names match the keys of the `taluka_weather` secrets table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    /// Accumulated rainfall in mm
    pub rainfall: f64,
    /// Average maximum temperature in °C
    pub max_temp: f64,
    /// Average minimum temperature in °C
    pub min_temp: f64,
    /// Average relative humidity in percent
    pub humidity: f64,
    /// Solar radiation in kWh/m²
    pub solar: f64,
    /// Normalized difference vegetation index
    pub ndvi: f64,
    pub lat: f64,
    pub lon: f64,
}

impl WeatherRecord {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.lat, self.lon)
    }

    /// All readings paired with their secrets-file key
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("rainfall", self.rainfall),
            ("max_temp", self.max_temp),
            ("min_temp", self.min_temp),
            ("humidity", self.humidity),
            ("solar", self.solar),
            ("ndvi", self.ndvi),
            ("lat", self.lat),
            ("lon", self.lon),
        ]
    }
}
