//! Common types used across the predictor

use serde::{Deserialize, Serialize};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Yield estimate in tonnes per hectare
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YieldEstimate(pub f64);

impl YieldEstimate {
    pub fn tonnes_per_ha(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for YieldEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} Tonnes/Ha", self.0)
    }
}
