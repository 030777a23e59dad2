//! Business logic services for the Sugarcane Yield Predictor

pub mod prediction;

pub use prediction::{Estimate, PredictionService};
