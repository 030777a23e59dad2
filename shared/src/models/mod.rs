//! Domain models for the Sugarcane Yield Predictor

mod selection;
mod weather;

pub use selection::*;
pub use weather::*;
