//! Shared types and feature encoding for the Sugarcane Yield Predictor
//!
//! This crate holds the domain types and the pure computation that turns a
//! farm selection plus a weather record into the model's input row. It does
//! no I/O; loading artifacts and serving the form live in the backend.

pub mod features;
pub mod models;
pub mod schema;
pub mod types;
pub mod validation;

pub use features::*;
pub use models::*;
pub use schema::*;
pub use types::*;
pub use validation::*;
