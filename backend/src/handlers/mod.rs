//! HTTP request handlers

pub mod form;
pub mod health;
pub mod prediction;

pub use form::*;
pub use health::*;
pub use prediction::*;
