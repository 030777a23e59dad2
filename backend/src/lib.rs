//! Sugarcane Yield Predictor - Backend
//!
//! Serves a one-page form where a farmer picks a taluka and crop details,
//! sees the taluka's typical weather, and gets a yield estimate in
//! tonnes per hectare. The same prediction is exposed as a JSON API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod artifacts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod pages;
pub mod routes;
pub mod services;
pub mod weather_table;

pub use config::Config;

use artifacts::ArtifactBundle;
use services::PredictionService;
use weather_table::WeatherTable;

/// Application state shared across handlers
///
/// Everything here is loaded once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub artifacts: Arc<ArtifactBundle>,
    pub weather: Arc<WeatherTable>,
}

impl AppState {
    pub fn new(config: Config, artifacts: ArtifactBundle, weather: WeatherTable) -> Self {
        Self {
            config: Arc::new(config),
            artifacts: Arc::new(artifacts),
            weather: Arc::new(weather),
        }
    }

    pub fn prediction_service(&self) -> PredictionService {
        PredictionService::new(self.artifacts.clone(), self.weather.clone())
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::show_form))
        .route("/predict", post(handlers::submit_form))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
