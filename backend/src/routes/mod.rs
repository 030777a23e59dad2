//! Route definitions for the Sugarcane Yield Predictor

use axum::{routing::get, routing::post, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/options", get(handlers::get_options))
        .nest("/talukas", taluka_routes())
        .route("/predict", post(handlers::predict_yield))
}

/// Taluka weather routes
fn taluka_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_talukas))
        .route("/:name", get(handlers::get_taluka_weather))
}
