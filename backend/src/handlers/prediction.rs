//! JSON API handlers for options, taluka weather and predictions

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::{
    validate_taluka_name, CaneVariety, Choice, FarmSelection, GpsCoordinates, IrrigationMethod,
    Season, SoilType, WeatherRecord,
};

use crate::error::{AppError, AppResult};
use crate::services::Estimate;
use crate::AppState;

/// Closed sets offered by the form
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub talukas: Vec<String>,
    pub seasons: Vec<&'static str>,
    pub varieties: Vec<&'static str>,
    pub soil_types: Vec<&'static str>,
    pub irrigation_methods: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TalukaWeather {
    pub taluka: String,
    pub location: GpsCoordinates,
    pub weather: WeatherRecord,
}

/// List every form choice
pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        talukas: state.weather.talukas().map(str::to_string).collect(),
        seasons: Season::labels(),
        varieties: CaneVariety::labels(),
        soil_types: SoilType::labels(),
        irrigation_methods: IrrigationMethod::labels(),
    })
}

/// List talukas in the weather table
pub async fn list_talukas(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.weather.talukas().map(str::to_string).collect())
}

/// Get the weather record of a taluka
pub async fn get_taluka_weather(
    State(state): State<AppState>,
    Path(taluka): Path<String>,
) -> AppResult<Json<TalukaWeather>> {
    let weather = *state.prediction_service().weather_for(&taluka)?;
    Ok(Json(TalukaWeather {
        location: weather.coordinates(),
        taluka,
        weather,
    }))
}

/// Predict the yield for a farm selection
pub async fn predict_yield(
    State(state): State<AppState>,
    Json(selection): Json<FarmSelection>,
) -> AppResult<Json<Estimate>> {
    validate_taluka_name(&selection.taluka).map_err(|message| AppError::Validation {
        field: "taluka".to_string(),
        message: message.to_string(),
    })?;

    let estimate = state.prediction_service().estimate(&selection)?;
    Ok(Json(estimate))
}
