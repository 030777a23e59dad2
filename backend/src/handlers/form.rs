//! HTML form handlers
//!
//! `GET /` renders the idle form, `POST /predict` renders it again with the
//! estimate or the failure message. A failed prediction is not an HTTP error:
//! the page comes back with the message so the farmer can adjust and retry.

use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;
use shared::{Choice, FarmSelection};

use crate::error::{AppError, AppResult};
use crate::pages::{render_page, Outcome, PageView};
use crate::AppState;

/// Query parameters for the form page
///
/// Sent when the taluka changes so the other choices survive the reload.
/// Missing or unknown values fall back to the first choice.
#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    pub taluka: Option<String>,
    pub season: Option<String>,
    pub variety: Option<String>,
    pub soil_type: Option<String>,
    pub irrigation: Option<String>,
}

fn choice_or_first<T: Choice>(label: Option<&str>, first: T) -> T {
    label.and_then(T::from_label).unwrap_or(first)
}

/// Render the form for the requested (or first) taluka
pub async fn show_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> AppResult<Html<String>> {
    let taluka = query
        .taluka
        .filter(|t| state.weather.contains(t))
        .or_else(|| state.weather.first().map(str::to_string))
        .ok_or_else(|| AppError::Internal("weather table is empty".to_string()))?;

    let first = FarmSelection::first_choices(taluka);
    let selection = FarmSelection {
        season: choice_or_first(query.season.as_deref(), first.season),
        variety: choice_or_first(query.variety.as_deref(), first.variety),
        soil_type: choice_or_first(query.soil_type.as_deref(), first.soil_type),
        irrigation: choice_or_first(query.irrigation.as_deref(), first.irrigation),
        taluka: first.taluka,
    };
    render(&state, &selection, None)
}

/// Handle the "Predict Yield" submission
pub async fn submit_form(
    State(state): State<AppState>,
    Form(selection): Form<FarmSelection>,
) -> AppResult<Html<String>> {
    let outcome = match state.prediction_service().estimate(&selection) {
        Ok(estimate) => Outcome::Estimate(estimate.display),
        Err(AppError::Prediction(e)) => Outcome::Failed(e.to_string()),
        Err(e) => return Err(e),
    };

    render(&state, &selection, Some(outcome))
}

fn render(
    state: &AppState,
    selection: &FarmSelection,
    outcome: Option<Outcome>,
) -> AppResult<Html<String>> {
    let weather = state.weather.lookup(&selection.taluka).map_err(|e| {
        tracing::warn!("Form referenced a taluka outside the table: {}", e);
        AppError::UnknownLocation(selection.taluka.clone())
    })?;

    let view = PageView {
        talukas: state.weather.talukas().collect(),
        selection,
        weather,
        outcome,
    };

    Ok(Html(render_page(&view)))
}
