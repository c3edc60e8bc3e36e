use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::model::{FeatureVector, SleepQuality};
use crate::schema::{PredictionRequest, PredictionResponse};

pub async fn home() -> &'static str {
    "Sleep Quality Prediction API is running!"
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let request = PredictionRequest::from_json(&body)?;
    let features = FeatureVector::encode(&request)?;

    let class = state.predictor.predict(&features)?;
    let quality = SleepQuality::from_class_index(class);
    tracing::debug!(class, ?quality, bmi = features.bmi, "predicted sleep quality");

    Ok(Json(PredictionResponse {
        predicted_sleep_quality: quality,
    }))
}
