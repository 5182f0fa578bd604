use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::engine::Prediction;
use crate::error::PredictError;
use crate::types::{Instrument, TradeSignal};

/// Wire shape of a successful prediction. The price is rounded to 2 decimal
/// places and the return to 6; the signal was classified from the unrounded
/// return before this struct is built, so rounding never flips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub stock: String,
    pub current_price: f64,
    pub predicted_return: f64,
    pub signal: TradeSignal,
    pub threshold: f64,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        let price: f64 = prediction.current_price.try_into().unwrap_or(0.0);
        Self {
            stock: prediction.requested,
            current_price: round_to(price, 2),
            predicted_return: round_to(prediction.predicted_return, 6),
            signal: prediction.signal,
            threshold: prediction.threshold,
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub stock: String,
}

/// Health message plus the catalog of display names the dashboard renders
/// in its picker. Each entry is accepted verbatim by `/predict`.
pub async fn home() -> impl IntoResponse {
    let supported: Vec<&'static str> = Instrument::all()
        .iter()
        .map(|i| i.display_name())
        .collect();
    Json(json!({
        "message": "Stock Prediction API is running",
        "supported_stocks": supported,
    }))
}

pub async fn get_predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> Response {
    run_predict(&state, &params.stock).await
}

pub async fn post_predict(
    State(state): State<AppState>,
    Json(params): Json<PredictParams>,
) -> Response {
    run_predict(&state, &params.stock).await
}

pub async fn get_instruments() -> impl IntoResponse {
    Json(json!({"supported": Instrument::supported_names()}))
}

async fn run_predict(state: &AppState, stock: &str) -> Response {
    match state.engine.predict(stock).await {
        Ok(prediction) => Json(PredictionResponse::from(prediction)).into_response(),
        Err(err) => error_response(stock, err),
    }
}

/// Client mistakes get the full message. Server-side failures are logged
/// with detail and answered generically so file paths and model internals
/// never reach a response body.
fn error_response(stock: &str, err: PredictError) -> Response {
    if err.is_client_error() {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": err.to_string()})),
        )
            .into_response()
    } else {
        let stock = stock.to_uppercase();
        error!("Prediction failed for {}: {}", stock, err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": format!("Prediction failed for {}", stock)})),
        )
            .into_response()
    }
}
