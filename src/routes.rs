//! HTTP routes for the valuation service.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::error;

use crate::common::Error;
use crate::engine::{Appraisal, AppraisalRequest};
use crate::extraction::AssetCategory;
use crate::EngineState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Incoming valuation request. The category arrives as a string and is
/// validated before any computation starts.
#[derive(Debug, Deserialize)]
pub struct ValuationRequest {
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "wertwerk".to_string(),
    })
}

/// Run a valuation and return the assembled appraisal as JSON.
pub async fn create_valuation(
    State(state): State<Arc<EngineState>>,
    Json(request): Json<ValuationRequest>,
) -> Result<Json<Appraisal>, (StatusCode, Json<ErrorResponse>)> {
    let request = parse_request(request)?;
    let appraisal = state.engine.appraise(&request).await.map_err(map_error)?;
    Ok(Json(appraisal))
}

/// Run a valuation and return the printable report document.
pub async fn render_report(
    State(state): State<Arc<EngineState>>,
    Json(request): Json<ValuationRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let request = parse_request(request)?;
    let bytes = state
        .engine
        .appraise_report(&request)
        .await
        .map_err(map_error)?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        bytes,
    )
        .into_response())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_request(
    request: ValuationRequest,
) -> Result<AppraisalRequest, (StatusCode, Json<ErrorResponse>)> {
    let category = AssetCategory::from_str(&request.category).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: e }),
        )
    })?;

    Ok(AppraisalRequest {
        category,
        description: request.description,
        location: request.location,
    })
}

fn map_error(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_caller_visible() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
    } else {
        error!(error = %err, "Valuation request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal error".to_string(),
            }),
        )
    }
}
