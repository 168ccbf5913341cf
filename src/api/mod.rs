//! REST API endpoints.
//!
//! Axum-based read-only HTTP API over the league engine: season views,
//! all-time tables, owner resolution and diagnostics, plus an explicit
//! reload of the data directory.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::SeasonId;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a season path segment.
pub fn parse_season(raw: &str) -> Result<SeasonId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid season: {}", raw)))
}

/// Build the API router with request tracing and CORS.
///
/// `cors_origin` of `"*"` allows any origin.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin {
        "*" => CorsLayer::new().allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => CorsLayer::new().allow_origin(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}; allowing any origin", origin);
                CorsLayer::new().allow_origin(Any)
            }
        },
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/api/seasons", get(routes::seasons::list_seasons))
        .route(
            "/api/seasons/:season/standings",
            get(routes::seasons::season_standings),
        )
        .route("/api/seasons/:season/totals", get(routes::seasons::season_totals))
        .route("/api/seasons/:season/games", get(routes::seasons::season_games))
        .route(
            "/api/seasons/:season/all-play",
            get(routes::seasons::season_all_play),
        )
        .route(
            "/api/seasons/:season/head-to-head",
            get(routes::seasons::season_head_to_head),
        )
        .route("/api/seasons/:season/luck", get(routes::seasons::season_luck))
        .route("/api/all-time/records", get(routes::all_time::records))
        .route("/api/all-time/all-play", get(routes::all_time::all_play))
        .route("/api/all-time/head-to-head", get(routes::all_time::head_to_head))
        .route("/api/all-time/consistency", get(routes::all_time::consistency))
        .route("/api/all-time/luck", get(routes::all_time::luck))
        .route("/api/owners/resolve", get(routes::owners::resolve_owner))
        .route("/api/diagnostics", get(routes::diagnostics::list_diagnostics))
        .route("/api/reload", post(routes::reload::reload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
