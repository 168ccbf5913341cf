use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::matrix::{MatrixScope, RecordMatrix};
use crate::models::{AllTimeRecordRow, ConsistencyRow, LuckRow};

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<AllTimeRecordRow>,
}

#[derive(Debug, Serialize)]
pub struct ConsistencyResponse {
    pub rows: Vec<ConsistencyRow>,
}

#[derive(Debug, Serialize)]
pub struct CareerLuckResponse {
    pub rows: Vec<LuckRow>,
}

pub async fn records(State(state): State<AppState>) -> Json<RecordsResponse> {
    let league = state.league.read().await;
    Json(RecordsResponse {
        records: league.all_time_records().as_ref().clone(),
    })
}

pub async fn all_play(State(state): State<AppState>) -> Result<Json<RecordMatrix>, ApiError> {
    let league = state.league.read().await;
    league
        .all_play_matrix(MatrixScope::Career)
        .as_ref()
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No all-play data".to_string()))
}

pub async fn head_to_head(State(state): State<AppState>) -> Result<Json<RecordMatrix>, ApiError> {
    let league = state.league.read().await;
    league
        .head_to_head_matrix(MatrixScope::Career)
        .as_ref()
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No head-to-head data".to_string()))
}

pub async fn consistency(State(state): State<AppState>) -> Json<ConsistencyResponse> {
    let league = state.league.read().await;
    Json(ConsistencyResponse {
        rows: league.career_consistency_index().as_ref().clone(),
    })
}

pub async fn luck(State(state): State<AppState>) -> Json<CareerLuckResponse> {
    let league = state.league.read().await;
    Json(CareerLuckResponse {
        rows: league.career_luck().as_ref().clone(),
    })
}
