use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{parse_season, ApiError};
use crate::league::{League, SeasonSummary};
use crate::matrix::{MatrixScope, RecordMatrix};
use crate::models::{LuckRow, ResolvedGame, SeasonId, SeasonStandingsEntry, SeasonTotals};

#[derive(Debug, Serialize)]
pub struct SeasonListResponse {
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub season: SeasonId,
    pub standings: Vec<SeasonStandingsEntry>,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub season: SeasonId,
    pub games: Vec<ResolvedGame>,
}

#[derive(Debug, Serialize)]
pub struct LuckResponse {
    pub season: SeasonId,
    pub rows: Vec<LuckRow>,
}

fn known_season(league: &League, raw: &str) -> Result<SeasonId, ApiError> {
    let season = parse_season(raw)?;
    if !league.has_season(season) {
        return Err(ApiError::NotFound(format!("Season {} not found", season)));
    }
    Ok(season)
}

pub async fn list_seasons(State(state): State<AppState>) -> Json<SeasonListResponse> {
    let league = state.league.read().await;
    Json(SeasonListResponse {
        seasons: league.seasons(),
    })
}

pub async fn season_standings(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    Ok(Json(StandingsResponse {
        season,
        standings: league.season_standings(season).as_ref().clone(),
    }))
}

pub async fn season_totals(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<SeasonTotals>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    Ok(Json(league.season_totals(season)))
}

pub async fn season_games(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<GamesResponse>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    Ok(Json(GamesResponse {
        season,
        games: league.season_games(season).as_ref().clone(),
    }))
}

pub async fn season_all_play(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<RecordMatrix>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    league
        .all_play_matrix(MatrixScope::Season(season))
        .as_ref()
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No all-play data for season {}", season)))
}

pub async fn season_head_to_head(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<RecordMatrix>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    league
        .head_to_head_matrix(MatrixScope::Season(season))
        .as_ref()
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No head-to-head data for season {}", season)))
}

pub async fn season_luck(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<LuckResponse>, ApiError> {
    let league = state.league.read().await;
    let season = known_season(&league, &season)?;
    Ok(Json(LuckResponse {
        season,
        rows: league.luck_table(MatrixScope::Season(season)).as_ref().clone(),
    }))
}
