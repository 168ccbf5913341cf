use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_season, ApiError};
use crate::models::{OwnerId, SeasonId};

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub season: String,
    pub week: Option<u32>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub season: SeasonId,
    pub name: String,
    pub owner: Option<OwnerId>,
}

pub async fn resolve_owner(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let season = parse_season(&params.season)?;
    let league = state.league.read().await;
    let owner = league.resolve_owner(season, params.week.unwrap_or(0), &params.name);

    Ok(Json(ResolveResponse {
        season,
        name: params.name,
        owner,
    }))
}
