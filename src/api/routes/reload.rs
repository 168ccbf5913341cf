use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::storage::load_league;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub owners: usize,
    pub seasons: usize,
}

/// Re-read the data directory and replace every source.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let storage = state.storage.clone();
    let data = tokio::task::spawn_blocking(move || load_league(&storage))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let response = ReloadResponse {
        owners: data.owners.len(),
        seasons: data.season_ids().len(),
    };

    state.league.write().await.replace_data(data);
    tracing::info!(
        "Reloaded league data: {} owners, {} seasons",
        response.owners,
        response.seasons
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::cache::Source;
    use crate::models::OwnerId;
    use crate::test_support::{get_json, post_json, sample_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let state = sample_state(tmp.path());

        let owners_path = state.storage.owners_path();
        let mut owners: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&owners_path).unwrap()).unwrap();
        owners["Kim"] = serde_json::json!({"managerName": "Kim", "teamNames": ["New Blood"]});
        std::fs::write(&owners_path, owners.to_string()).unwrap();

        let (status, json) = post_json(build_router(state.clone(), "*"), "/api/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["owners"], 5);
        assert_eq!(json["seasons"], 2);

        let league = state.league.read().await;
        assert_eq!(league.versions().get(Source::Owners), 1);
        assert!(league.data().owners.contains_key(&OwnerId::from("Kim")));
        drop(league);

        let (_, json) = get_json(
            build_router(state, "*"),
            "/api/owners/resolve?season=2007&name=New%20Blood",
        )
        .await;
        assert_eq!(json["owner"], "Kim");
    }

    #[tokio::test]
    async fn test_reload_with_missing_dir_is_500() {
        let tmp = tempfile::tempdir().unwrap();
        let state = sample_state(tmp.path());
        std::fs::remove_dir_all(tmp.path()).unwrap();

        let (status, json) = post_json(build_router(state, "*"), "/api/reload").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }
}
