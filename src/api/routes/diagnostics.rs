use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::diagnostics::Diagnostic;

#[derive(Debug, Serialize)]
pub struct ReasonCount {
    pub reason: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub total: usize,
    pub summary: Vec<ReasonCount>,
    pub diagnostics: Vec<DiagnosticEntry>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticEntry {
    pub message: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// Diagnostics emitted so far. Only computations that have already run
/// contribute.
pub async fn list_diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let league = state.league.read().await;
    let emitted = league.diagnostics().emitted();

    Json(DiagnosticsResponse {
        total: emitted.len(),
        summary: league
            .diagnostics()
            .summary()
            .into_iter()
            .map(|(reason, count)| ReasonCount { reason, count })
            .collect(),
        diagnostics: emitted
            .into_iter()
            .map(|diagnostic| DiagnosticEntry {
                message: diagnostic.to_string(),
                diagnostic,
            })
            .collect(),
    })
}
