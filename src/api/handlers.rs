use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::agent::PlayerAdvisor;
use crate::api::{state::AppState, types::*};
use crate::domain::PlayerRecord;
use crate::error::ScoutError;

fn error_status(err: &ScoutError) -> StatusCode {
    match err {
        ScoutError::Validation(_) => StatusCode::BAD_REQUEST,
        ScoutError::AdvisorNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn require_advisor(
    state: &AppState,
) -> std::result::Result<Arc<PlayerAdvisor>, (StatusCode, String)> {
    state.advisor.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "advisor is not configured; set ADVISOR_API_KEY".to_string(),
    ))
}

/// Schedule context for the player's team, if one is known. Failures are
/// absorbed so an ESPN outage never blocks the analysis itself.
async fn matchup_context(state: &AppState, record: &PlayerRecord) -> Option<Value> {
    let team_id = record.attributes.get("teamId")?.as_str()?.to_string();
    match state.espn.team_schedule(&team_id).await {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            warn!(team_id = %team_id, error = %e, "schedule lookup failed");
            None
        }
    }
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "gridscout".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        advisor: if state.advisor.is_some() {
            "configured".to_string()
        } else {
            "disabled".to_string()
        },
        uptime_secs: state.uptime_seconds(),
    })
}

/// GET /api/players/search/:name
pub async fn search_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> std::result::Result<Json<SearchResponse>, (StatusCode, String)> {
    let player = state
        .aggregator
        .aggregate(&name)
        .await
        .map_err(|e| (error_status(&e), e.to_string()))?;

    Ok(Json(SearchResponse { player }))
}

/// POST /api/players/analyze
pub async fn analyze_player(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> std::result::Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let advisor = require_advisor(&state)?;

    let mut player = state
        .aggregator
        .aggregate(&req.player_name)
        .await
        .map_err(|e| (error_status(&e), e.to_string()))?;

    if !req.include_stats {
        player.attributes.remove("stats");
    }

    let matchup = if req.include_matchup {
        matchup_context(&state, &player).await
    } else {
        None
    };

    info!(player = %player.display_name, "analyzing player");
    let analysis = advisor
        .analyze(&player, matchup.as_ref())
        .await
        .map_err(|e| (error_status(&e), e.to_string()))?;

    Ok(Json(AnalyzeResponse { player, analysis }))
}

/// POST /api/players/compare
pub async fn compare_players(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> std::result::Result<Json<CompareResponse>, (StatusCode, String)> {
    let advisor = require_advisor(&state)?;

    if req.player_names.len() < 2 {
        return Err((
            StatusCode::BAD_REQUEST,
            "need at least 2 players to compare".to_string(),
        ));
    }

    let lookups = req
        .player_names
        .iter()
        .map(|name| state.aggregator.aggregate(name));
    let mut players = Vec::with_capacity(req.player_names.len());
    for result in futures::future::join_all(lookups).await {
        players.push(result.map_err(|e| (error_status(&e), e.to_string()))?);
    }

    let comparison = advisor
        .compare(&players)
        .await
        .map_err(|e| (error_status(&e), e.to_string()))?;

    Ok(Json(CompareResponse {
        players,
        comparison,
    }))
}
