use serde::{Deserialize, Serialize};

use crate::agent::{Analysis, Comparison};
use crate::domain::PlayerRecord;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub player_name: String,
    #[serde(default = "default_true")]
    pub include_stats: bool,
    #[serde(default = "default_true")]
    pub include_matchup: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub player: PlayerRecord,
    pub analysis: Analysis,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub player: PlayerRecord,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub player_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub players: Vec<PlayerRecord>,
    pub comparison: Comparison,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub advisor: String,
    pub uptime_secs: i64,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: String,
    pub version: String,
}
