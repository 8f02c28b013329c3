//! Canonical player record produced by the aggregation engine.
//!
//! Identity fields are seeded from ESPN, status and teammate context from
//! Sleeper. The record is built once per request and never mutated afterward.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::matcher::title_case;

/// Sentinel position used when no provider produced a match
pub const FALLBACK_POSITION: &str = "PLAYER";
/// Sentinel team used when no provider produced a match
pub const FALLBACK_TEAM: &str = "NFL";
/// Status reported when no adverse status record exists
pub const DEFAULT_STATUS: &str = "Healthy";

/// Per-provider native identifiers. A `None` means the provider produced no
/// match; it is never conflated with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub espn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleeper: Option<String>,
}

/// Unified output record for one athlete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub display_name: String,
    pub position: String,
    pub team: String,
    pub provider_ids: ProviderIds,
    /// Provider-specific payload fragments, opaque to the engine
    pub attributes: HashMap<String, serde_json::Value>,
    pub status: String,
}

impl PlayerRecord {
    /// Synthesize a minimal record when no identity provider matched.
    /// Always returns something so the downstream advisory step can still
    /// attempt a best-effort response.
    pub fn fallback(query: &str) -> Self {
        Self {
            display_name: title_case(query),
            position: FALLBACK_POSITION.to_string(),
            team: FALLBACK_TEAM.to_string(),
            provider_ids: ProviderIds::default(),
            attributes: HashMap::new(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// True when team came from a real provider match, not a sentinel
    pub fn has_known_team(&self) -> bool {
        !self.team.is_empty() && self.team != FALLBACK_TEAM && self.team != "N/A"
    }

    /// True when position came from a real provider match, not a sentinel
    pub fn has_known_position(&self) -> bool {
        !self.position.is_empty() && self.position != FALLBACK_POSITION && self.position != "N/A"
    }

    /// Teammates at the same position group carrying an adverse status,
    /// empty when the context lookup never ran
    pub fn injured_teammates(&self) -> Vec<InjuredTeammate> {
        self.attributes
            .get("injuredTeammates")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// A teammate with an adverse status record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuredTeammate {
    pub name: String,
    pub position: String,
    pub injury_status: String,
}

/// Coarse position classification used only to group teammates for status
/// aggregation, never exposed as the primary position field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionGroup {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    /// Any other position matches itself exactly
    Other(String),
}

impl PositionGroup {
    pub fn from_position(position: &str) -> Self {
        match position.trim().to_ascii_uppercase().as_str() {
            "QB" => Self::Qb,
            "RB" | "FB" => Self::Rb,
            "WR" => Self::Wr,
            "TE" => Self::Te,
            "K" | "PK" => Self::K,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether a raw position string belongs to this group
    pub fn contains(&self, position: &str) -> bool {
        let position = position.trim().to_ascii_uppercase();
        match self {
            Self::Qb => position == "QB",
            Self::Rb => position == "RB" || position == "FB",
            Self::Wr => position == "WR",
            Self::Te => position == "TE",
            Self::K => position == "K" || position == "PK",
            Self::Other(p) => position == *p,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::K => "K",
            Self::Other(p) => p,
        }
    }
}
