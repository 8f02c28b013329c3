//! Provider adapter contracts.
//!
//! Each upstream provider exposes a normalized lookup surface over its own
//! cache and matcher. Upstream failures are absorbed at the adapter boundary
//! and surface as `Lookup::Unavailable`, never as an error to the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::{InjuredTeammate, PositionGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Espn,
    Sleeper,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Espn => "espn",
            Self::Sleeper => "sleeper",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "espn" => Ok(Self::Espn),
            "sleeper" => Ok(Self::Sleeper),
            _ => Err("invalid provider; expected espn|sleeper"),
        }
    }
}

/// Adapter-boundary outcome distinguishing a genuine miss from an upstream
/// failure. The engine collapses both to defaults, but tests and logging
/// need to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
            Self::Unavailable => Lookup::Unavailable,
        }
    }
}

/// Identity resolved by the primary provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: String,
    pub display_name: String,
    /// Team abbreviation, "N/A" when the detail lookup degraded
    pub team: String,
    /// Provider-native team id, used for roster and schedule lookups
    pub team_id: Option<String>,
    /// Position abbreviation, "N/A" when the detail lookup degraded
    pub position: String,
}

/// Season statistics bundle from the primary provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeBundle {
    /// Flattened "{category}_{stat}" -> value pairs
    pub parsed: HashMap<String, f64>,
    /// One-line human-readable summary
    pub summary: String,
}

/// Status entry resolved by the status provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: String,
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    /// Formatted adverse status ("OUT - Knee"); `None` means healthy
    pub status: Option<String>,
}

/// Primary identity/attribute source (Provider A)
#[async_trait]
pub trait IdentitySource: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// First containment match over the full dataset, in dataset order
    async fn find_by_name(&self, query: &str) -> Lookup<PlayerIdentity>;

    /// Season statistics for a known provider id
    async fn get_attributes(&self, player_id: &str) -> Lookup<AttributeBundle>;

    /// Free-text status for a known provider id, default "Healthy"
    async fn get_status(&self, player_id: &str) -> String;
}

/// Status/context source (Provider B)
#[async_trait]
pub trait StatusSource: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// First containment match over the full dataset, in dataset order
    async fn find_by_name(&self, query: &str) -> Lookup<StatusEntry>;

    /// All entities on `team` in `group` carrying an adverse status.
    /// Empty on upstream failure; the subject is NOT excluded here.
    async fn team_injuries(&self, team: &str, group: &PositionGroup) -> Vec<InjuredTeammate>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_round_trips() {
        assert_eq!("espn".parse::<ProviderKind>().unwrap(), ProviderKind::Espn);
        assert_eq!(
            " Sleeper ".parse::<ProviderKind>().unwrap(),
            ProviderKind::Sleeper
        );
        assert!("yahoo".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Espn.to_string(), "espn");
    }

    #[test]
    fn lookup_distinguishes_miss_from_outage() {
        let found: Lookup<u8> = Lookup::Found(1);
        let miss: Lookup<u8> = Lookup::NotFound;
        let outage: Lookup<u8> = Lookup::Unavailable;

        assert!(found.is_found());
        assert_eq!(found.found(), Some(1));
        assert_eq!(miss.clone().found(), None);
        assert_ne!(miss, outage);
    }

    #[test]
    fn lookup_map_preserves_variant() {
        assert_eq!(Lookup::Found(2).map(|v| v * 2), Lookup::Found(4));
        assert_eq!(Lookup::<u8>::NotFound.map(|v| v * 2), Lookup::NotFound);
    }
}
