//! Sleeper adapter: status and teammate-context source.
//!
//! Sleeper exposes one bulk dataset: a map of native player id to a player
//! object carrying team, position and injury fields inline, so no secondary
//! fetch is ever needed. The map is cached under one sentinel key.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::DatasetCache;
use crate::config::ProvidersConfig;
use crate::domain::{InjuredTeammate, PositionGroup};
use crate::error::{Result, ScoutError};
use crate::matcher;
use crate::provider::{Lookup, ProviderKind, StatusEntry, StatusSource};

/// Cache key for the bulk player dataset
const ALL_PLAYERS_KEY: &str = "all";

/// One Sleeper player, decoded defensively; every field the upstream may
/// omit is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleeperPlayer {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub injury_body_part: Option<String>,
}

impl SleeperPlayer {
    /// Formatted adverse status ("OUT - Knee"); `None` when healthy
    pub fn adverse_status(&self) -> Option<String> {
        let status = self.injury_status.as_deref()?.trim();
        if status.is_empty() {
            return None;
        }
        match self.injury_body_part.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(part) => Some(format!("{} - {}", status.to_uppercase(), part)),
            None => Some(status.to_uppercase()),
        }
    }
}

pub struct SleeperClient {
    http: Client,
    base_url: String,
    players: DatasetCache<SleeperPlayer>,
}

impl SleeperClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("gridscout/0.1")
            .timeout(Duration::from_secs(config.sleeper_timeout_secs))
            .build()
            .map_err(|e| {
                ScoutError::Internal(format!("failed to build Sleeper HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.sleeper_url.trim_end_matches('/').to_string(),
            players: DatasetCache::new(),
        })
    }

    async fn fetch_players(&self) -> Result<Vec<SleeperPlayer>> {
        let url = format!("{}/players/nfl", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ScoutError::Upstream(format!(
                "Sleeper GET {} failed: status={}",
                url, status
            )));
        }

        let raw: HashMap<String, Value> = serde_json::from_str(&text)
            .map_err(|e| ScoutError::Upstream(format!("invalid Sleeper JSON: {}", e)))?;

        Ok(players_from_map(raw))
    }

    async fn all_players(&self) -> Result<std::sync::Arc<Vec<SleeperPlayer>>> {
        self.players
            .get_or_fetch(ALL_PLAYERS_KEY, || self.fetch_players())
            .await
    }
}

#[async_trait::async_trait]
impl StatusSource for SleeperClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Sleeper
    }

    async fn find_by_name(&self, query: &str) -> Lookup<StatusEntry> {
        let players = match self.all_players().await {
            Ok(players) => players,
            Err(e) => {
                warn!(error = %e, "Sleeper player list unavailable");
                return Lookup::Unavailable;
            }
        };

        for player in players.iter() {
            let Some(name) = player.full_name.as_deref() else {
                continue;
            };
            if matcher::matches(name, query) {
                let Some(id) = player.player_id.clone() else {
                    continue;
                };
                debug!(id = %id, name, "Sleeper match");
                return Lookup::Found(StatusEntry {
                    id,
                    name: name.to_string(),
                    team: player.team.clone(),
                    position: player.position.clone(),
                    status: player.adverse_status(),
                });
            }
        }

        Lookup::NotFound
    }

    async fn team_injuries(&self, team: &str, group: &PositionGroup) -> Vec<InjuredTeammate> {
        let team = team.trim().to_uppercase();
        if team.is_empty() || team == "N/A" {
            return Vec::new();
        }

        let players = match self.all_players().await {
            Ok(players) => players,
            Err(e) => {
                warn!(error = %e, "Sleeper player list unavailable for team injuries");
                return Vec::new();
            }
        };

        let mut injured = Vec::new();
        for player in players.iter() {
            let on_team = player
                .team
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(&team));
            if !on_team {
                continue;
            }

            let in_group = player.position.as_deref().is_some_and(|p| group.contains(p));
            if !in_group {
                continue;
            }

            if let Some(status) = player.adverse_status() {
                injured.push(InjuredTeammate {
                    name: player
                        .full_name
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    position: player.position.clone().unwrap_or_default(),
                    injury_status: status,
                });
            }
        }

        debug!(
            team = %team,
            group = group.as_str(),
            count = injured.len(),
            "Sleeper team injury scan"
        );
        injured
    }
}

/// Flatten the id-keyed map into a list, stamping each entry with its map
/// key as the provider-native id and dropping non-player entries (team
/// defenses carry no full name)
fn players_from_map(raw: HashMap<String, Value>) -> Vec<SleeperPlayer> {
    raw.into_iter()
        .filter_map(|(id, value)| {
            let mut player: SleeperPlayer = serde_json::from_value(value).ok()?;
            player.player_id.get_or_insert(id);
            player.full_name.as_deref()?;
            Some(player)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player(name: &str, team: &str, position: &str, injury: Option<(&str, &str)>) -> SleeperPlayer {
        SleeperPlayer {
            player_id: Some(format!("id-{}", name.to_lowercase().replace(' ', "-"))),
            full_name: Some(name.to_string()),
            team: Some(team.to_string()),
            position: Some(position.to_string()),
            injury_status: injury.map(|(s, _)| s.to_string()),
            injury_body_part: injury.map(|(_, p)| p.to_string()),
        }
    }

    #[test]
    fn map_entries_are_stamped_with_their_key() {
        let mut raw = HashMap::new();
        raw.insert(
            "4046".to_string(),
            json!({"full_name": "Patrick Mahomes", "team": "KC", "position": "QB"}),
        );
        raw.insert("KC".to_string(), json!({"team": "KC", "position": "DEF"}));

        let players = players_from_map(raw);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_id.as_deref(), Some("4046"));
        assert_eq!(players[0].full_name.as_deref(), Some("Patrick Mahomes"));
    }

    #[test]
    fn explicit_player_id_wins_over_map_key() {
        let mut raw = HashMap::new();
        raw.insert(
            "alias".to_string(),
            json!({"player_id": "4046", "full_name": "Patrick Mahomes"}),
        );
        let players = players_from_map(raw);
        assert_eq!(players[0].player_id.as_deref(), Some("4046"));
    }

    #[test]
    fn adverse_status_formats_with_body_part() {
        let p = player("A", "KC", "WR", Some(("Out", "Knee")));
        assert_eq!(p.adverse_status().as_deref(), Some("OUT - Knee"));

        let mut q = player("B", "KC", "WR", Some(("Questionable", "")));
        assert_eq!(q.adverse_status().as_deref(), Some("QUESTIONABLE"));

        q.injury_status = Some("  ".to_string());
        assert_eq!(q.adverse_status(), None);

        let healthy = player("C", "KC", "WR", None);
        assert_eq!(healthy.adverse_status(), None);
    }
}
