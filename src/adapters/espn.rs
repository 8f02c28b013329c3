//! ESPN adapter: primary identity and attribute source.
//!
//! The bulk athlete list (v3) is cached under a sentinel key for the process
//! lifetime; team rosters (site API) are cached per team id. Entity detail,
//! statistics and schedules are follow-up calls on the v2 core API, which
//! links related resources through `$ref` URLs.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::{pick_id, pick_obj, pick_str};
use crate::cache::DatasetCache;
use crate::config::ProvidersConfig;
use crate::error::{Result, ScoutError};
use crate::matcher;
use crate::provider::{AttributeBundle, IdentitySource, Lookup, PlayerIdentity, ProviderKind};

/// Cache key for the bulk athlete dataset
const ALL_PLAYERS_KEY: &str = "all";

/// One entry from the bulk v3 athlete list, decoded defensively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspnAthlete {
    pub id: String,
    pub display_name: String,
}

/// One slot from a grouped team roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub id: String,
    pub display_name: String,
    pub position: String,
}

pub struct EspnClient {
    http: Client,
    v2_base: String,
    v3_base: String,
    site_base: String,
    season: String,
    athletes: DatasetCache<EspnAthlete>,
    rosters: DatasetCache<RosterSlot>,
}

impl EspnClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("gridscout/0.1")
            .timeout(Duration::from_secs(config.espn_timeout_secs))
            .build()
            .map_err(|e| ScoutError::Internal(format!("failed to build ESPN HTTP client: {}", e)))?;

        Ok(Self {
            http,
            v2_base: config.espn_v2_url.trim_end_matches('/').to_string(),
            v3_base: config.espn_v3_url.trim_end_matches('/').to_string(),
            site_base: config.espn_site_url.trim_end_matches('/').to_string(),
            season: config.season.clone(),
            athletes: DatasetCache::new(),
            rosters: DatasetCache::new(),
        })
    }

    async fn request_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ScoutError::Upstream(format!(
                "ESPN GET {} failed: status={}",
                url, status
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| ScoutError::Upstream(format!("invalid ESPN JSON from {}: {}", url, e)))
    }

    async fn fetch_athletes(&self) -> Result<Vec<EspnAthlete>> {
        let url = format!("{}/athletes", self.v3_base);
        let value = self.request_json(&url, &[("limit", "20000")]).await?;
        athletes_from_list(&value)
    }

    /// Follow a `$ref` link and return the resolved resource
    async fn follow_ref(&self, parent: &Value, key: &str) -> Option<Value> {
        let href = pick_obj(parent, &[key]).and_then(|v| pick_str(v, &["$ref"]))?;
        match self.request_json(href, &[]).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ESPN $ref lookup failed");
                None
            }
        }
    }

    /// Resolve team and position for a matched athlete via the v2 detail
    /// endpoint. Any failure degrades to "N/A" fields rather than erroring;
    /// a found player with unknown team is still a found player.
    async fn resolve_identity(&self, athlete: &EspnAthlete) -> PlayerIdentity {
        let mut identity = PlayerIdentity {
            id: athlete.id.clone(),
            display_name: athlete.display_name.clone(),
            team: "N/A".to_string(),
            team_id: None,
            position: "N/A".to_string(),
        };

        let url = format!("{}/athletes/{}", self.v2_base, athlete.id);
        let detail = match self.request_json(&url, &[]).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(id = %athlete.id, error = %e, "ESPN athlete detail failed; returning basic identity");
                return identity;
            }
        };

        if let Some(team) = self.follow_ref(&detail, "team").await {
            if let Some(abbr) = pick_str(&team, &["abbreviation"]) {
                identity.team = abbr.to_string();
            }
            identity.team_id = pick_id(&team, &["id"]);
        }

        if let Some(position) = self.follow_ref(&detail, "position").await {
            if let Some(abbr) = pick_str(&position, &["abbreviation"]) {
                identity.position = abbr.to_string();
            }
        }

        identity
    }

    /// Grouped roster for a team, cached per team id
    pub async fn team_roster(&self, team_id: &str) -> Result<Vec<RosterSlot>> {
        let url = format!("{}/teams/{}/roster", self.site_base, team_id);
        let slots = self
            .rosters
            .get_or_fetch(team_id, || async {
                let value = self.request_json(&url, &[]).await?;
                Ok(roster_from_payload(&value))
            })
            .await?;
        Ok(slots.as_ref().clone())
    }

    /// Season schedule for a team, fed to the advisory prompt as matchup
    /// context; opaque to the engine
    pub async fn team_schedule(&self, team_id: &str) -> Result<Value> {
        let url = format!(
            "{}/seasons/{}/teams/{}/events",
            self.v2_base, self.season, team_id
        );
        self.request_json(&url, &[]).await
    }
}

#[async_trait::async_trait]
impl IdentitySource for EspnClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Espn
    }

    async fn find_by_name(&self, query: &str) -> Lookup<PlayerIdentity> {
        let athletes = match self
            .athletes
            .get_or_fetch(ALL_PLAYERS_KEY, || self.fetch_athletes())
            .await
        {
            Ok(athletes) => athletes,
            Err(e) => {
                warn!(error = %e, "ESPN athlete list unavailable");
                return Lookup::Unavailable;
            }
        };

        for athlete in athletes.iter() {
            if matcher::matches(&athlete.display_name, query) {
                debug!(id = %athlete.id, name = %athlete.display_name, "ESPN match");
                return Lookup::Found(self.resolve_identity(athlete).await);
            }
        }

        Lookup::NotFound
    }

    async fn get_attributes(&self, player_id: &str) -> Lookup<AttributeBundle> {
        let url = format!(
            "{}/seasons/{}/types/2/athletes/{}/statistics/0",
            self.v2_base, self.season, player_id
        );

        match self.request_json(&url, &[]).await {
            Ok(value) => {
                let parsed = parse_stats(&value);
                if parsed.is_empty() {
                    return Lookup::NotFound;
                }
                let summary = stats_summary(&parsed, &self.season);
                Lookup::Found(AttributeBundle { parsed, summary })
            }
            Err(e) => {
                warn!(player_id, error = %e, "ESPN statistics unavailable");
                Lookup::Unavailable
            }
        }
    }

    async fn get_status(&self, player_id: &str) -> String {
        let url = format!("{}/athletes/{}", self.v2_base, player_id);
        match self.request_json(&url, &[]).await {
            Ok(detail) => status_from_detail(&detail),
            Err(e) => {
                warn!(player_id, error = %e, "ESPN status lookup failed; defaulting");
                crate::domain::DEFAULT_STATUS.to_string()
            }
        }
    }
}

/// Decode the bulk v3 athlete list, keeping active players with an id and a
/// display name and dropping anything malformed
fn athletes_from_list(value: &Value) -> Result<Vec<EspnAthlete>> {
    let items = value
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| ScoutError::Upstream("ESPN athlete list missing items".to_string()))?;

    Ok(items
        .iter()
        .filter(|item| item.get("active").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|item| {
            Some(EspnAthlete {
                id: pick_id(item, &["id"])?,
                display_name: pick_str(item, &["displayName", "fullName"])?.to_string(),
            })
        })
        .collect())
}

/// Flatten `splits.categories[].stats[]` into "{category}_{stat}" -> value
fn parse_stats(value: &Value) -> HashMap<String, f64> {
    let mut parsed = HashMap::new();

    let categories = value
        .get("splits")
        .and_then(|s| s.get("categories"))
        .and_then(Value::as_array);

    for category in categories.into_iter().flatten() {
        let category_name = pick_str(category, &["name"]).unwrap_or_default();
        let stats = category.get("stats").and_then(Value::as_array);
        for stat in stats.into_iter().flatten() {
            let stat_name = pick_str(stat, &["name"]).unwrap_or_default();
            let stat_value = stat.get("value").and_then(Value::as_f64).unwrap_or(0.0);
            parsed.insert(format!("{}_{}", category_name, stat_name), stat_value);
        }
    }

    parsed
}

/// One-line fantasy-relevant summary of a parsed stat map
fn stats_summary(parsed: &HashMap<String, f64>, season: &str) -> String {
    let get = |key: &str| parsed.get(key).copied().unwrap_or(0.0);

    format!(
        "{} season: {:.0} pass yds, {:.0} pass TDs, {:.0} INTs, {:.0} rush yds, {:.0} rush TDs, {:.0} rec, {:.0} rec yds, {:.0} rec TDs",
        season,
        get("passing_passingYards"),
        get("passing_passingTouchdowns"),
        get("passing_interceptions"),
        get("rushing_rushingYards"),
        get("rushing_rushingTouchdowns"),
        get("receiving_receptions"),
        get("receiving_receivingYards"),
        get("receiving_receivingTouchdowns"),
    )
}

/// First injury status from an athlete detail payload, default "Healthy"
fn status_from_detail(detail: &Value) -> String {
    let injuries = detail.get("injuries").and_then(Value::as_array);
    match injuries.and_then(|list| list.first()) {
        Some(injury) => pick_str(injury, &["status"]).unwrap_or("Injured").to_string(),
        None => crate::domain::DEFAULT_STATUS.to_string(),
    }
}

/// Flatten a grouped site-API roster payload into individual slots
fn roster_from_payload(value: &Value) -> Vec<RosterSlot> {
    let mut slots = Vec::new();

    let groups = value.get("athletes").and_then(Value::as_array);
    for group in groups.into_iter().flatten() {
        let items = group.get("items").and_then(Value::as_array);
        for item in items.into_iter().flatten() {
            let Some(id) = pick_id(item, &["id"]) else {
                continue;
            };
            let Some(display_name) = pick_str(item, &["displayName", "fullName"]) else {
                continue;
            };
            let position = pick_obj(item, &["position"])
                .and_then(|p| pick_str(p, &["abbreviation"]))
                .unwrap_or("N/A");

            slots.push(RosterSlot {
                id,
                display_name: display_name.to_string(),
                position: position.to_string(),
            });
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn athlete_list_keeps_active_entries_only() {
        let value = json!({
            "items": [
                {"id": 3139477, "displayName": "Patrick Mahomes", "active": true},
                {"id": 11111, "displayName": "Retired Guy", "active": false},
                {"displayName": "No Id", "active": true},
                {"id": 15847, "displayName": "Travis Kelce", "active": true},
            ]
        });

        let athletes = athletes_from_list(&value).unwrap();
        assert_eq!(athletes.len(), 2);
        assert_eq!(athletes[0].id, "3139477");
        assert_eq!(athletes[0].display_name, "Patrick Mahomes");
        assert_eq!(athletes[1].display_name, "Travis Kelce");
    }

    #[test]
    fn athlete_list_without_items_is_an_error() {
        assert!(athletes_from_list(&json!({"count": 0})).is_err());
    }

    #[test]
    fn stats_are_flattened_by_category() {
        let value = json!({
            "splits": {
                "categories": [
                    {
                        "name": "passing",
                        "stats": [
                            {"name": "passingYards", "value": 4183.0},
                            {"name": "passingTouchdowns", "value": 26.0},
                        ]
                    },
                    {
                        "name": "rushing",
                        "stats": [{"name": "rushingYards", "value": 389.0}]
                    }
                ]
            }
        });

        let parsed = parse_stats(&value);
        assert_eq!(parsed.get("passing_passingYards"), Some(&4183.0));
        assert_eq!(parsed.get("passing_passingTouchdowns"), Some(&26.0));
        assert_eq!(parsed.get("rushing_rushingYards"), Some(&389.0));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn malformed_stats_payload_parses_to_empty() {
        assert!(parse_stats(&json!({"splits": {}})).is_empty());
        assert!(parse_stats(&json!("nonsense")).is_empty());
    }

    #[test]
    fn summary_reads_known_keys() {
        let mut parsed = HashMap::new();
        parsed.insert("passing_passingYards".to_string(), 4183.0);
        parsed.insert("passing_passingTouchdowns".to_string(), 26.0);

        let summary = stats_summary(&parsed, "2025");
        assert!(summary.starts_with("2025 season: 4183 pass yds, 26 pass TDs"));
    }

    #[test]
    fn status_defaults_to_healthy_without_injuries() {
        assert_eq!(status_from_detail(&json!({})), "Healthy");
        assert_eq!(status_from_detail(&json!({"injuries": []})), "Healthy");
        assert_eq!(
            status_from_detail(&json!({"injuries": [{"status": "Questionable"}]})),
            "Questionable"
        );
        assert_eq!(status_from_detail(&json!({"injuries": [{}]})), "Injured");
    }

    #[test]
    fn grouped_roster_is_flattened() {
        let value = json!({
            "athletes": [
                {
                    "position": "offense",
                    "items": [
                        {"id": "1", "displayName": "QB One", "position": {"abbreviation": "QB"}},
                        {"id": "2", "displayName": "RB One", "position": {"abbreviation": "RB"}},
                    ]
                },
                {
                    "position": "specialTeam",
                    "items": [{"id": "3", "displayName": "K One", "position": {"abbreviation": "PK"}}]
                }
            ]
        });

        let slots = roster_from_payload(&value);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2].position, "PK");
    }
}
