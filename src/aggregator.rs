//! Aggregation engine: merges both providers into one canonical record.
//!
//! ESPN is authoritative for identity fields (name, team, position); Sleeper
//! is authoritative for status and teammate context. Each provider resolves
//! the query independently with first-match-wins, so genuinely ambiguous
//! queries may land on different real-world players per provider; that
//! approximation is accepted and never reconciled across providers.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{PlayerRecord, PositionGroup, ProviderIds, DEFAULT_STATUS};
use crate::error::{Result, ScoutError};
use crate::provider::{IdentitySource, Lookup, StatusSource};

pub struct Aggregator {
    identity: Arc<dyn IdentitySource>,
    status: Arc<dyn StatusSource>,
}

impl Aggregator {
    pub fn new(identity: Arc<dyn IdentitySource>, status: Arc<dyn StatusSource>) -> Self {
        Self { identity, status }
    }

    /// Resolve a player name against both providers and merge the partial
    /// results into one record. Upstream failures degrade to defaults; the
    /// only error surfaced to the caller is an empty query.
    pub async fn aggregate(&self, query: &str) -> Result<PlayerRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScoutError::Validation(
                "player name must not be empty".to_string(),
            ));
        }

        // The two lookups are independent; dispatch them together.
        let (identity, status_entry) = tokio::join!(
            self.identity.find_by_name(query),
            self.status.find_by_name(query),
        );

        let mut record = match identity {
            Lookup::Found(player) => {
                info!(name = %player.display_name, team = %player.team, "identity resolved");
                let mut record = PlayerRecord {
                    display_name: player.display_name,
                    position: player.position,
                    team: player.team,
                    provider_ids: ProviderIds {
                        espn: Some(player.id),
                        sleeper: None,
                    },
                    attributes: Default::default(),
                    status: DEFAULT_STATUS.to_string(),
                };
                if let Some(team_id) = player.team_id {
                    record
                        .attributes
                        .insert("teamId".to_string(), Value::String(team_id));
                }
                record
            }
            Lookup::NotFound => {
                info!(query, "no identity match; synthesizing fallback record");
                PlayerRecord::fallback(query)
            }
            Lookup::Unavailable => {
                warn!(query, "identity provider unavailable; synthesizing fallback record");
                PlayerRecord::fallback(query)
            }
        };

        if let Lookup::Found(entry) = status_entry {
            record.provider_ids.sleeper = Some(entry.id);
            if let Some(adverse) = entry.status {
                record.status = adverse;
            }
        }

        if record.has_known_team() && record.has_known_position() {
            let group = PositionGroup::from_position(&record.position);
            let injuries = self.status.team_injuries(&record.team, &group).await;
            let teammates: Vec<_> = injuries
                .into_iter()
                .filter(|injury| !injury.name.eq_ignore_ascii_case(&record.display_name))
                .collect();
            debug!(count = teammates.len(), "teammate context resolved");
            record
                .attributes
                .insert("injuredTeammates".to_string(), serde_json::to_value(teammates)?);
        }

        if let Some(espn_id) = record.provider_ids.espn.clone() {
            if let Lookup::Found(bundle) = self.identity.get_attributes(&espn_id).await {
                record
                    .attributes
                    .insert("stats".to_string(), serde_json::to_value(bundle)?);
            }
        }

        Ok(record)
    }
}
