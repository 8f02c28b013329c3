use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::adapters::EspnClient;
use crate::agent::PlayerAdvisor;
use crate::aggregator::Aggregator;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,

    /// ESPN client kept separately for schedule lookups
    pub espn: Arc<EspnClient>,

    /// Advisory client (optional, only set when an API key is configured)
    pub advisor: Option<Arc<PlayerAdvisor>>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        aggregator: Arc<Aggregator>,
        espn: Arc<EspnClient>,
        advisor: Option<Arc<PlayerAdvisor>>,
    ) -> Self {
        Self {
            aggregator,
            espn,
            advisor,
            start_time: Utc::now(),
        }
    }

    /// Get service uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
