pub mod adapters;
pub mod agent;
pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod matcher;
pub mod provider;

pub use adapters::{EspnClient, SleeperClient};
pub use agent::{Analysis, Comparison, LlmClient, LlmConfig, PlayerAdvisor};
pub use aggregator::Aggregator;
pub use cache::DatasetCache;
pub use config::AppConfig;
pub use domain::{InjuredTeammate, PlayerRecord, PositionGroup, ProviderIds};
pub use error::{Result, ScoutError};
pub use provider::{
    AttributeBundle, IdentitySource, Lookup, PlayerIdentity, ProviderKind, StatusEntry,
    StatusSource,
};
