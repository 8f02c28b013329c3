use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// ESPN core API v2 base (entity detail, statistics, schedules)
    #[serde(default = "default_espn_v2_url")]
    pub espn_v2_url: String,
    /// ESPN core API v3 base (bulk athlete listing)
    #[serde(default = "default_espn_v3_url")]
    pub espn_v3_url: String,
    /// ESPN site API base (grouped team rosters)
    #[serde(default = "default_espn_site_url")]
    pub espn_site_url: String,
    /// Sleeper API base (bulk player map with inline injury fields)
    #[serde(default = "default_sleeper_url")]
    pub sleeper_url: String,
    /// Season used for statistics and schedule lookups
    #[serde(default = "default_season")]
    pub season: String,
    /// Per-request timeout for ESPN calls in seconds
    #[serde(default = "default_espn_timeout")]
    pub espn_timeout_secs: u64,
    /// Per-request timeout for Sleeper calls in seconds
    #[serde(default = "default_sleeper_timeout")]
    pub sleeper_timeout_secs: u64,
}

fn default_espn_v2_url() -> String {
    "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl".to_string()
}

fn default_espn_v3_url() -> String {
    "https://sports.core.api.espn.com/v3/sports/football/nfl".to_string()
}

fn default_espn_site_url() -> String {
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl".to_string()
}

fn default_sleeper_url() -> String {
    "https://api.sleeper.app/v1".to_string()
}

fn default_season() -> String {
    "2025".to_string()
}

fn default_espn_timeout() -> u64 {
    60
}

fn default_sleeper_timeout() -> u64 {
    30
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            espn_v2_url: default_espn_v2_url(),
            espn_v3_url: default_espn_v3_url(),
            espn_site_url: default_espn_site_url(),
            sleeper_url: default_sleeper_url(),
            season: default_season(),
            espn_timeout_secs: default_espn_timeout(),
            sleeper_timeout_secs: default_sleeper_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// OpenAI-compatible chat completions endpoint base
    #[serde(default = "default_advisor_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_advisor_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_advisor_timeout")]
    pub timeout_secs: u64,
}

fn default_advisor_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_advisor_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_advisor_timeout() -> u64 {
    45
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: default_advisor_url(),
            model: default_advisor_model(),
            timeout_secs: default_advisor_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_api_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("GRIDSCOUT_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (GRIDSCOUT_PROVIDERS__SEASON, etc.)
            .add_source(
                Environment::with_prefix("GRIDSCOUT")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            advisor: AdvisorConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = AppConfig::default();
        assert!(config.providers.espn_v3_url.contains("espn.com"));
        assert!(config.providers.sleeper_url.contains("sleeper.app"));
        assert_eq!(config.api.port, 8000);
    }

    #[test]
    fn load_from_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("does-not-exist").expect("defaults should apply");
        assert_eq!(config.providers.season, "2025");
        assert_eq!(config.providers.espn_timeout_secs, 60);
        assert_eq!(config.providers.sleeper_timeout_secs, 30);
    }
}
