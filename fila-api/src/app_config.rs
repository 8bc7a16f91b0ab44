use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Countdown turns urgent under this many seconds.
    #[serde(default = "default_urgency_threshold")]
    pub urgency_threshold_seconds: u32,
    /// Upper bound for authorization artifact uploads.
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: u64,
    /// TTL for the cached ticket price.
    #[serde(default = "default_price_ttl")]
    pub price_cache_seconds: u64,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            urgency_threshold_seconds: default_urgency_threshold(),
            max_artifact_bytes: default_max_artifact_bytes(),
            price_cache_seconds: default_price_ttl(),
        }
    }
}

fn default_urgency_threshold() -> u32 {
    60
}

fn default_max_artifact_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_price_ttl() -> u64 {
    300
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("FILA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
