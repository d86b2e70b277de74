use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::compatibility::{default_rules, CompatibilityRule, CompatibilityTable};
use crate::core::MatchingEngine;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub compatibility: CompatibilitySettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Fixed seed for the proposer/acceptor split; random per run when unset
    pub seed: Option<u64>,
    /// Largest population a single request may submit
    pub max_participants: Option<usize>,
}

/// Which identities each gender preference accepts
#[derive(Debug, Clone, Deserialize)]
pub struct CompatibilitySettings {
    #[serde(default = "default_rules")]
    pub rules: Vec<CompatibilityRule>,
}

impl Default for CompatibilitySettings {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl CompatibilitySettings {
    pub fn table(&self) -> CompatibilityTable {
        CompatibilityTable::from_rules(self.rules.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_grad_year_weight")]
    pub grad_year: f64,
    #[serde(default = "default_responses_weight")]
    pub responses: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            grad_year: default_grad_year_weight(),
            responses: default_responses_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            grad_year: config.grad_year,
            responses: config.responses,
        }
    }
}

fn default_grad_year_weight() -> f64 { 0.10 }
fn default_responses_weight() -> f64 { 0.90 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAIRING__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAIRING__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Engine configured with this compatibility table and seed
    pub fn matching_engine(&self) -> MatchingEngine {
        let engine = MatchingEngine::new(self.compatibility.table());
        match self.matching.seed {
            Some(seed) => engine.with_seed(seed),
            None => engine,
        }
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("PAIRING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
