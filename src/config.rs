//! Configuration loader - YAML settings + .env overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::plant::Preset;

/// Settings loaded from plants.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Children bred per generation
    pub brood_size: usize,
    pub generations: usize,
    pub default_preset: Preset,
    pub seed: Option<u64>,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brood_size: 5,
            generations: 1,
            default_preset: Preset::Aspen,
            seed: None,
            preview: PreviewConfig::default(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 40,
        }
    }
}

/// Process overrides loaded from .env
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub log_dir: String,
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Seed to use: explicit, then environment, then this file
    pub fn resolve_seed(&self, cli: Option<u64>, env: &Env) -> Option<u64> {
        cli.or(env.seed).or(self.seed)
    }
}

impl Env {
    /// Load overrides from .env file and the process environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Env {
            log_dir: std::env::var("PLANT_LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            seed: std::env::var("PLANT_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }
}
