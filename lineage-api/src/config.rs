//! Process-start configuration: a YAML file layered with environment
//! overrides, loaded straight into a small typed config struct via
//! `serde_yaml` (no builder).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_taxonomy_path")]
    pub taxonomy_path: PathBuf,
    #[serde(default = "default_seed_path")]
    pub seed_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: default_bind_addr(),
            taxonomy_path: default_taxonomy_path(),
            seed_path: default_seed_path(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:4600".to_string()
}

fn default_taxonomy_path() -> PathBuf {
    PathBuf::from("fixtures/taxonomy.yaml")
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("fixtures/fraud_detection.yaml")
}

impl ApiConfig {
    /// Load `config.yaml` if present, falling back to defaults, then apply
    /// `LINEAGE_BIND_ADDR` / `LINEAGE_TAXONOMY_PATH` / `LINEAGE_SEED_PATH`
    /// environment overrides on top of the loaded config.
    pub fn load(config_path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = if config_path.exists() {
            let raw = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?
        } else {
            ApiConfig::default()
        };

        if let Ok(bind_addr) = std::env::var("LINEAGE_BIND_ADDR") {
            config.bind_addr = bind_addr;
        }
        if let Ok(taxonomy_path) = std::env::var("LINEAGE_TAXONOMY_PATH") {
            config.taxonomy_path = PathBuf::from(taxonomy_path);
        }
        if let Ok(seed_path) = std::env::var("LINEAGE_SEED_PATH") {
            config.seed_path = PathBuf::from(seed_path);
        }

        Ok(config)
    }
}
