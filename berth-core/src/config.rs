//! Centralized configuration for Berth.
//!
//! All tunable parameters are defined here and passed into component
//! constructors explicitly; nothing reads ambient state at use time.
//! Supports environment variable overrides for runtime customization.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Central configuration for all Berth components.
///
/// Groups related settings into logical sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BerthConfig {
    pub catalog: CatalogConfig,
    pub ratio: RatioConfig,
    pub storage: StorageConfig,
}

impl BerthConfig {
    /// Builds configuration from defaults with `BERTH_*` environment
    /// variable overrides.
    ///
    /// Unset or unparseable variables fall back to the default value.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(page_size) = env_parse("BERTH_PAGE_SIZE") {
            config.catalog.page_size = page_size;
        }
        if let Some(mode) = env_parse("BERTH_RATIO_MODE") {
            config.ratio.mode = mode;
        }
        if let Some(min_ratio) = env_parse("BERTH_MIN_RATIO") {
            config.ratio.min_ratio = min_ratio;
        }
        if let Some(min_seed_time) = env_parse("BERTH_MIN_SEEDTIME") {
            config.ratio.min_seed_time = min_seed_time;
        }
        if let Some(backend) = env_parse("BERTH_STORAGE_BACKEND") {
            config.storage.backend = backend;
        }
        if let Ok(root) = std::env::var("BERTH_ARTIFACT_ROOT") {
            config.storage.artifact_root = PathBuf::from(root);
        }

        config
    }

    /// Preset for tests: in-memory artifact storage, defaults elsewhere.
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..StorageConfig::default()
            },
            ..Self::default()
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

/// Catalog listing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Entries per listing page
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { page_size: 25 }
    }
}

/// Contribution requirement configuration.
///
/// Selects which requirement the deployment enforces; the ledger exposes
/// both evaluators regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Which contribution requirement is enforced
    pub mode: RatioMode,
    /// Minimum ratio (applies when mode is `Full`)
    pub min_ratio: f64,
    /// Minimum seed time in seconds (applies when mode is `SeedTime`)
    pub min_seed_time: u64,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            mode: RatioMode::Full,
            min_ratio: 0.5,
            min_seed_time: 86_400, // 24 hours
        }
    }
}

/// Ratio tracking mode for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioMode {
    /// Track upload/download bytes and enforce the ratio requirement
    Full,
    /// No contribution enforcement
    Off,
    /// Enforce seed time instead of ratio (ratioless)
    SeedTime,
}

impl FromStr for RatioMode {
    type Err = ConfigParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "full" => Ok(RatioMode::Full),
            "off" => Ok(RatioMode::Off),
            "seedtime" => Ok(RatioMode::SeedTime),
            _ => Err(ConfigParseError {
                input: text.to_string(),
            }),
        }
    }
}

/// Artifact storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which artifact storage backend to use
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend
    pub artifact_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            artifact_root: PathBuf::from("torrents"),
        }
    }
}

/// Artifact storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "filesystem" => Ok(StorageBackend::Filesystem),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigParseError {
                input: text.to_string(),
            }),
        }
    }
}

/// Error from parsing a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized configuration value: {input:?}")]
pub struct ConfigParseError {
    pub input: String,
}
