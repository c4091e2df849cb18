//! Application configuration
//!
//! Configuration is a plain TOML file; a missing file is replaced with a
//! default one on first load so a fresh checkout runs without ceremony.
//! Durations are human-readable strings ("60s", "5m") via `duration_serde`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ConfigError;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Shape of the ingestion source and the transform applied to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// Rows read and processed per chunk; bounds peak memory during a run
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Samples per source scanline (the CSV's pixel column count)
    #[serde(default = "default_source_width")]
    pub source_width: usize,
    /// Width of the stored frames after resampling
    #[serde(default = "default_target_width")]
    pub target_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Point-lookup cache capacity (entries)
    #[serde(default = "default_frame_capacity")]
    pub frame_capacity: usize,
    /// Range-query cache capacity (entries)
    #[serde(default = "default_range_capacity")]
    pub range_capacity: usize,
    /// Time-to-live applied to every entry in both caches
    #[serde(with = "duration_serde::duration", default = "default_cache_ttl")]
    pub ttl: Duration,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}
fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}
fn default_csv_path() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_PATH)
}
fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_source_width() -> usize {
    DEFAULT_SOURCE_WIDTH
}
fn default_target_width() -> usize {
    DEFAULT_TARGET_WIDTH
}
fn default_frame_capacity() -> usize {
    DEFAULT_FRAME_CACHE_CAPACITY
}
fn default_range_capacity() -> usize {
    DEFAULT_RANGE_CACHE_CAPACITY
}
fn default_cache_ttl() -> Duration {
    Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            ingestion: IngestionConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            chunk_size: default_chunk_size(),
            source_width: default_source_width(),
            target_width: default_target_width(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            frame_capacity: default_frame_capacity(),
            range_capacity: default_range_capacity(),
            ttl: default_cache_ttl(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "depthframe.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self, ConfigError> {
        let config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.chunk_size == 0 || self.ingestion.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::invalid(format!(
                "ingestion.chunk_size must be within 1..={MAX_CHUNK_SIZE}, got {}",
                self.ingestion.chunk_size
            )));
        }
        if self.ingestion.source_width == 0 {
            return Err(ConfigError::invalid("ingestion.source_width must be > 0"));
        }
        if self.ingestion.target_width == 0 {
            return Err(ConfigError::invalid("ingestion.target_width must be > 0"));
        }
        if self.cache.frame_capacity == 0 {
            return Err(ConfigError::invalid("cache.frame_capacity must be > 0"));
        }
        if self.cache.range_capacity == 0 {
            return Err(ConfigError::invalid("cache.range_capacity must be > 0"));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::invalid("cache.ttl must be > 0"));
        }
        Ok(())
    }
}
