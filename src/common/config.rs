//! Configuration for the valuation service.
//!
//! Configuration lives at `~/.wertwerk/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (`WERTWERK_*` prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `WERTWERK_HOST` → server.host
//! - `WERTWERK_PORT` → server.port
//! - `WERTWERK_EXTRACTION_ENDPOINT` → extraction.endpoint
//! - `WERTWERK_EXTRACTION_API_KEY` → extraction.api_key
//! - `WERTWERK_LOG_LEVEL` → observability.log_level
//! - `WERTWERK_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".wertwerk"),
        |dirs| dirs.home_dir().join(".wertwerk"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default: "127.0.0.1" (local only)
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4460
}

// ============================================================================
// Delegated Extraction Configuration
// ============================================================================

/// Configuration for the external natural-language extraction service.
///
/// When `enabled` is false or `endpoint` is empty, the engine uses local
/// rule-based extraction exclusively.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionConfig {
    /// Whether delegated extraction is attempted at all
    #[serde(default)]
    pub enabled: bool,
    /// Extraction service endpoint (e.g. "https://api.example.com/v1/extract")
    #[serde(default)]
    pub endpoint: String,
    /// API key for the extraction service
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_extraction_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_extraction_timeout_secs() -> u64 {
    15
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Delegated extraction service settings
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration and apply environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `WERTWERK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("WERTWERK_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("WERTWERK_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(endpoint) = std::env::var("WERTWERK_EXTRACTION_ENDPOINT") {
            self.extraction.enabled = !endpoint.is_empty();
            self.extraction.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("WERTWERK_EXTRACTION_API_KEY") {
            self.extraction.api_key = key;
        }
        if let Ok(level) = std::env::var("WERTWERK_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("WERTWERK_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }
}
