//! Configuration management for hosttech-ddns.
//!
//! Values come from three layers, highest priority first: command line
//! flags and environment variables (both handled by clap), the optional
//! TOML file, built-in defaults.

use crate::detector::{default_ipv4_services, default_ipv6_services};
use crate::error::{DdnsError, Result};
use crate::providers::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Poll interval in minutes when nothing else is configured.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;

/// Longest accepted poll interval: one week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Contents of the optional TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileConfig {
    pub token: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    pub interval_minutes: Option<u64>,
    pub single_run: Option<bool>,
    pub api_base_url: Option<String>,
    pub ipv4_services: Option<Vec<String>>,
    pub ipv6_services: Option<Vec<String>>,
}

impl FileConfig {
    /// Default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("hosttech-ddns").join("config.toml"))
    }

    /// Load from a specific path. A missing file yields an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub domains: Vec<String>,
    pub interval_minutes: Option<u64>,
    pub single_run: bool,
    pub api_base_url: Option<String>,
}

/// Validated runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub domains: Vec<String>,
    pub interval_minutes: u64,
    pub single_run: bool,
    pub api_base_url: String,
    pub ipv4_services: Vec<String>,
    pub ipv6_services: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("domains", &self.domains)
            .field("interval_minutes", &self.interval_minutes)
            .field("single_run", &self.single_run)
            .field("api_base_url", &self.api_base_url)
            .field("ipv4_services", &self.ipv4_services)
            .field("ipv6_services", &self.ipv6_services)
            .finish()
    }
}

impl Config {
    /// Merge the layers and validate the result.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let domains = if overrides.domains.is_empty() {
            file.domains
        } else {
            overrides.domains
        };

        Self {
            token: overrides.token.or(file.token).unwrap_or_default(),
            domains,
            interval_minutes: overrides
                .interval_minutes
                .or(file.interval_minutes)
                .unwrap_or(DEFAULT_INTERVAL_MINUTES),
            single_run: overrides.single_run || file.single_run.unwrap_or(false),
            api_base_url: overrides
                .api_base_url
                .or(file.api_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ipv4_services: file.ipv4_services.unwrap_or_else(default_ipv4_services),
            ipv6_services: file.ipv6_services.unwrap_or_else(default_ipv6_services),
        }
        .validated()
    }

    /// Drop blank domains and reject unusable settings.
    pub fn validated(mut self) -> Result<Self> {
        self.token = self.token.trim().to_string();
        if self.token.is_empty() {
            return Err(DdnsError::Config(
                "Token is required. Provide it with -t/--token or set the TOKEN environment variable."
                    .to_string(),
            ));
        }

        self.domains = self
            .domains
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if self.domains.is_empty() {
            return Err(DdnsError::Config(
                "At least one domain is required. Provide it with -d/--domain or set the DOMAINS environment variable."
                    .to_string(),
            ));
        }

        if self.interval_minutes == 0 || self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(DdnsError::Config(format!(
                "Interval must be between 1 and {} minutes, got {}",
                MAX_INTERVAL_MINUTES, self.interval_minutes
            )));
        }

        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}
