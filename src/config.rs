//! Inventory configuration
//!
//! A YAML file lists the arrays to inventory, one section per array, plus
//! optional transport settings shared by all of them:
//!
//! ```yaml
//! settings:
//!   timeout_secs: 600
//!   max_retries: 3
//! arrays:
//!   "000295700220":
//!     address: 10.0.0.10
//!     user: smc
//!     password: smc
//! ```
//!
//! Section order is kept: arrays are inventoried in file order.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete inventory configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Transport settings
    pub settings: Settings,

    /// Arrays to inventory, in file order
    pub arrays: Vec<ArrayEndpoint>,
}

/// Connection parameters of one array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEndpoint {
    /// Section name. For VMAX this is the Symmetrix ID.
    pub name: String,
    /// Host name or IP address
    pub address: String,
    /// Login
    pub user: String,
    /// Password
    pub password: String,
    /// Management port, backend default when absent
    pub port: Option<u16>,
}

impl ArrayEndpoint {
    /// Configured port, or `default` when none is set
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Transport settings shared by every array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Timeout of every call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient connection failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay, in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling, in seconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    /// Request rate ceiling for REST backends (0 = unlimited)
    #[serde(default)]
    pub requests_per_second: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_ms(),
            max_backoff_secs: default_max_backoff(),
            requests_per_second: 0,
        }
    }
}

fn default_timeout() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    30
}

impl Settings {
    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client configuration derived from these settings
    pub fn http_config(&self, base_url: impl Into<String>) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(self.timeout())
            .max_retries(self.max_retries)
            .backoff(
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_secs(self.max_backoff_secs),
            )
            .rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
            .build()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// On-disk layout, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    settings: Settings,
    arrays: Option<IndexMap<String, RawSection>>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    address: Option<String>,
    user: Option<String>,
    password: Option<String>,
    port: Option<u16>,
}

/// Load and validate the configuration file at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<InventoryConfig> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(Error::config(format!("Unknown file {}", path.display())));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Insufficient rights on {} ({e})", path.display()))
    })?;

    load_config_from_str(&content)
}

/// Parse and validate a configuration document
pub fn load_config_from_str(yaml: &str) -> Result<InventoryConfig> {
    let raw: RawConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Incorrect config file, please check syntax: {e}")))?;

    let sections = raw
        .arrays
        .ok_or_else(|| Error::config("'arrays' section is missing"))?;

    let arrays = sections
        .into_iter()
        .map(|(name, section)| validate_section(name, section))
        .collect::<Result<Vec<_>>>()?;

    Ok(InventoryConfig {
        settings: raw.settings,
        arrays,
    })
}

fn validate_section(name: String, section: RawSection) -> Result<ArrayEndpoint> {
    let required = |value: Option<String>, field: &str| -> Result<String> {
        match value {
            None => Err(Error::missing_field(&name, field)),
            Some(v) if v.trim().is_empty() => Err(Error::config(format!(
                "'{field}' item cannot be empty in section '{name}'"
            ))),
            Some(v) => Ok(v),
        }
    };

    let address = required(section.address, "address")?;
    let user = required(section.user, "user")?;
    let password = required(section.password, "password")?;

    Ok(ArrayEndpoint {
        name,
        address,
        user,
        password,
        port: section.port,
    })
}
