use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
/// Absent section = a single attempt per image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per image (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Fails on a base delay that is not a representable duration
    /// (negative, NaN, infinite, or beyond `Duration::MAX`).
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs)
            .with_context(|| format!("retry.base_delay_secs = {} is out of range", self.base_delay_secs))?;
        Ok(RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
        })
    }
}

/// Global configuration loaded from `~/.config/nunge/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NungeConfig {
    /// Directory that materialized images are written to. Served as `url_prefix`.
    pub public_dir: PathBuf,
    /// Public URL prefix for files under `public_dir` (e.g. `/blog`).
    pub url_prefix: String,
    /// Maximum number of image fetches in flight per batch.
    pub max_concurrent_fetches: usize,
    /// Listen address for `nunge serve`.
    pub bind_addr: String,
    /// Optional connect timeout in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Optional whole-transfer timeout in seconds (None = no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Optional retry policy; if missing, failures are not retried.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Log file (None = `$XDG_STATE_HOME/nunge/nunge.log`).
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for NungeConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public/blog"),
            url_prefix: "/blog".to_string(),
            max_concurrent_fetches: 8,
            bind_addr: "0.0.0.0:3000".to_string(),
            connect_timeout_secs: None,
            timeout_secs: None,
            retry: None,
            log_file: None,
        }
    }
}

impl NungeConfig {
    /// Apply `NUNGE_PUBLIC_DIR` / `NUNGE_BIND_ADDR` / `NUNGE_LOG_FILE`
    /// overrides using `lookup` (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("NUNGE_PUBLIC_DIR").filter(|v| !v.is_empty()) {
            tracing::debug!("NUNGE_PUBLIC_DIR override: {}", dir);
            self.public_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("NUNGE_BIND_ADDR").filter(|v| !v.is_empty()) {
            tracing::debug!("NUNGE_BIND_ADDR override: {}", addr);
            self.bind_addr = addr;
        }
        if let Some(file) = lookup("NUNGE_LOG_FILE").filter(|v| !v.is_empty()) {
            self.log_file = Some(PathBuf::from(file));
        }
    }

    /// Reject values that parse as TOML but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if let Some(retry) = &self.retry {
            retry.to_policy()?;
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("nunge")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists,
/// then apply environment overrides.
pub fn load_or_init() -> Result<NungeConfig> {
    let path = config_path()?;
    let mut cfg = if !path.exists() {
        let default_cfg = NungeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    } else {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?
    };
    cfg.apply_env_overrides(|key| std::env::var(key).ok());
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
