//! Configuration loading and validation for `aesctl`.
//!
//! Values are read from `AESCTL_*` environment variables and supply the
//! defaults that command-line flags override.

use aes_facade::{CipherParams, ValidationError, DEFAULT_KEY_LEN};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated `aesctl` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default key size in bits (`AESCTL_KEY_SIZE`).
    #[serde(default = "default_key_size")]
    pub key_size: u32,

    /// Default mode name (`AESCTL_MODE`).
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Default option bits (`AESCTL_OPTIONS`).
    #[serde(default)]
    pub options: u32,

    /// Default `keygen` length in bytes (`AESCTL_KEY_LENGTH`).
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    /// Tracing log level (`AESCTL_LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_size() -> u32 {
    256
}
fn default_mode() -> String {
    "CBC".into()
}
fn default_key_length() -> usize {
    DEFAULT_KEY_LEN
}
fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("AESCTL"))
            .build()
            .context("failed to build aesctl configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise aesctl configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Default cipher parameters, with optional per-invocation overrides.
    pub fn params(
        &self,
        key_size: Option<u32>,
        mode: Option<&str>,
        options: Option<u32>,
    ) -> Result<CipherParams, ValidationError> {
        CipherParams::parse(
            key_size.unwrap_or(self.key_size),
            mode.unwrap_or(&self.mode),
            options.unwrap_or(self.options),
        )
    }

    fn validate(&self) -> Result<()> {
        self.params(None, None, None)
            .context("AESCTL_KEY_SIZE, AESCTL_MODE and AESCTL_OPTIONS must form a valid combination")?;
        if self.key_length == 0 {
            anyhow::bail!("AESCTL_KEY_LENGTH must be > 0");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_size: default_key_size(),
            mode: default_mode(),
            options: 0,
            key_length: default_key_length(),
            log_level: default_log_level(),
        }
    }
}
