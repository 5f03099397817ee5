use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{self, KeyMaterial};

pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Runtime configuration: where the store lives and where the key
/// material comes from.
///
/// Sourced from a JSON config file, environment variables, or CLI
/// arguments (the CLI layer merges its own flags on top).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store connection URL.
    pub url: String,
    /// Path to a `name=value` key file.
    pub keyfile: Option<PathBuf>,
    /// Raw 128-bit key as at least 32 hex characters.
    pub key_hex: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            keyfile: None,
            key_hex: None,
        }
    }
}

impl Config {
    /// Reads configuration from `REDISEAL_URL`, `REDISEAL_KEYFILE` and
    /// `REDISEAL_KEY`.
    pub fn from_env() -> Self {
        Self {
            url: env::var("REDISEAL_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            keyfile: env::var("REDISEAL_KEYFILE").ok().map(PathBuf::from),
            key_hex: env::var("REDISEAL_KEY").ok(),
        }
    }

    /// Loads configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }

    /// Resolves key material from the configured sources.
    ///
    /// The key file wins over a raw hex key when both are set; it
    /// carries the salt and passphrase and is the richer source. Returns
    /// `Ok(None)` when no key source is configured at all.
    pub fn key_material(&self) -> Result<Option<KeyMaterial>> {
        if let Some(path) = &self.keyfile {
            let material = crypto::load_key_file(path)
                .with_context(|| format!("failed to load key file {}", path.display()))?;
            return Ok(Some(material));
        }

        if let Some(hexstr) = &self.key_hex {
            let material =
                KeyMaterial::from_hex(hexstr).context("failed to parse raw hex key")?;
            return Ok(Some(material));
        }

        Ok(None)
    }
}
