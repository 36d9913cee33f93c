//! Configuration file handling.
//!
//! Settings are read from `.wcloud.toml` (or an explicit path) and then
//! overridden by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::tokenizer::DEFAULT_MAX_WORDS;

pub const DEFAULT_CONFIG_FILE: &str = ".wcloud.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Aggregation and layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Maximum number of entries kept after ranking.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Multiplier on spiral growth and jitter.
    #[serde(default = "default_spread")]
    pub spread: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            spread: default_spread(),
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_MAX_WORDS
}

fn default_spread() -> f64 {
    1.0
}

/// Preview image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_side")]
    pub width: u32,

    #[serde(default = "default_side")]
    pub height: u32,

    /// Any CSS color.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: default_side(),
            height: default_side(),
            background: default_background(),
        }
    }
}

fn default_side() -> u32 {
    860
}

fn default_background() -> String {
    "#101014".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns `Ok(None)` when the default file doesn't exist.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}
