//! Deployment configuration.
//!
//! Handles loading and validating `config.toml`. Stock defaults are
//! overridden by whatever keys the file sets; a missing file means "all
//! defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [assets]
//! root = "assets"   # Directory holding watermark-{blue,black,white}.png
//!
//! [output]
//! dir = "."         # Where stamped photos are written
//! ```
//!
//! Which file backs each watermark variant, the output quality, and the
//! overlay opacity are fixed and deliberately not configurable. Unknown
//! keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Where the watermark assets live.
    pub assets: AssetsConfig,
    /// Where artifacts are written.
    pub output: OutputConfig,
}

impl StampConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets.root must not be empty".into(),
            ));
        }
        if self.output.dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Asset root resolved against the directory the config was loaded from.
    pub fn asset_root(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.assets.root)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory containing the watermark files, relative to the config dir.
    pub root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default directory for stamped photos (the CLI flag wins).
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
        }
    }
}

/// Load config from `config.toml` in the given directory.
///
/// Returns stock defaults when the file is absent; rejects unknown keys
/// and invalid values.
pub fn load_config(dir: &Path) -> Result<StampConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(StampConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: StampConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photomark Configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Watermark assets
# ---------------------------------------------------------------------------
[assets]
# Directory holding watermark-blue.png, watermark-black.png and
# watermark-white.png. Relative paths resolve against this file's directory.
root = "assets"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory stamped photos are written to. `--output-dir` overrides it.
dir = "."
"##
}
