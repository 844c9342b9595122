//! Resizer configuration module.
//!
//! Handles loading, validating, merging, and publishing `imageresizer.toml`.
//! Stock defaults are the base layer; a user file in the config directory
//! overrides them key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! quality = 90                 # WebP encoding quality (0-100)
//! output_dir = "temp-images"   # Where the CLI writes variants
//! filter = "triangle"          # triangle | catmull-rom | gaussian | lanczos3
//! parallel = false             # Encode sizes concurrently
//! ```
//!
//! ## Publishing
//!
//! [`publish_config`] writes the documented stock file into a config
//! directory so it can be edited in place. An existing file is never
//! overwritten unless forced.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up inside a config directory.
pub const CONFIG_FILE_NAME: &str = "imageresizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// Resizer configuration loaded from `imageresizer.toml`.
///
/// Passed explicitly into [`derive`](crate::derive::derive); nothing reads
/// configuration from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// WebP encoding quality (0 = worst, 100 = best). GIF ignores it.
    pub quality: u32,
    /// Directory the CLI writes variants into.
    pub output_dir: PathBuf,
    /// Resampling filter for every non-original variant.
    pub filter: ResampleFilter,
    /// Resample and encode sizes concurrently on the rayon pool.
    pub parallel: bool,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            output_dir: PathBuf::from("temp-images"),
            filter: ResampleFilter::default(),
            parallel: false,
        }
    }
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `imageresizer.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `dir`, layered over the stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<ResizerConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Documented stock config file, every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# image-resizer configuration
#
# Every option is optional; delete what you do not change.

# WebP encoding quality, 0 (smallest) to 100 (best).
# GIF outputs ignore this and use the encoder defaults.
quality = 90

# Directory the CLI writes resized variants into. Created if missing.
output_dir = "temp-images"

# Resampling filter for resized variants:
#   triangle     bilinear, area-weighted when shrinking (default)
#   catmull-rom  bicubic, a little sharper
#   gaussian     soft
#   lanczos3     sharpest, slowest
filter = "triangle"

# Resample and encode all sizes of one image concurrently.
parallel = false
"#
}

/// Write the stock config file into `dir`, creating the directory.
///
/// Refuses to replace an existing file unless `force` is set. Returns the
/// path written.
pub fn publish_config(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let target = dir.join(CONFIG_FILE_NAME);
    if target.exists() && !force {
        return Err(ConfigError::AlreadyExists(target));
    }
    fs::create_dir_all(dir)?;
    fs::write(&target, stock_config_toml())?;
    Ok(target)
}
