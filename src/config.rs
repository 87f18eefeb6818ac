//! Tool configuration module.
//!
//! Handles loading and validating `snap.toml`. There is exactly one config
//! file per invocation: the path given with `--config`, else `snap.toml`
//! in the working directory, else stock defaults. Files are sparse — set
//! only the values you want to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! # pictures_dir = "/home/me/Pictures/simple-snap"  # default: platform pictures dir
//!
//! [capture]
//! # command = "libcamera-still --nopreview -o {path}"
//!
//! [preview]
//! max_width = 1280          # Viewport the preview decode is bounded by
//! max_height = 800
//!
//! [save]
//! jpeg_quality = 90         # JPEG quality for saved photos (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{JpegQuality, Viewport};
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

/// Tool configuration loaded from `snap.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapConfig {
    /// Where captured photos are stored.
    pub storage: StorageConfig,
    /// How photo bytes are produced.
    pub capture: CaptureConfig,
    /// Preview decode bounds.
    pub preview: PreviewConfig,
    /// Save encoding settings.
    pub save: SaveConfig,
}

impl SnapConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save.jpeg_quality == 0 || self.save.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "save.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.preview.max_width == 0 || self.preview.max_height == 0 {
            return Err(ConfigError::Validation(
                "preview.max_width and max_height must be non-zero".into(),
            ));
        }
        if let Some(command) = &self.capture.command
            && command.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "capture.command must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Photo storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory captured photos land in. When absent, the platform
    /// pictures folder (under a `simple-snap` subdirectory) is used, with
    /// `./pictures` as the last resort on systems without one.
    pub pictures_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the pictures directory according to the rules above.
    pub fn effective_pictures_dir(&self) -> PathBuf {
        if let Some(dir) = &self.pictures_dir {
            return dir.clone();
        }
        dirs::picture_dir()
            .map(|dir| dir.join("simple-snap"))
            .unwrap_or_else(|| PathBuf::from("pictures"))
    }
}

/// Capture collaborator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// External command that writes a JPEG to the destination path;
    /// `{path}` is substituted. Required for camera capture — the import
    /// flow (`--from`) works without it.
    pub command: Option<String>,
}

/// Preview decode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Viewport width the preview decode is bounded by.
    pub max_width: u32,
    /// Viewport height the preview decode is bounded by.
    pub max_height: u32,
}

impl PreviewConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.max_width, self.max_height)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 800,
        }
    }
}

/// Save encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveConfig {
    /// JPEG quality for saved photos (1 = worst, 100 = best).
    pub jpeg_quality: u8,
}

impl SaveConfig {
    pub fn quality(&self) -> JpegQuality {
        JpegQuality::new(self.jpeg_quality)
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<SnapConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SnapConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective config for this invocation.
///
/// An explicit `--config` path must exist and parse; without one,
/// `snap.toml` in the working directory is used when present, else stock
/// defaults.
pub fn resolve(explicit: Option<&Path>) -> Result<SnapConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let local = Path::new("snap.toml");
    if local.exists() {
        return load_config(local);
    }
    Ok(SnapConfig::default())
}

/// Returns a fully-commented stock `snap.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# Simple Snap Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is looked up as ./snap.toml, or passed with --config PATH.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Directory captured photos land in. Omit to use the platform pictures
# folder (under a simple-snap subdirectory); ./pictures as the last resort.
# pictures_dir = "/home/me/Pictures/simple-snap"

# ---------------------------------------------------------------------------
# Capture
# ---------------------------------------------------------------------------
[capture]
# External command that produces the photo. It is split on whitespace and
# every {path} is replaced with the destination; the command must exit
# zero and leave a JPEG at that path. Not needed for `--from FILE`.
# command = "libcamera-still --nopreview -o {path}"

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Viewport the preview decode is bounded by. Sources larger than this are
# downsampled by an integer factor; smaller ones decode at full size.
max_width = 1280
max_height = 800

# ---------------------------------------------------------------------------
# Save
# ---------------------------------------------------------------------------
[save]
# JPEG quality for saved photos (1 = worst, 100 = best).
jpeg_quality = 90
"#
}
