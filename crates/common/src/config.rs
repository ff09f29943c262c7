//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CarelabError, CarelabResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where exported artifacts are written.
    pub output_dir: PathBuf,

    /// Optional JSON catalog replacing the built-in packages.
    pub catalog_path: Option<PathBuf>,

    /// Rasterisation settings.
    pub render: RenderDefaults,

    /// Video recorder settings.
    pub video: VideoDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default rasterisation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// TrueType/OpenType font used to draw slide text. When unset, a few
    /// well-known system locations are probed.
    pub font_path: Option<PathBuf>,

    /// Capture scale for document pages (quality-oriented).
    pub document_scale: f32,

    /// Capture scale for archived still images. Video frames are always
    /// captured at the native reel resolution.
    pub image_scale: f32,

    /// JPEG quality of document pages.
    pub document_jpeg_quality: u8,

    /// JPEG quality of archived still images.
    pub archive_jpeg_quality: u8,
}

/// Video recorder parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoDefaults {
    /// Frames sampled per second while a slide is held.
    pub fps: u32,

    /// Target video bitrate.
    pub bitrate_kbps: u32,

    /// Encoder tried first.
    pub preferred_codec: String,

    /// Encoder used when the preferred one is missing.
    pub fallback_codec: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "carelab=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            catalog_path: None,
            render: RenderDefaults::default(),
            video: VideoDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            font_path: None,
            document_scale: 2.0,
            image_scale: 1.0,
            document_jpeg_quality: 90,
            archive_jpeg_quality: 95,
        }
    }
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            bitrate_kbps: 10_000,
            preferred_codec: "libvpx-vp9".to_string(),
            fallback_codec: "libvpx".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> CarelabResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject values the export pipelines cannot work with.
    pub fn validate(&self) -> CarelabResult<()> {
        if self.render.document_scale <= 0.0 || self.render.image_scale <= 0.0 {
            return Err(CarelabError::config("capture scales must be positive"));
        }
        for quality in [
            self.render.document_jpeg_quality,
            self.render.archive_jpeg_quality,
        ] {
            if !(1..=100).contains(&quality) {
                return Err(CarelabError::config(format!(
                    "JPEG quality {quality} outside 1..=100"
                )));
            }
        }
        if self.video.fps == 0 {
            return Err(CarelabError::config("video fps must be at least 1"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("carelab").join("config.json")
}
