use crate::constants::*;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration shared by the GUI and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Base URL of the signing backend, without a trailing slash
    pub backend_url: String,
    /// Directory holding the script font files
    pub font_dir: PathBuf,
    /// Where signed documents are saved
    pub download_dir: PathBuf,
    /// Pixels per PDF point when rendering pages
    pub display_scale: f32,
    /// Pixel density of rasterized signatures
    pub raster_scale: f32,
    /// Upper bound on waiting for fonts and images
    pub raster_timeout_ms: u64,
    pub thumbnail_width: u32,
    /// `log` level filter name (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            font_dir: PathBuf::from("fonts"),
            download_dir: PathBuf::from("."),
            display_scale: DISPLAY_SCALE,
            raster_scale: RASTER_SCALE,
            raster_timeout_ms: DEFAULT_RASTER_TIMEOUT_MS,
            thumbnail_width: THUMBNAIL_WIDTH_PX,
            log_level: "info".to_string(),
        }
    }
}

impl SignerConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SignError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            Ok(Self::default())
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SignError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(SignError::Config("Backend URL is empty".to_string()));
        }
        if !(self.display_scale > 0.0) {
            return Err(SignError::Config(format!(
                "Display scale must be positive, got {}",
                self.display_scale
            )));
        }
        if !(self.raster_scale > 0.0) {
            return Err(SignError::Config(format!(
                "Raster scale must be positive, got {}",
                self.raster_scale
            )));
        }
        if self.raster_timeout_ms == 0 {
            return Err(SignError::Config("Raster timeout must be non-zero".to_string()));
        }
        if self.thumbnail_width == 0 {
            return Err(SignError::Config("Thumbnail width must be non-zero".to_string()));
        }
        self.log_filter()?;
        Ok(())
    }

    pub fn raster_timeout(&self) -> Duration {
        Duration::from_millis(self.raster_timeout_ms)
    }

    pub fn log_filter(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| SignError::Config(format!("Unknown log level: {}", self.log_level)))
    }
}
