use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gallery::{SortKey, ViewMode, DEFAULT_PAGE_SIZE};
use crate::model::{is_valid_date_format, DEFAULT_DATE_FORMAT};
use crate::source::remote::DEFAULT_ENDPOINT;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "VITRINE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Generate placeholder records locally
    #[default]
    Synthetic,
    /// Fetch the record list from `endpoint`
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Number of records to synthesize
    #[serde(default = "default_count")]
    pub count: usize,

    /// Seed for reproducible synthesis
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_count() -> usize {
    100
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            count: default_count(),
            seed: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Layout shown at startup
    #[serde(default)]
    pub view: ViewMode,

    /// Sort key applied at startup
    #[serde(default)]
    pub sort: SortKey,

    /// chrono format string for upload dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            view: ViewMode::default(),
            sort: SortKey::default(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Auto,
    Sixel,
    Kitty,
    ITerm2,
    Halfblocks,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_enabled")]
    pub image_preview: bool,

    #[serde(default)]
    pub protocol: ImageProtocol,

    /// Longest edge, in pixels, thumbnails are scaled to before encoding
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

fn default_preview_enabled() -> bool {
    true
}

fn default_thumbnail_size() -> u32 {
    256
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            image_preview: default_preview_enabled(),
            protocol: ImageProtocol::default(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

impl PreviewConfig {
    /// Whether thumbnails should be fetched at all.
    pub fn thumbnails_enabled(&self) -> bool {
        self.image_preview && self.protocol != ImageProtocol::None
    }
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject values serde accepts but the gallery cannot use.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_date_format(&self.gallery.date_format) {
            bail!("gallery.date_format {:?} is not a valid date format", self.gallery.date_format);
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitrine")
    }

    fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir().join("config.toml"),
        }
    }
}
