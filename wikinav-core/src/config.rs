use crate::strategy::{CategoryStrategy, FullTextStrategy, PlainStrategy, RenderStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use wikinav_index::loader::DEFAULT_INDEX_PATH;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/wikinav/config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Which render strategy the search box uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchVariant {
    /// Article names only, as in the plain search box.
    Plain,
    /// Names and heading titles, grouped by category.
    #[default]
    Categorized,
    /// Names and descriptions of a full-text database.
    FullText,
}

impl SearchVariant {
    pub fn strategy(self) -> Box<dyn RenderStrategy> {
        match self {
            SearchVariant::Plain => Box::new(PlainStrategy),
            SearchVariant::Categorized => Box::new(CategoryStrategy),
            SearchVariant::FullText => Box::new(FullTextStrategy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchVariant::Plain => "plain",
            SearchVariant::Categorized => "categorized",
            SearchVariant::FullText => "fulltext",
        }
    }
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(SearchVariant::Plain),
            "categorized" | "titles" => Ok(SearchVariant::Categorized),
            "fulltext" | "full-text" => Ok(SearchVariant::FullText),
            other => Err(format!("unknown search variant: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index location relative to the site root.
    pub path: String,
    /// Timeout for fetching a remote index.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INDEX_PATH.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub variant: SearchVariant,
    pub min_query_len: usize,
    /// 0 = unlimited.
    pub max_suggestions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            variant: SearchVariant::default(),
            min_query_len: 1,
            max_suggestions: 0,
        }
    }
}

/// Element ids the generated pages use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    pub search_box_id: String,
    pub modal_id: String,
    pub modal_image_id: String,
    pub modal_caption_id: String,
    pub caption_suffix: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            search_box_id: "tags".to_string(),
            modal_id: "lightbox".to_string(),
            modal_image_id: "lightbox_image".to_string(),
            modal_caption_id: "lightbox_caption".to_string(),
            caption_suffix: crate::lightbox::CAPTION_SUFFIX.to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/wikinav/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikinavConfig {
    pub index: IndexConfig,
    pub search: SearchConfig,
    pub dom: DomConfig,
}

impl WikinavConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate(path)?;
        Ok(cfg)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        // A zero timeout fails every remote fetch before it starts.
        if self.index.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "index.timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Expand `~` in a user supplied path, or fall back to the default location.
pub fn config_path(custom: Option<&str>) -> PathBuf {
    let raw = custom.unwrap_or(DEFAULT_CONFIG_PATH);
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Load configuration from disk. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<WikinavConfig, ConfigError> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(WikinavConfig::default());
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    WikinavConfig::from_toml(&text, path)
}
