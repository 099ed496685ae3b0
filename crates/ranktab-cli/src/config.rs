//! Optional TOML settings file.
//!
//! ```toml
//! [export]
//! archive_prefix = "llm-ranking"
//! compression_level = 9
//!
//! [display]
//! locale = "zh"
//! ```
//!
//! Every key is optional. Command line flags win over the file.

use std::fs;
use std::path::Path;

use ranktab_normalization::Locale;
use ranktab_output::DEFAULT_COMPRESSION_LEVEL;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ARCHIVE_PREFIX: &str = "llm-ranking";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name prefix of generated bundles.
    pub archive_prefix: String,
    /// Deflate level, 0 to 9.
    pub compression_level: i64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Language of estimation tooltips.
    pub locale: Locale,
}

impl Settings {
    /// Parse settings text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Settings = toml::from_str(text)?;
        settings.export.compression_level = settings.export.compression_level.clamp(0, 9);
        Ok(settings)
    }
}

/// Load settings from `path`, or defaults when no path is given.
///
/// An unreadable or invalid file is logged and replaced by defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };

    match fs::read_to_string(path) {
        Ok(content) => match Settings::from_toml(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Failed to parse settings file, using defaults");
                Settings::default()
            }
        },
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "Failed to read settings file, using defaults");
            Settings::default()
        }
    }
}
