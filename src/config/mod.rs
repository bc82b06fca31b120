//! Configuration management.
//!
//! Read from `~/.config/headlines/config.toml` at startup. A commented default
//! file is written on first run. Missing keys fall back to defaults.

pub mod api;
pub mod colors;
pub mod keybindings;

pub use api::ApiConfig;
pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Category;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    /// Categories fetched by the "all categories" refresh, in order.
    pub categories: Vec<Category>,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            categories: Category::ALL.to_vec(),
            colors: ColorConfig::default(),
            keybindings: KeybindingConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load from `path`, creating the commented default there if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("headlines").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

const DEFAULT_CONFIG: &str = r##"# Headlines configuration
#
# Colors: named (Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
# DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
# LightCyan, White, Reset) or hex ("#RRGGBB", "#RGB").
#
# Keys: single characters ("f", "/"), named keys (Enter, Tab, BackTab, Esc,
# Space, PageUp, PageDown, Up, Down, F1-F12, ...) and modifiers ("Ctrl+c").

# Categories fetched by a refresh while "All" is selected.
categories = ["business", "entertainment", "general", "health", "science", "sports", "technology"]

[api]
base_url = "https://newsapi.org/v2/"
# Get a key at https://newsapi.org. The NEWS_API_KEY environment variable
# takes precedence over this value.
# api_key = ""
country = "us"
default_query = "us"
timeout_secs = 10

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
favorite_marker = "LightRed"
category_tag = "Magenta"
source = "Yellow"
date = "Yellow"
link = "Blue"
error = "Red"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]
select = ["Enter"]
back = ["Esc"]
toggle_favorite = ["f", "Space"]
open_in_browser = ["o"]
refresh = ["R"]
search = ["/"]
show_favorites = ["F"]
toggle_maximize = ["m"]
"##;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("default config is valid TOML");
        let defaults = Config::default();

        assert_eq!(config.categories, defaults.categories);
        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.api.api_key, None);
        assert_eq!(config.colors.favorite_marker, defaults.colors.favorite_marker);
        assert_eq!(config.keybindings.search, vec!["/"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.categories.len(), 7);
        assert_eq!(config.api.country, "us");
    }

    #[test]
    fn test_category_subset() {
        let config: Config = toml::from_str(r#"categories = ["science"]"#).unwrap();
        assert_eq!(config.categories, vec![Category::Science]);
    }

    #[test]
    fn test_unknown_category_is_parse_error() {
        assert!(toml::from_str::<Config>(r#"categories = ["weather"]"#).is_err());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.timeout_secs, 10);

        // Second load parses the file that was just written.
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.categories, config.categories);
    }

    #[test]
    fn test_load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "categories = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
