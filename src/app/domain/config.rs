use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::preferences::{FontFamily, ThemeMode};
use crate::app::infrastructure::error::Result;

pub const THEME_STORAGE_KEY: &str = "theme-preference";
pub const FONT_STORAGE_KEY: &str = "font-preference";

/// How the resolved theme lands on the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThemeAttribute {
    /// `light` / `dark` in the class list
    Class,
    /// A named attribute, e.g. `data-theme="dark"`
    Named(String),
}

impl From<String> for ThemeAttribute {
    fn from(value: String) -> Self {
        if value == "class" {
            Self::Class
        } else {
            Self::Named(value)
        }
    }
}

impl From<ThemeAttribute> for String {
    fn from(value: ThemeAttribute) -> Self {
        match value {
            ThemeAttribute::Class => "class".to_string(),
            ThemeAttribute::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_theme")]
    pub default_theme: ThemeMode,

    #[serde(default = "default_font")]
    pub default_font: FontFamily,

    /// Follow the OS colour scheme when the mode is `system`
    #[serde(default = "default_enable_system")]
    pub enable_system: bool,

    #[serde(default = "default_theme_storage_key")]
    pub theme_storage_key: String,

    #[serde(default = "default_font_storage_key")]
    pub font_storage_key: String,

    #[serde(default = "default_attribute")]
    pub attribute: ThemeAttribute,
}

fn default_theme() -> ThemeMode {
    ThemeMode::System
}

fn default_font() -> FontFamily {
    FontFamily::GeistSans
}

fn default_enable_system() -> bool {
    true
}

fn default_theme_storage_key() -> String {
    THEME_STORAGE_KEY.to_string()
}

fn default_font_storage_key() -> String {
    FONT_STORAGE_KEY.to_string()
}

fn default_attribute() -> ThemeAttribute {
    ThemeAttribute::Class
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_theme: default_theme(),
            default_font: default_font(),
            enable_system: default_enable_system(),
            theme_storage_key: default_theme_storage_key(),
            font_storage_key: default_font_storage_key(),
            attribute: default_attribute(),
        }
    }
}

impl StoreConfig {
    /// The mode the store starts from. A `system` default with system
    /// following disabled falls back to light.
    pub fn initial_theme(&self) -> ThemeMode {
        if self.default_theme == ThemeMode::System && !self.enable_system {
            ThemeMode::Light
        } else {
            self.default_theme
        }
    }

    pub fn accepts(&self, mode: ThemeMode) -> bool {
        mode != ThemeMode::System || self.enable_system
    }

    /// Load config from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("cfo-theme");
        path.push("config.toml");
        path
    }
}
