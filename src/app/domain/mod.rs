//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Theme mode, resolved theme and font family
//! - The aggregate preference state
//! - Store configuration

pub mod config;
pub mod preferences;

pub use config::{FONT_STORAGE_KEY, StoreConfig, THEME_STORAGE_KEY, ThemeAttribute};
pub use preferences::{FontFamily, PreferenceState, ResolvedTheme, ThemeMode};
