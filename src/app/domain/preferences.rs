use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app::infrastructure::error::PreferenceError;

/// The user's explicit theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// The concrete scheme actually applied to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "geist-sans")]
    GeistSans,
    #[serde(rename = "roboto")]
    Roboto,
    #[serde(rename = "telex")]
    Telex,
    #[serde(rename = "yantramanav")]
    Yantramanav,
    #[serde(rename = "exo-2")]
    Exo2,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn all() -> &'static [ThemeMode] {
        &[Self::Light, Self::Dark, Self::System]
    }

    /// Toggle order: light, dark, system, back to light. `System` is
    /// skipped when system following is off.
    pub fn next(&self, include_system: bool) -> ThemeMode {
        match self {
            Self::Light => Self::Dark,
            Self::Dark if include_system => Self::System,
            Self::Dark | Self::System => Self::Light,
        }
    }

    /// Resolve against the current OS scheme.
    pub fn resolve(&self, system_scheme: ResolvedTheme) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => system_scheme,
        }
    }
}

impl ResolvedTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// Browser chrome colour hint mirrored into the `theme-color` meta entry
    pub fn meta_color(&self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#0a0a0a",
        }
    }

    pub fn all() -> &'static [ResolvedTheme] {
        &[Self::Light, Self::Dark]
    }
}

impl FontFamily {
    /// Identifier used in storage and CSS class names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeistSans => "geist-sans",
            Self::Roboto => "roboto",
            Self::Telex => "telex",
            Self::Yantramanav => "yantramanav",
            Self::Exo2 => "exo-2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GeistSans => "Geist Sans",
            Self::Roboto => "Roboto",
            Self::Telex => "Telex",
            Self::Yantramanav => "Yantramanav",
            Self::Exo2 => "Exo 2",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::GeistSans => "Modern geometric sans-serif",
            Self::Roboto => "Neo-grotesque sans-serif",
            Self::Telex => "Distinctive retro typeface",
            Self::Yantramanav => "Devanagari and Latin typeface",
            Self::Exo2 => "Contemporary geometric sans",
        }
    }

    pub fn class_name(&self) -> String {
        format!("font-{}", self.as_str())
    }

    /// Value for the `--active-font-family` custom property
    pub fn css_variable(&self) -> String {
        format!("var(--font-{})", self.as_str())
    }

    /// Get all available fonts, in toggle order
    pub fn all() -> &'static [FontFamily] {
        &[
            Self::GeistSans,
            Self::Roboto,
            Self::Telex,
            Self::Yantramanav,
            Self::Exo2,
        ]
    }

    /// The font after this one, wrapping around at the end of the list
    pub fn next(&self) -> FontFamily {
        let all = Self::all();
        let index = all.iter().position(|f| f == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }
}

impl FromStr for ThemeMode {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| PreferenceError::InvalidValue {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

impl FromStr for FontFamily {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|font| font.as_str() == s)
            .ok_or_else(|| PreferenceError::InvalidValue {
                kind: "font",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the store knows about the current appearance.
///
/// `resolved_theme` is not a field: it is always derived from `mode`
/// and `system_scheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferenceState {
    pub mode: ThemeMode,
    pub font: FontFamily,
    pub system_scheme: ResolvedTheme,
    pub loaded: bool,
}

impl PreferenceState {
    pub fn new(mode: ThemeMode, font: FontFamily) -> Self {
        Self {
            mode,
            font,
            system_scheme: ResolvedTheme::Light,
            loaded: false,
        }
    }

    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.mode.resolve(self.system_scheme)
    }
}
