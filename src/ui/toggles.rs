//! Theme and font toggle buttons, as view models over [`Preferences`].

use crate::app::controllers::store::Preferences;
use crate::app::domain::{FontFamily, ThemeMode};

/// What a toggle button should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleView {
    /// Preferences are still loading; render a pulsing placeholder
    Placeholder,
    Button {
        text: String,
        title: String,
        aria_label: String,
        /// Extra class for the button itself (the font toggle previews its font)
        class_name: Option<String>,
    },
}

pub struct ThemeToggle;

impl ThemeToggle {
    pub fn icon(mode: ThemeMode) -> &'static str {
        match mode {
            ThemeMode::Light => "\u{2600}\u{fe0f}",
            ThemeMode::Dark => "\u{1f319}",
            ThemeMode::System => "\u{1f5a5}\u{fe0f}",
        }
    }

    /// `Light`, `Dark`, or `System (dark)` with the resolved scheme
    pub fn label(prefs: &dyn Preferences) -> String {
        match prefs.mode() {
            ThemeMode::Light => "Light".to_string(),
            ThemeMode::Dark => "Dark".to_string(),
            ThemeMode::System => format!("System ({})", prefs.resolved_theme()),
        }
    }

    pub fn view(prefs: &dyn Preferences) -> ToggleView {
        if !prefs.is_loaded() {
            return ToggleView::Placeholder;
        }
        let label = Self::label(prefs);
        ToggleView::Button {
            text: Self::icon(prefs.mode()).to_string(),
            title: format!("Current theme: {label}. Click to cycle through themes."),
            aria_label: format!("Switch theme (current: {label})"),
            class_name: None,
        }
    }

    pub fn click(prefs: &dyn Preferences) -> ThemeMode {
        let next = prefs.mode().next(prefs.system_enabled());
        prefs.set_theme(next);
        next
    }
}

pub struct FontToggle;

impl FontToggle {
    pub fn current(prefs: &dyn Preferences) -> FontFamily {
        prefs.font()
    }

    pub fn next(prefs: &dyn Preferences) -> FontFamily {
        prefs.font().next()
    }

    pub fn view(prefs: &dyn Preferences) -> ToggleView {
        if !prefs.is_loaded() {
            return ToggleView::Placeholder;
        }
        let font = prefs.font();
        ToggleView::Button {
            text: font.display_name().to_string(),
            title: format!(
                "Current font: {} - {}. Click to cycle fonts.",
                font.display_name(),
                font.description()
            ),
            aria_label: format!("Switch font (current: {})", font.display_name()),
            class_name: Some(font.class_name()),
        }
    }

    pub fn click(prefs: &dyn Preferences) -> FontFamily {
        let next = Self::next(prefs);
        prefs.set_font_family(next);
        next
    }
}
