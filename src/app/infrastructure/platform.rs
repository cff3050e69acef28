use std::cell::Cell;

use super::scheme::{ListenerSet, SchemeListener, SubscriptionId, SystemSchemeSource};
use crate::app::domain::ResolvedTheme;

/// Ask the OS whether it prefers a dark colour scheme.
///
/// Returns `None` when no probe produced an answer.
pub fn detect_system_dark_mode() -> Option<bool> {
    // Windows: Check registry for dark mode preference
    #[cfg(target_os = "windows")]
    {
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        if let Ok(hkcu) = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        {
            // AppsUseLightTheme: 0 = dark mode, 1 = light mode
            if let Ok(value) = hkcu.get_value::<u32, _>("AppsUseLightTheme") {
                return Some(value == 0);
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;

        // Newer GNOME exposes an explicit colour-scheme key
        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
        {
            if output.status.success() {
                let scheme = String::from_utf8_lossy(&output.stdout);
                if scheme.contains("prefer-dark") {
                    return Some(true);
                }
                if scheme.contains("prefer-light") {
                    return Some(false);
                }
            }
        }

        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "gtk-theme"])
            .output()
        {
            if output.status.success() {
                let theme = String::from_utf8_lossy(&output.stdout).to_lowercase();
                return Some(theme.contains("dark"));
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        use std::process::Command;

        // The key is absent in light mode, so a failed read still means "light".
        if let Ok(output) = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            let style = String::from_utf8_lossy(&output.stdout).to_lowercase();
            return Some(output.status.success() && style.contains("dark"));
        }
    }

    None
}

/// Scheme source backed by [`detect_system_dark_mode`].
///
/// The OS is probed on construction and on every [`refresh`](Self::refresh);
/// subscribers hear about changes only when the host calls `refresh`.
pub struct PlatformSchemeSource {
    probe: fn() -> Option<bool>,
    current: Cell<Option<bool>>,
    listeners: ListenerSet,
}

impl PlatformSchemeSource {
    pub fn new() -> Self {
        Self::with_probe(detect_system_dark_mode)
    }

    pub fn with_probe(probe: fn() -> Option<bool>) -> Self {
        Self {
            probe,
            current: Cell::new(probe()),
            listeners: ListenerSet::default(),
        }
    }

    /// Re-probe the OS. Returns true if subscribers were notified.
    pub fn refresh(&self) -> bool {
        let latest = (self.probe)();
        if latest == self.current.get() {
            return false;
        }
        self.current.set(latest);
        match latest {
            Some(prefers_dark) => {
                tracing::debug!(prefers_dark, "system colour scheme changed");
                self.listeners.notify(ResolvedTheme::from_prefers_dark(prefers_dark));
                true
            }
            None => false,
        }
    }
}

impl Default for PlatformSchemeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSchemeSource for PlatformSchemeSource {
    fn prefers_dark(&self) -> Option<bool> {
        self.current.get()
    }

    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        Some(self.listeners.add(listener))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}
