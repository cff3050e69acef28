//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (ThemeMode, FontFamily, StoreConfig)
//! - `controllers/` - Orchestration (PreferenceStore)
//! - `infrastructure/` - External integrations (storage, OS scheme, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenient external access
pub use controllers::store::{PreferenceStore, Preferences};
pub use domain::{
    FontFamily, PreferenceState, ResolvedTheme, StoreConfig, ThemeAttribute, ThemeMode,
};
pub use infrastructure::error::{PreferenceError, Result};
pub use infrastructure::platform::{PlatformSchemeSource, detect_system_dark_mode};
pub use infrastructure::scheme::{
    DetachedSchemeSource, ManualSchemeSource, SchemeListener, SubscriptionId, SystemSchemeSource,
};
pub use infrastructure::storage::{JsonFileStorage, MemoryStorage, PreferenceStorage};
