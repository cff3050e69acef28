//! Presentation surface: the document root the store writes to and the
//! toggle buttons that read from it.

pub mod root;
pub mod toggles;

pub use root::{DocumentRoot, RootAttributeSink};
pub use toggles::{FontToggle, ThemeToggle, ToggleView};
