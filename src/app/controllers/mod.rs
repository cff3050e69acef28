//! Controllers layer - orchestration and coordination.
//!
//! - Preference store: reconciles persisted choices, the OS scheme and
//!   the visual root

pub mod store;
