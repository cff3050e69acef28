//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Preference persistence (memory, JSON file)
//! - OS colour-scheme signal
//! - Error types

pub mod error;
pub mod platform;
pub mod scheme;
pub mod storage;
