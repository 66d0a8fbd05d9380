//! Configuration module for Backoffice
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BackofficePaths;
pub use settings::Settings;
