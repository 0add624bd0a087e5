//! Configuration module for warikan
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::WarikanPaths;
pub use settings::Settings;
