//! Configuration module for the expense reporter
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Reporting preferences

pub mod paths;
pub mod settings;

pub use paths::ReporterPaths;
pub use settings::Settings;
