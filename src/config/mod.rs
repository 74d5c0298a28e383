//! Configuration module for WealthFlow
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence (login directory, store options)

pub mod paths;
pub mod settings;

pub use paths::WealthflowPaths;
pub use settings::{Settings, StoreSettings};
