//! SiteGuard Common - Shared utilities: configuration and logging
//!
//! This crate provides the TOML configuration shared by SiteGuard binaries
//! and the tracing subscriber setup.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
