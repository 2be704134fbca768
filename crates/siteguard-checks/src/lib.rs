//! SiteGuard Checks - Check registry and the curated check set
//!
//! This crate provides:
//! - `CheckRegistry`: Index of all available checks, grouped by priority
//! - `BUILTIN`: Static table mapping check names to constructors
//! - The check implementations themselves

pub mod builtin;
pub mod registry;

pub use builtin::BUILTIN;
pub use registry::{CheckConstructor, CheckRegistry};

use siteguard_core::Result;

/// Registry holding every built-in check
pub fn builtin_registry() -> Result<CheckRegistry> {
    CheckRegistry::from_table(BUILTIN)
}
