//! SiteGuard Store - Durable state for the audit engine
//!
//! This crate provides:
//! - SQLite-backed option table with at-most-once `take`
//! - Latest scan and fix result per check
//! - Bounded scan-time history
//! - Pending fix-action hand-off
//! - A `Site` whose settings and users persist in the same database

pub mod database;
pub mod results;
pub mod site;

pub use database::Database;
pub use results::{ResultStore, DEFAULT_HISTORY_LIMIT};
pub use site::StoreSite;
