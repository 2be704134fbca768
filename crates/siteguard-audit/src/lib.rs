//! SiteGuard Audit - Scan and fix orchestration
//!
//! This crate ties the check registry to the result store:
//! - Run one check or all of them, by priority
//! - Fix a check, including two-step fixes that wait for user input
//! - Count statuses, compute the percent score and grade
//! - Keep a bounded scan history with trends
//!
//! # Example
//!
//! ```no_run
//! use siteguard_audit::Auditor;
//! use siteguard_checks::builtin_registry;
//! use siteguard_core::{CheckContext, MemorySite};
//! use siteguard_store::{Database, ResultStore};
//! use std::sync::Arc;
//!
//! let site = Arc::new(MemorySite::new("/var/www/html", "https://example.com"));
//! let store = ResultStore::new(Database::open("siteguard.db").unwrap());
//! let auditor = Auditor::new(builtin_registry().unwrap(), store, CheckContext::new(site));
//!
//! let report = auditor.run_all(None);
//! println!("Score: {}% ({})", report.score.percent, report.score.grade);
//! ```

pub mod auditor;
pub mod score;

pub use auditor::{AuditReport, Auditor, CheckReport, CheckState, FixReport};
pub use score::{HistoryEntry, Score};
pub use siteguard_core::GradeScale;
