//! SiteGuard Core - Foundation types, traits, and error handling
//!
//! This crate provides the core abstractions used throughout SiteGuard:
//! - `Check`: The trait that all security checks implement
//! - `ScanResult` / `FixResult`: Per-run outcome with ordered messages
//! - `MessageCatalogue`: Message templates keyed by numeric ID
//! - `Site`: The environment checks inspect and remediate
//! - `ScanStatus`, `FixStatus`, `Priority`, `Fixable`: Core enums

pub mod action;
pub mod check;
pub mod error;
pub mod message;
pub mod result;
pub mod score;
pub mod site;
pub mod status;

// Re-export commonly used types at crate root
pub use action::{FieldKind, FixAction, FixActionRequest, FormField};
pub use check::{Check, CheckContext, CheckMetadata};
pub use error::{Error, Result};
pub use message::{MessageArg, MessageBucket, MessageCatalogue, MessageId};
pub use result::{FixResult, Message, ScanResult};
pub use score::{Grade, GradeScale, ScanTimeRecord, StatusCounts, Trend};
pub use site::{MemorySite, Site};
pub use status::{FixStatus, Fixable, Priority, ScanStatus};
