//! Error types for SiteGuard

use crate::status::ScanStatus;
use thiserror::Error;

/// Result type alias using SiteGuard Error
pub type Result<T> = std::result::Result<T, Error>;

/// SiteGuard error types
#[derive(Error, Debug)]
pub enum Error {
    // === Registry Errors ===
    #[error("Check not found: {name}")]
    CheckNotFound { name: String },

    #[error("Duplicate check name: {name}")]
    DuplicateCheck { name: String },

    // === Check Errors ===
    #[error("Inconclusive: {0}")]
    Inconclusive(String),

    #[error("Check {name} cannot be fixed automatically")]
    NotAutomatable { name: String },

    #[error("No pending fix action for check: {name}")]
    NoPendingFixAction { name: String },

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    Database(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the calling request must stop on this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::CheckNotFound { .. }
                | Error::DuplicateCheck { .. }
                | Error::Configuration(_)
                | Error::Database(_)
        )
    }

    /// Scan status a check reports when this error interrupts its scan.
    ///
    /// Anything that prevents a conclusive reading of the environment is a
    /// warning; only a confirmed violation is `bad`, and errors never are.
    pub fn scan_status(&self) -> ScanStatus {
        match self {
            Error::NotAutomatable { .. } => ScanStatus::CantFix,
            _ => ScanStatus::Warning,
        }
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::CheckNotFound { .. } => "CHECK_NOT_FOUND",
            Error::DuplicateCheck { .. } => "DUPLICATE_CHECK",
            Error::Inconclusive(_) => "INCONCLUSIVE",
            Error::NotAutomatable { .. } => "NOT_AUTOMATABLE",
            Error::NoPendingFixAction { .. } => "NO_PENDING_FIX_ACTION",
            Error::InvalidInput { .. } => "INVALID_INPUT",
            Error::PermissionDenied(_) => "PERMISSION_DENIED",
            Error::Http(_) => "HTTP_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_are_fatal() {
        let err = Error::CheckNotFound {
            name: "nope".into(),
        };
        assert!(err.is_fatal());
        assert_eq!(err.code(), "CHECK_NOT_FOUND");
        assert!(!Error::Inconclusive("timeout".into()).is_fatal());
    }

    #[test]
    fn test_errors_map_to_warning() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.scan_status(), ScanStatus::Warning);
        assert_eq!(Error::Http("reset".into()).scan_status(), ScanStatus::Warning);
        assert_eq!(
            Error::PermissionDenied("/etc".into()).scan_status(),
            ScanStatus::Warning
        );
    }
}
