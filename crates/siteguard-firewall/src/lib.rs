//! SiteGuard Firewall - Early request blocking against curated deny lists
//!
//! This crate provides:
//! - The curated deny lists (user agents, URL, host and referer contents)
//!   and their replace/append overrides
//! - `DenyPattern`: a list compiled into one case-insensitive alternation
//! - `Firewall::evaluate`: first-match-wins evaluation of a `Request`

pub mod firewall;
pub mod lists;
pub mod matcher;
pub mod request;

pub use firewall::{Firewall, DEFAULT_ALLOWED_METHODS};
pub use lists::{DenyCategory, DenyLists, ListOverride};
pub use matcher::{matches, DenyPattern};
pub use request::{BlockId, Decision, Request};

/// Firewall construction errors
#[derive(Debug, thiserror::Error)]
pub enum FirewallError {
    #[error("Invalid deny pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, FirewallError>;
