//! Check trait and metadata - the interface all security checks implement

use crate::action::FixAction;
use crate::message::{MessageBucket, MessageCatalogue, MessageId};
use crate::result::{FixResult, ScanResult};
use crate::site::Site;
use crate::status::{Fixable, Priority};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The trait that all security checks must implement.
///
/// `scan()` only reads the environment and must be idempotent. Neither
/// `scan()` nor `fix()` may fail: internal errors are reported as warning
/// (scan) or not-fixed (fix) messages.
pub trait Check: Send + Sync {
    /// Static description of this check
    fn metadata(&self) -> &CheckMetadata;

    /// Message templates referenced by this check's results
    fn catalogue(&self) -> &MessageCatalogue;

    /// Inspect the environment
    fn scan(&self, ctx: &CheckContext) -> ScanResult;

    /// Try to bring the environment to the state `scan()` reports as good.
    ///
    /// Implementations re-verify after mutating instead of assuming success.
    fn fix(&self, _ctx: &CheckContext) -> FixResult {
        FixResult::cantfix()
    }

    /// Complete a delayed fix with the fields the user submitted
    fn manual_fix(
        &self,
        _ctx: &CheckContext,
        _action: &FixAction,
        _submitted: &HashMap<String, String>,
    ) -> FixResult {
        FixResult::cantfix()
    }

    /// Unique, stable name
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Full catalogue, one status bucket, or one message
    fn get_messages(
        &self,
        bucket: Option<MessageBucket>,
        id: Option<MessageId>,
    ) -> Vec<(MessageId, &'static str)> {
        self.catalogue().select(bucket, id)
    }
}

/// Metadata describing a check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMetadata {
    /// Unique identifier
    pub name: String,

    /// One-line title
    pub title: String,

    /// What the scan looks at
    pub description: String,

    /// What the fix changes
    #[serde(default)]
    pub fix_description: String,

    /// Category label, e.g. "File System"
    pub check_type: String,

    pub priority: Priority,

    pub fixable: Fixable,

    /// The fix needs a follow-up call carrying user input
    #[serde(default)]
    pub delayed_fix: bool,

    pub version: String,
}

impl CheckMetadata {
    /// Create new check metadata
    pub fn new(name: impl Into<String>, check_type: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            description: String::new(),
            fix_description: String::new(),
            check_type: check_type.into(),
            priority,
            fixable: Fixable::No,
            delayed_fix: false,
            version: String::from("1.0"),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_fix_description(mut self, desc: impl Into<String>) -> Self {
        self.fix_description = desc.into();
        self
    }

    pub fn fixable(mut self, fixable: Fixable) -> Self {
        self.fixable = fixable;
        self
    }

    pub fn delayed_fix(mut self) -> Self {
        self.delayed_fix = true;
        self
    }
}

/// Context passed to checks during execution
#[derive(Clone)]
pub struct CheckContext {
    /// The site being audited
    pub site: Arc<dyn Site>,

    /// Whether the professional tier is active
    pub pro: bool,

    /// Timeout for network probes
    pub timeout: Duration,

    /// Replacement for the built-in forbidden login list
    pub forbidden_logins: Option<Vec<String>>,
}

impl std::fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckContext")
            .field("site", &self.site.root())
            .field("pro", &self.pro)
            .field("timeout", &self.timeout)
            .field("forbidden_logins", &self.forbidden_logins)
            .finish()
    }
}

impl CheckContext {
    /// Create a new check context for a site
    pub fn new(site: Arc<dyn Site>) -> Self {
        Self {
            site,
            pro: false,
            timeout: Duration::from_secs(10),
            forbidden_logins: None,
        }
    }

    pub fn with_pro(mut self, pro: bool) -> Self {
        self.pro = pro;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_forbidden_logins(mut self, logins: Vec<String>) -> Self {
        self.forbidden_logins = Some(logins);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::MemorySite;
    use crate::status::ScanStatus;

    struct TestCheck {
        metadata: CheckMetadata,
        catalogue: MessageCatalogue,
    }

    impl TestCheck {
        fn new() -> Self {
            Self {
                metadata: CheckMetadata::new("test_check", "Test", Priority::High),
                catalogue: MessageCatalogue::new(&[(0, "Fine."), (200, "Apache is %s.")]),
            }
        }
    }

    impl Check for TestCheck {
        fn metadata(&self) -> &CheckMetadata {
            &self.metadata
        }

        fn catalogue(&self) -> &MessageCatalogue {
            &self.catalogue
        }

        fn scan(&self, ctx: &CheckContext) -> ScanResult {
            let mut result = ScanResult::new();
            if ctx.site.is_apache() {
                result.add_message(200, vec!["on".into()]);
            }
            result.maybe_set_status(0);
            result
        }
    }

    #[test]
    fn test_check_execution() {
        let check = TestCheck::new();
        let site = Arc::new(MemorySite::new("/tmp", "http://localhost").with_apache(true));
        let ctx = CheckContext::new(site);

        let result = check.scan(&ctx);
        assert_eq!(result.status, ScanStatus::Bad);
        assert_eq!(result.render(check.catalogue()), vec!["Apache is on."]);
    }

    #[test]
    fn test_default_fix_is_cantfix() {
        let check = TestCheck::new();
        let ctx = CheckContext::new(Arc::new(MemorySite::new("/tmp", "http://localhost")));
        assert_eq!(check.fix(&ctx).status, crate::status::FixStatus::CantFix);
        assert_eq!(check.name(), "test_check");
        assert_eq!(check.get_messages(Some(MessageBucket::Bad), None).len(), 1);
    }
}
