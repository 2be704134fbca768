//! Login attempts limitation check

use siteguard_core::{
    Check, CheckContext, CheckMetadata, FixResult, Fixable, MessageCatalogue, Priority, ScanResult,
};
use tracing::warn;

pub const NAME: &str = "login_attempts";

const MODULE: &str = "users-login";
const SUBMODULE: &str = "limitloginattempts";

const MESSAGES: &[(u16, &str)] = &[
    (0, "You are currently limiting the number of login attempts."),
    (1, "Protection activated."),
    (100, "Unable to determine status of the login attempts limitation: %s."),
    (200, "Your website should limit the number of failed login attempts."),
    (201, "Unable to activate the login attempts limitation: %s."),
];

pub struct LoginAttemptsCheck {
    metadata: CheckMetadata,
    catalogue: MessageCatalogue,
}

impl LoginAttemptsCheck {
    pub fn new() -> Self {
        Self {
            metadata: CheckMetadata::new(NAME, "Users & Login", Priority::High)
                .with_title("Check if your login page is protected against brute force attacks.")
                .with_description(
                    "Limiting the number of failed login attempts stops bots from guessing \
                     passwords one request after another.",
                )
                .with_fix_description(
                    "This will activate the option Limit Login Attempts from the module Users & Login.",
                )
                .fixable(Fixable::Yes),
            catalogue: MessageCatalogue::new(MESSAGES),
        }
    }
}

impl Default for LoginAttemptsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LoginAttemptsCheck {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn catalogue(&self) -> &MessageCatalogue {
        &self.catalogue
    }

    fn scan(&self, ctx: &CheckContext) -> ScanResult {
        let mut result = ScanResult::new();

        match ctx.site.is_submodule_active(MODULE, SUBMODULE) {
            Ok(true) => {}
            Ok(false) => result.add_message(200, vec![]),
            Err(e) => result.add_message(100, vec![e.to_string().into()]),
        }

        result.maybe_set_status(0);
        result
    }

    fn fix(&self, ctx: &CheckContext) -> FixResult {
        let mut result = FixResult::new();

        if let Err(e) = ctx.site.activate_submodule(MODULE, SUBMODULE) {
            warn!("Failed to activate {}/{}: {}", MODULE, SUBMODULE, e);
            result.add_message(201, vec![e.to_string().into()]);
            return result;
        }

        match ctx.site.is_submodule_active(MODULE, SUBMODULE) {
            Ok(true) => result.add_message(1, vec![]),
            Ok(false) => result.add_message(201, vec!["the setting did not persist".into()]),
            Err(e) => result.add_message(100, vec![e.to_string().into()]),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteguard_core::{FixStatus, MemorySite, ScanStatus};
    use std::sync::Arc;

    #[test]
    fn test_scan_and_fix() {
        let ctx = CheckContext::new(Arc::new(MemorySite::new("/srv/www", "http://localhost")));
        let check = LoginAttemptsCheck::new();

        assert_eq!(check.scan(&ctx).status, ScanStatus::Bad);

        let fix = check.fix(&ctx);
        assert_eq!(fix.status, FixStatus::Fixed);
        assert_eq!(fix.render(check.catalogue()), vec!["Protection activated."]);

        assert_eq!(check.scan(&ctx).status, ScanStatus::Good);
    }

    #[test]
    fn test_scan_good_when_active() {
        let site = MemorySite::new("/srv/www", "http://localhost")
            .with_submodule("users-login", "limitloginattempts");
        let ctx = CheckContext::new(Arc::new(site));
        let result = LoginAttemptsCheck::new().scan(&ctx);
        assert_eq!(result.status, ScanStatus::Good);
        assert_eq!(result.messages[0].id, 0);
    }
}
