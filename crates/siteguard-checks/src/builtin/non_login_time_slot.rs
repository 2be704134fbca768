//! Back-end closing hours check

use siteguard_core::{
    Check, CheckContext, CheckMetadata, FixResult, Fixable, MessageCatalogue, Priority, ScanResult,
};
use tracing::{info, warn};

pub const NAME: &str = "non_login_time_slot";

const MODULE: &str = "users-login";
const SUBMODULE: &str = "nonlogintimeslot";

const MESSAGES: &[(u16, &str)] = &[
    (0, "You are currently locking your back-end, sometimes."),
    (1, "Protection activated"),
    (100, "Unable to determine status of the Non Login Time Slot module: %s."),
    (200, "Your website should be locked out sometimes."),
    (201, "Our module Non Login Time Slot could fix this."),
    (202, "Unable to activate the Non Login Time Slot module: %s."),
];

pub struct NonLoginTimeSlotCheck {
    metadata: CheckMetadata,
    catalogue: MessageCatalogue,
}

impl NonLoginTimeSlotCheck {
    pub fn new() -> Self {
        Self {
            metadata: CheckMetadata::new(NAME, "WordPress", Priority::Medium)
                .with_title("Check if your back-end is accessible 24h/24.")
                .with_description(
                    "You don't necessarily need to let your back-end open like 24 hours a day, \
                     you should close it during your sleeping time.",
                )
                .with_fix_description(
                    "This will activate the option Non Login Time Slot from the module Users & Login.",
                )
                .fixable(Fixable::ProOnly),
            catalogue: MessageCatalogue::new(MESSAGES),
        }
    }
}

impl Default for NonLoginTimeSlotCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for NonLoginTimeSlotCheck {
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
            Ok(false) => {
                result.add_message(200, vec![]);
                result.add_pre_fix_message(201, vec![]);
            }
            Err(e) => result.add_message(100, vec![e.to_string().into()]),
        }

        result.maybe_set_status(0);
        result
    }

    fn fix(&self, ctx: &CheckContext) -> FixResult {
        if !ctx.pro {
            return FixResult::cantfix();
        }

        let mut result = FixResult::new();
        if let Err(e) = ctx.site.activate_submodule(MODULE, SUBMODULE) {
            warn!("Failed to activate {}/{}: {}", MODULE, SUBMODULE, e);
            result.add_message(202, vec![e.to_string().into()]);
            return result;
        }

        match ctx.site.is_submodule_active(MODULE, SUBMODULE) {
            Ok(true) => {
                info!("Non login time slot activated");
                result.add_message(1, vec![]);
            }
            Ok(false) => result.add_message(202, vec!["the setting did not persist".into()]),
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

    fn ctx(pro: bool) -> CheckContext {
        CheckContext::new(Arc::new(MemorySite::new("/srv/www", "http://localhost"))).with_pro(pro)
    }

    #[test]
    fn test_scan_bad_with_pre_fix_hint() {
        let check = NonLoginTimeSlotCheck::new();
        let result = check.scan(&ctx(false));
        assert_eq!(result.status, ScanStatus::Bad);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.pre_fix_messages[0].id, 201);
    }

    #[test]
    fn test_fix_requires_pro() {
        let check = NonLoginTimeSlotCheck::new();
        let free = ctx(false);
        assert_eq!(check.fix(&free).status, FixStatus::CantFix);
        assert_eq!(check.scan(&free).status, ScanStatus::Bad);

        let pro = ctx(true);
        assert_eq!(check.fix(&pro).status, FixStatus::Fixed);
        let after = check.scan(&pro);
        assert_eq!(after.status, ScanStatus::Good);
        assert!(after.pre_fix_messages.is_empty());
    }
}
