//! The curated check set

pub mod bad_usernames;
pub mod chmods;
pub mod login_attempts;
pub mod long_url;
pub mod non_login_time_slot;

use crate::registry::CheckConstructor;
use siteguard_core::Check;
use std::sync::Arc;

pub use bad_usernames::BadUsernamesCheck;
pub use chmods::ChmodsCheck;
pub use login_attempts::LoginAttemptsCheck;
pub use long_url::LongUrlCheck;
pub use non_login_time_slot::NonLoginTimeSlotCheck;

fn make_chmods() -> Arc<dyn Check> {
    Arc::new(ChmodsCheck::new())
}

fn make_login_attempts() -> Arc<dyn Check> {
    Arc::new(LoginAttemptsCheck::new())
}

fn make_long_url() -> Arc<dyn Check> {
    Arc::new(LongUrlCheck::new())
}

fn make_non_login_time_slot() -> Arc<dyn Check> {
    Arc::new(NonLoginTimeSlotCheck::new())
}

fn make_bad_usernames() -> Arc<dyn Check> {
    Arc::new(BadUsernamesCheck::new())
}

/// Registration table; order within a priority is display and run order
pub const BUILTIN: &[(&str, CheckConstructor)] = &[
    (chmods::NAME, make_chmods),
    (login_attempts::NAME, make_login_attempts),
    (long_url::NAME, make_long_url),
    (non_login_time_slot::NAME, make_non_login_time_slot),
    (bad_usernames::NAME, make_bad_usernames),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CheckRegistry;
    use siteguard_core::{MessageBucket, Priority};

    #[test]
    fn test_builtin_registry() {
        let registry = CheckRegistry::from_table(BUILTIN).unwrap();
        assert_eq!(registry.len(), 5);

        let all = registry.all();
        assert_eq!(all[&Priority::High], vec!["chmods", "login_attempts"]);
        assert_eq!(all[&Priority::Medium], vec!["long_url", "non_login_time_slot"]);
        assert_eq!(all[&Priority::Low], vec!["bad_usernames"]);
    }

    #[test]
    fn test_every_check_has_a_good_message() {
        let registry = CheckRegistry::from_table(BUILTIN).unwrap();
        for name in registry.names() {
            let check = registry.get(name).unwrap();
            assert!(
                !check.get_messages(Some(MessageBucket::Good), None).is_empty(),
                "{} has no good message",
                name
            );
            assert!(check.catalogue().contains(0));
        }
    }
}
