//! Check registry - index of all available checks

use siteguard_core::{Check, CheckMetadata, Error, Priority, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Constructor of a built-in check
pub type CheckConstructor = fn() -> Arc<dyn Check>;

/// Registry of all available checks
pub struct CheckRegistry {
    /// Checks indexed by name
    checks: HashMap<String, Arc<dyn Check>>,
    /// Names in registration order
    order: Vec<String>,
}

impl CheckRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry holding every check of a static registration table
    pub fn from_table(table: &[(&str, CheckConstructor)]) -> Result<Self> {
        let mut registry = Self::new();
        for (key, constructor) in table {
            let check = constructor();
            if check.name() != *key {
                return Err(Error::Configuration(format!(
                    "Check registered as '{}' reports name '{}'",
                    key,
                    check.name()
                )));
            }
            registry.register(check)?;
        }
        Ok(registry)
    }

    /// Register a check; names are unique
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<()> {
        let name = check.name().to_string();
        if self.checks.contains_key(&name) {
            return Err(Error::DuplicateCheck { name });
        }
        debug!("Registered check {}", name);
        self.order.push(name.clone());
        self.checks.insert(name, check);
        Ok(())
    }

    /// Get a check by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Check>> {
        self.checks
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CheckNotFound {
                name: name.to_string(),
            })
    }

    /// Get check metadata by name
    pub fn get_metadata(&self, name: &str) -> Option<&CheckMetadata> {
        self.checks.get(name).map(|c| c.metadata())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// All check names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Check names grouped by priority (high, medium, low), each group in
    /// registration order. Every priority has an entry, possibly empty.
    pub fn all(&self) -> BTreeMap<Priority, Vec<String>> {
        let mut grouped: BTreeMap<Priority, Vec<String>> =
            Priority::ALL.iter().map(|p| (*p, Vec::new())).collect();
        for name in &self.order {
            if let Some(check) = self.checks.get(name) {
                grouped
                    .entry(check.metadata().priority)
                    .or_default()
                    .push(name.clone());
            }
        }
        grouped
    }

    /// Checks of one priority, in registration order
    pub fn by_priority(&self, priority: Priority) -> Vec<Arc<dyn Check>> {
        self.order
            .iter()
            .filter_map(|name| self.checks.get(name))
            .filter(|c| c.metadata().priority == priority)
            .cloned()
            .collect()
    }

    /// Checks in run order: by priority, then registration order
    pub fn in_run_order(&self) -> Vec<Arc<dyn Check>> {
        Priority::ALL
            .iter()
            .flat_map(|p| self.by_priority(*p))
            .collect()
    }

    /// Get number of registered checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteguard_core::{CheckContext, MessageCatalogue, ScanResult};

    struct TestCheck {
        metadata: CheckMetadata,
        catalogue: MessageCatalogue,
    }

    impl TestCheck {
        fn arc(name: &str, priority: Priority) -> Arc<dyn Check> {
            Arc::new(Self {
                metadata: CheckMetadata::new(name, "Test", priority),
                catalogue: MessageCatalogue::new(&[(0, "Fine.")]),
            })
        }
    }

    impl Check for TestCheck {
        fn metadata(&self) -> &CheckMetadata {
            &self.metadata
        }

        fn catalogue(&self) -> &MessageCatalogue {
            &self.catalogue
        }

        fn scan(&self, _ctx: &CheckContext) -> ScanResult {
            let mut result = ScanResult::new();
            result.maybe_set_status(0);
            result
        }
    }

    #[test]
    fn test_registry() {
        let mut registry = CheckRegistry::new();
        registry.register(TestCheck::arc("test_one", Priority::High)).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("test_one").is_ok());
        assert!(matches!(
            registry.get("invalid"),
            Err(Error::CheckNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = CheckRegistry::new();
        registry.register(TestCheck::arc("dup", Priority::Low)).unwrap();
        let err = registry.register(TestCheck::arc("dup", Priority::High)).unwrap_err();
        assert!(matches!(err, Error::DuplicateCheck { name } if name == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_all_groups_by_priority_in_registration_order() {
        let mut registry = CheckRegistry::new();
        registry.register(TestCheck::arc("low_a", Priority::Low)).unwrap();
        registry.register(TestCheck::arc("high_b", Priority::High)).unwrap();
        registry.register(TestCheck::arc("high_a", Priority::High)).unwrap();

        let all = registry.all();
        let keys: Vec<Priority> = all.keys().copied().collect();
        assert_eq!(keys, vec![Priority::High, Priority::Medium, Priority::Low]);
        assert_eq!(all[&Priority::High], vec!["high_b", "high_a"]);
        assert!(all[&Priority::Medium].is_empty());

        let run: Vec<String> = registry
            .in_run_order()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(run, vec!["high_b", "high_a", "low_a"]);
    }

    #[test]
    fn test_from_table_rejects_mismatched_key() {
        fn make() -> Arc<dyn Check> {
            TestCheck::arc("real_name", Priority::High)
        }
        let table: &[(&str, CheckConstructor)] = &[("other_name", make)];
        assert!(matches!(
            CheckRegistry::from_table(table),
            Err(Error::Configuration(_))
        ));
    }
}
