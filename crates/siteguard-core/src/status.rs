//! Statuses, priorities and fixability of checks

use serde::{Deserialize, Serialize};

/// Outcome of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// No scan result recorded yet
    #[default]
    NotScanned,
    /// No problem found
    Good,
    /// The check declares itself unable to conclude or fix
    #[serde(rename = "cantfix")]
    CantFix,
    /// Inconclusive, e.g. the environment could not be read
    Warning,
    /// Confirmed problem
    Bad,
}

impl ScanStatus {
    /// Rank used to decide whether a new status is worse than the current one
    pub fn rank(&self) -> u8 {
        match self {
            ScanStatus::NotScanned => 0,
            ScanStatus::Good => 1,
            ScanStatus::CantFix => 2,
            ScanStatus::Warning => 3,
            ScanStatus::Bad => 4,
        }
    }

    /// Position when listing checks of one priority: bad, warning, not scanned, good
    pub fn display_rank(&self) -> u8 {
        match self {
            ScanStatus::Bad => 0,
            ScanStatus::Warning | ScanStatus::CantFix => 1,
            ScanStatus::NotScanned => 2,
            ScanStatus::Good => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::NotScanned => "not_scanned",
            ScanStatus::Good => "good",
            ScanStatus::CantFix => "cantfix",
            ScanStatus::Warning => "warning",
            ScanStatus::Bad => "bad",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a fix attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    /// Remediation failed, or was not attempted yet
    #[default]
    NotFixed,
    /// Everything was remediated
    Fixed,
    /// Some but not all remediation succeeded
    PartiallyFixed,
    /// The check cannot be fixed automatically
    #[serde(rename = "cantfix")]
    CantFix,
}

impl FixStatus {
    pub fn rank(&self) -> u8 {
        match self {
            FixStatus::Fixed => 0,
            FixStatus::PartiallyFixed => 1,
            FixStatus::NotFixed => 2,
            FixStatus::CantFix => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FixStatus::NotFixed => "not_fixed",
            FixStatus::Fixed => "fixed",
            FixStatus::PartiallyFixed => "partially_fixed",
            FixStatus::CantFix => "cantfix",
        }
    }
}

impl std::fmt::Display for FixStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check priority. Declaration order is the run and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Heading shown above the checks of this priority
    pub fn title(&self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "Low Priority",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Priority::High => "These tests should be fixed now.",
            Priority::Medium => "These tests should be fixed when you can if no conflict is found.",
            Priority::Low => "These tests should be fixed to improve your security, but not mandatory.",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(crate::Error::InvalidInput {
                field: "priority".into(),
                message: format!("unknown priority '{}'", other),
            }),
        }
    }
}

/// Whether a check can be remediated automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fixable {
    No,
    Yes,
    /// Only with the professional tier active
    ProOnly,
}

impl Fixable {
    /// Whether a fix may run given the active tier
    pub fn allows(&self, pro: bool) -> bool {
        match self {
            Fixable::No => false,
            Fixable::Yes => true,
            Fixable::ProOnly => pro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_status_ranking() {
        assert!(ScanStatus::Bad.rank() > ScanStatus::Warning.rank());
        assert!(ScanStatus::Warning.rank() > ScanStatus::Good.rank());
        assert!(ScanStatus::Good.rank() > ScanStatus::NotScanned.rank());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_fixable_tiers() {
        assert!(!Fixable::No.allows(true));
        assert!(Fixable::Yes.allows(false));
        assert!(!Fixable::ProOnly.allows(false));
        assert!(Fixable::ProOnly.allows(true));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ScanStatus::NotScanned).unwrap();
        assert_eq!(json, "\"not_scanned\"");
        let fix: FixStatus = serde_json::from_str("\"partially_fixed\"").unwrap();
        assert_eq!(fix, FixStatus::PartiallyFixed);

        assert_eq!(serde_json::to_string(&ScanStatus::CantFix).unwrap(), "\"cantfix\"");
        assert_eq!(serde_json::to_string(&FixStatus::CantFix).unwrap(), "\"cantfix\"");
        let scan: ScanStatus = serde_json::from_str("\"cantfix\"").unwrap();
        assert_eq!(scan, ScanStatus::CantFix);
        for status in [ScanStatus::CantFix, ScanStatus::NotScanned, ScanStatus::Bad] {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status)
            );
        }
    }
}
