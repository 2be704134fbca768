//! Durable per-check results, scan history and pending fix actions

use crate::database::Database;
use siteguard_core::{FixAction, FixResult, Result, ScanResult, ScanTimeRecord, StatusCounts};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const SCAN_PREFIX: &str = "scan_";
const FIX_PREFIX: &str = "fix_";
const FIX_ACTION_PREFIX: &str = "fix_action_";
const SCAN_TIMES_KEY: &str = "scan_times";

/// Default number of scan-time records kept
pub const DEFAULT_HISTORY_LIMIT: usize = 15;

/// Latest scan and fix result of each check
#[derive(Clone)]
pub struct ResultStore {
    db: Database,
    history_limit: usize,
}

impl ResultStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Overwrite the stored scan result of a check
    pub fn save_scan(&self, check: &str, result: &ScanResult) -> Result<()> {
        debug!(check, status = %result.status, "Saving scan result");
        self.db.set(&scan_key(check), result)
    }

    /// Overwrite the stored fix result of a check
    pub fn save_fix(&self, check: &str, result: &FixResult) -> Result<()> {
        debug!(check, status = %result.status, "Saving fix result");
        self.db.set(&fix_key(check), result)
    }

    pub fn load_scan(&self, check: &str) -> Result<Option<ScanResult>> {
        self.db.get(&scan_key(check))
    }

    pub fn load_fix(&self, check: &str) -> Result<Option<FixResult>> {
        self.db.get(&fix_key(check))
    }

    /// All stored scan results, keyed by check name
    pub fn load_scans(&self) -> Result<BTreeMap<String, ScanResult>> {
        let rows: Vec<(String, serde_json::Value)> = self.db.scan_prefix(SCAN_PREFIX)?;
        let mut scans = BTreeMap::new();
        for (key, value) in rows {
            if key == SCAN_TIMES_KEY {
                continue;
            }
            if let Some(name) = key.strip_prefix(SCAN_PREFIX) {
                scans.insert(name.to_string(), serde_json::from_value(value)?);
            }
        }
        Ok(scans)
    }

    /// All stored fix results, keyed by check name
    pub fn load_fixes(&self) -> Result<BTreeMap<String, FixResult>> {
        let rows: Vec<(String, serde_json::Value)> = self.db.scan_prefix(FIX_PREFIX)?;
        let mut fixes = BTreeMap::new();
        for (key, value) in rows {
            if key.starts_with(FIX_ACTION_PREFIX) {
                continue;
            }
            if let Some(name) = key.strip_prefix(FIX_PREFIX) {
                fixes.insert(name.to_string(), serde_json::from_value(value)?);
            }
        }
        Ok(fixes)
    }

    /// Forget both results of a check
    pub fn clear(&self, check: &str) -> Result<()> {
        self.db.delete(&scan_key(check))?;
        self.db.delete(&fix_key(check))?;
        Ok(())
    }

    /// Tally scan statuses of the given checks in one read.
    ///
    /// Checks without a stored result count as not scanned.
    pub fn counts<'a>(&self, checks: impl IntoIterator<Item = &'a str>) -> Result<StatusCounts> {
        let scans = self.load_scans()?;
        Ok(checks
            .into_iter()
            .map(|name| {
                scans
                    .get(name)
                    .map(|result| result.status)
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Append a scan-time record, dropping the oldest beyond the limit
    pub fn push_scan_time(&self, record: ScanTimeRecord) -> Result<Vec<ScanTimeRecord>> {
        let limit = self.history_limit;
        self.db.update(SCAN_TIMES_KEY, |history: &mut Vec<ScanTimeRecord>| {
            history.push(record);
            if history.len() > limit {
                let excess = history.len() - limit;
                history.drain(..excess);
            }
        })
    }

    /// Scan-time records, oldest first
    pub fn scan_times(&self) -> Result<Vec<ScanTimeRecord>> {
        Ok(self.db.get(SCAN_TIMES_KEY)?.unwrap_or_default())
    }

    /// Record a pending fix action, replacing any earlier one for the same check
    pub fn put_fix_action(&self, action: &FixAction) -> Result<()> {
        if self.peek_fix_action(&action.check_name)?.is_some() {
            warn!(check = %action.check_name, "Replacing unconsumed fix action");
        }
        self.db.set(&fix_action_key(&action.check_name), action)
    }

    /// Pending fix action, without consuming it
    pub fn peek_fix_action(&self, check: &str) -> Result<Option<FixAction>> {
        self.db.get(&fix_action_key(check))
    }

    /// Consume the pending fix action of a check
    pub fn take_fix_action(&self, check: &str) -> Result<Option<FixAction>> {
        self.db.take(&fix_action_key(check))
    }
}

fn scan_key(check: &str) -> String {
    format!("{}{}", SCAN_PREFIX, check)
}

fn fix_key(check: &str) -> String {
    format!("{}{}", FIX_PREFIX, check)
}

fn fix_action_key(check: &str) -> String {
    format!("{}{}", FIX_ACTION_PREFIX, check)
}
