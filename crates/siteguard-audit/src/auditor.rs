//! Auditor - orchestrates scan and fix execution

use crate::score::{with_trends, HistoryEntry, Score};
use serde::{Deserialize, Serialize};
use siteguard_checks::CheckRegistry;
use siteguard_core::{
    Check, CheckContext, Error, FixAction, FixResult, FixStatus, GradeScale, MessageId, Priority,
    Result, ScanResult, ScanStatus, StatusCounts, Trend,
};
use siteguard_store::ResultStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Message a non-automatable check uses to explain why it cannot fix itself
const CANTFIX_MESSAGE: MessageId = 300;

/// Runs checks against a site and keeps their results in a store
pub struct Auditor {
    registry: CheckRegistry,
    store: ResultStore,
    ctx: CheckContext,
    grades: GradeScale,
}

/// Outcome of one check within a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub priority: Priority,
    pub result: ScanResult,
    /// Messages rendered through the check's catalogue
    pub rendered: Vec<String>,
}

/// Outcome of a fix call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReport {
    pub name: String,
    pub fix: FixResult,
    pub rendered: Vec<String>,
    /// Scan run after the fix, absent when nothing was attempted
    pub scan: Option<ScanResult>,
}

/// Result of a full audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Reports of the checks that ran, in run order
    pub results: Vec<CheckReport>,
    pub score: Score,
    pub trend: Trend,
    /// Store failures encountered; they do not stop the run
    pub errors: Vec<String>,
}

/// Stored state of one check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckState {
    pub name: String,
    pub title: String,
    pub priority: Priority,
    pub status: ScanStatus,
    pub fix_status: Option<FixStatus>,
    pub messages: Vec<String>,
    pub pre_fix_messages: Vec<String>,
}

impl Auditor {
    /// Create a new auditor
    pub fn new(registry: CheckRegistry, store: ResultStore, ctx: CheckContext) -> Self {
        Self {
            registry,
            store,
            ctx,
            grades: GradeScale::default(),
        }
    }

    pub fn with_grade_scale(mut self, grades: GradeScale) -> Self {
        self.grades = grades;
        self
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn context(&self) -> &CheckContext {
        &self.ctx
    }

    /// Scan one check and persist its result
    pub fn run_one(&self, name: &str) -> Result<ScanResult> {
        let check = self.registry.get(name)?;
        self.scan_and_save(check.as_ref())
    }

    fn scan_and_save(&self, check: &dyn Check) -> Result<ScanResult> {
        debug!("Scanning {}", check.name());
        let result = check.scan(&self.ctx);
        if matches!(result.status, ScanStatus::Warning) {
            warn!("Scan of {} was inconclusive", check.name());
        }
        self.store.save_scan(check.name(), &result)?;
        Ok(result)
    }

    /// Scan every check, or those of one priority, then record the score.
    ///
    /// The score is site-wide: it covers the stored result of every
    /// registered check, so a filtered run also counts earlier results of
    /// the priorities it skipped. A failure to persist one result is
    /// reported and the run continues.
    pub fn run_all(&self, priority: Option<Priority>) -> AuditReport {
        info!(
            "Starting audit of {} ({})",
            self.ctx.site.home_url(),
            priority.map_or("all priorities", |p| p.as_str())
        );

        let mut results = Vec::new();
        let mut errors = Vec::new();

        for check in self.registry.in_run_order() {
            let metadata = check.metadata();
            if priority.is_some_and(|p| p != metadata.priority) {
                continue;
            }

            let result = check.scan(&self.ctx);
            debug!("{}: {}", metadata.name, result.status);
            if let Err(e) = self.store.save_scan(&metadata.name, &result) {
                error!(code = e.code(), "Failed to save scan of {}: {}", metadata.name, e);
                errors.push(format!("{}: {}", metadata.name, e));
            }

            results.push(CheckReport {
                name: metadata.name.clone(),
                priority: metadata.priority,
                rendered: result.render(check.catalogue()),
                result,
            });
        }

        let score = match self.score() {
            Ok(score) => score,
            Err(e) => {
                error!(code = e.code(), "Failed to read stored results: {}", e);
                errors.push(e.to_string());
                let counts = results.iter().map(|r| r.result.status).collect();
                Score::from_counts(counts, &self.grades)
            }
        };

        let previous = self.store.scan_times().ok().and_then(|h| h.last().cloned());
        let record = score.to_record();
        let trend = record.trend_from(previous.as_ref());
        if let Err(e) = self.store.push_scan_time(record) {
            error!(code = e.code(), "Failed to record scan time: {}", e);
            errors.push(e.to_string());
        }

        info!(
            "Audit complete: {} good, {} bad, {} warning, {} not scanned, {}% ({})",
            score.counts.good,
            score.counts.bad,
            score.counts.warning,
            score.counts.not_scanned,
            score.percent,
            score.grade
        );

        AuditReport {
            results,
            score,
            trend,
            errors,
        }
    }

    /// Try to remediate one check, then rescan it
    pub fn fix(&self, name: &str) -> Result<FixReport> {
        let check = self.registry.get(name)?;
        let metadata = check.metadata();

        if !metadata.fixable.allows(self.ctx.pro) {
            info!("{} cannot be fixed automatically ({:?})", name, metadata.fixable);
            let mut fix = FixResult::cantfix();
            if check.catalogue().contains(CANTFIX_MESSAGE) {
                fix.add_message(CANTFIX_MESSAGE, vec![]);
            }
            self.store.save_fix(name, &fix)?;
            return Ok(FixReport {
                name: name.to_string(),
                rendered: fix.render(check.catalogue()),
                fix,
                scan: None,
            });
        }

        info!("Fixing {}", name);
        let fix = check.fix(&self.ctx);
        self.finish_fix(check, fix)
    }

    /// Complete a delayed fix with user-submitted fields.
    ///
    /// The pending fix action is consumed before the fix runs, so a second
    /// call with the same input fails with `NoPendingFixAction`.
    pub fn fix_with_input(&self, name: &str, fields: &HashMap<String, String>) -> Result<FixReport> {
        let check = self.registry.get(name)?;
        let action = self
            .store
            .take_fix_action(name)?
            .ok_or_else(|| Error::NoPendingFixAction {
                name: name.to_string(),
            })?;

        info!("Completing delayed fix of {}", name);
        let fix = check.manual_fix(&self.ctx, &action, fields);
        self.finish_fix(check, fix)
    }

    fn finish_fix(&self, check: Arc<dyn Check>, fix: FixResult) -> Result<FixReport> {
        let name = check.name().to_string();
        debug!("{} fix: {}", name, fix.status);
        self.store.save_fix(&name, &fix)?;

        if let Some(request) = &fix.required_action {
            self.store
                .put_fix_action(&FixAction::new(name.clone(), request.clone()))?;
            info!("{} waits for user input", name);
        }

        let scan = self.scan_and_save(check.as_ref())?;
        Ok(FixReport {
            rendered: fix.render(check.catalogue()),
            name,
            fix,
            scan: Some(scan),
        })
    }

    /// Status counts over every registered check
    pub fn counts(&self) -> Result<StatusCounts> {
        self.store.counts(self.registry.names())
    }

    /// Current score from stored results
    pub fn score(&self) -> Result<Score> {
        Ok(Score::from_counts(self.counts()?, &self.grades))
    }

    /// Scan-time history, oldest first, with trends
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(with_trends(self.store.scan_times()?))
    }

    /// Checks of one priority in display order: bad, warning, not scanned,
    /// good; registration order within each group
    pub fn ordered_names(&self, priority: Priority) -> Result<Vec<String>> {
        let scans = self.store.load_scans()?;
        let mut names: Vec<(u8, String)> = self
            .registry
            .by_priority(priority)
            .iter()
            .map(|check| {
                let status = scans
                    .get(check.name())
                    .map(|r| r.status)
                    .unwrap_or_default();
                (status.display_rank(), check.name().to_string())
            })
            .collect();
        names.sort_by_key(|(rank, _)| *rank);
        Ok(names.into_iter().map(|(_, name)| name).collect())
    }

    /// Stored state of every check, by priority then display order
    pub fn states(&self) -> Result<Vec<CheckState>> {
        let scans = self.store.load_scans()?;
        let fixes = self.store.load_fixes()?;
        let mut states = Vec::new();

        for priority in Priority::ALL {
            for name in self.ordered_names(priority)? {
                let check = self.registry.get(&name)?;
                let scan = scans.get(&name);
                states.push(CheckState {
                    title: check.metadata().title.clone(),
                    priority,
                    status: scan.map(|s| s.status).unwrap_or_default(),
                    fix_status: fixes.get(&name).map(|f| f.status),
                    messages: scan
                        .map(|s| s.render(check.catalogue()))
                        .unwrap_or_default(),
                    pre_fix_messages: scan
                        .map(|s| {
                            s.pre_fix_messages
                                .iter()
                                .map(|m| m.render(check.catalogue()))
                                .collect()
                        })
                        .unwrap_or_default(),
                    name,
                });
            }
        }

        Ok(states)
    }
}
