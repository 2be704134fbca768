//! Scan and fix results
//!
//! A result is built fresh by every `scan()` / `fix()` call. Messages are
//! appended in order and each one may only make the status worse; the
//! `maybe_set_*` helpers record the good fallback when nothing else was said.

use crate::action::FixActionRequest;
use crate::message::{MessageArg, MessageBucket, MessageCatalogue, MessageId};
use crate::status::{FixStatus, ScanStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message ID with its substitution arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<MessageArg>,
}

impl Message {
    pub fn new(id: MessageId, args: Vec<MessageArg>) -> Self {
        Self { id, args }
    }

    pub fn render(&self, catalogue: &MessageCatalogue) -> String {
        catalogue.format(self.id, &self.args)
    }
}

/// Result of a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: ScanStatus,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Hints shown before a fix is attempted; never affect the status
    #[serde(default)]
    pub pre_fix_messages: Vec<Message>,
    pub time: DateTime<Utc>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self {
            status: ScanStatus::NotScanned,
            messages: Vec::new(),
            pre_fix_messages: Vec::new(),
            time: Utc::now(),
        }
    }

    /// Record a message and raise the status to the one its ID implies
    pub fn add_message(&mut self, id: MessageId, args: Vec<MessageArg>) {
        let status = MessageBucket::of(id).scan_status();
        if self.messages.is_empty() || status.rank() > self.status.rank() {
            self.status = status;
        }
        self.messages.push(Message::new(id, args));
    }

    /// Record `good_id` as the outcome unless a message was already added
    pub fn maybe_set_status(&mut self, good_id: MessageId) {
        if self.messages.is_empty() {
            self.add_message(good_id, Vec::new());
        }
    }

    pub fn add_pre_fix_message(&mut self, id: MessageId, args: Vec<MessageArg>) {
        self.pre_fix_messages.push(Message::new(id, args));
    }

    pub fn is_bad(&self) -> bool {
        self.status == ScanStatus::Bad
    }

    pub fn render(&self, catalogue: &MessageCatalogue) -> Vec<String> {
        self.messages.iter().map(|m| m.render(catalogue)).collect()
    }
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a fix attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixResult {
    pub status: FixStatus,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Set when the fix needs user-submitted fields to complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<FixActionRequest>,
    pub time: DateTime<Utc>,
}

impl FixResult {
    pub fn new() -> Self {
        Self {
            status: FixStatus::NotFixed,
            messages: Vec::new(),
            required_action: None,
            time: Utc::now(),
        }
    }

    /// A fix that was never attempted because the check is not automatable
    pub fn cantfix() -> Self {
        Self {
            status: FixStatus::CantFix,
            ..Self::new()
        }
    }

    pub fn add_message(&mut self, id: MessageId, args: Vec<MessageArg>) {
        let status = MessageBucket::of(id).fix_status();
        if self.messages.is_empty() || status.rank() > self.status.rank() {
            self.status = status;
        }
        self.messages.push(Message::new(id, args));
    }

    pub fn maybe_set_fix_status(&mut self, good_id: MessageId) {
        if self.messages.is_empty() {
            self.add_message(good_id, Vec::new());
        }
    }

    /// Ask the user for more input. The fix stays `not_fixed` until then.
    pub fn require_action(&mut self, request: FixActionRequest) {
        self.status = FixStatus::NotFixed;
        self.required_action = Some(request);
    }

    pub fn render(&self, catalogue: &MessageCatalogue) -> Vec<String> {
        self.messages.iter().map(|m| m.render(catalogue)).collect()
    }
}

impl Default for FixResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{FieldKind, FormField};

    #[test]
    fn test_good_is_the_fallback() {
        let mut result = ScanResult::new();
        result.maybe_set_status(0);
        assert_eq!(result.status, ScanStatus::Good);
        assert_eq!(result.messages, vec![Message::new(0, vec![])]);
    }

    #[test]
    fn test_maybe_set_status_after_bad_is_noop() {
        let mut result = ScanResult::new();
        result.add_message(200, vec!["x".into()]);
        result.maybe_set_status(0);
        assert_eq!(result.status, ScanStatus::Bad);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_maybe_set_status_after_warning_is_noop() {
        let mut result = ScanResult::new();
        result.add_message(100, vec![]);
        result.maybe_set_status(0);
        assert_eq!(result.status, ScanStatus::Warning);
    }

    #[test]
    fn test_status_never_improves() {
        let mut result = ScanResult::new();
        result.add_message(200, vec![]);
        result.add_message(100, vec![]);
        result.add_message(0, vec![]);
        assert_eq!(result.status, ScanStatus::Bad);
        assert_eq!(result.messages.len(), 3);
    }

    #[test]
    fn test_pre_fix_messages_do_not_affect_status() {
        let mut result = ScanResult::new();
        result.add_pre_fix_message(201, vec![]);
        result.maybe_set_status(0);
        assert_eq!(result.status, ScanStatus::Good);
        assert_eq!(result.pre_fix_messages.len(), 1);
    }

    #[test]
    fn test_fix_status_escalation() {
        let mut fix = FixResult::new();
        fix.add_message(1, vec![]);
        assert_eq!(fix.status, FixStatus::Fixed);
        fix.add_message(101, vec![]);
        assert_eq!(fix.status, FixStatus::PartiallyFixed);
        fix.add_message(201, vec![]);
        assert_eq!(fix.status, FixStatus::NotFixed);
        fix.maybe_set_fix_status(1);
        assert_eq!(fix.status, FixStatus::NotFixed);
    }

    #[test]
    fn test_required_action_keeps_not_fixed() {
        let mut fix = FixResult::new();
        fix.add_message(202, vec![]);
        fix.require_action(FixActionRequest::new(vec![FormField::new(
            "new_login_admin",
            "New login for admin",
            FieldKind::Text,
        )]));
        assert_eq!(fix.status, FixStatus::NotFixed);
        assert!(fix.required_action.is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let mut result = ScanResult::new();
        result.add_message(200, vec!["a".into(), vec!["b".to_string()].into()]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "bad");
        assert_eq!(value["messages"][0]["id"], 200);
        assert_eq!(value["messages"][0]["args"][1][0], "b");
    }
}
