//! Message catalogues and printf-style message formatting
//!
//! Every check owns a catalogue mapping numeric message IDs to templates.
//! The hundreds digit of an ID selects its status bucket:
//!
//! | IDs       | bucket  |
//! |-----------|---------|
//! | 0..=99    | good    |
//! | 100..=199 | warning |
//! | 200..=299 | bad     |
//! | 300..     | cantfix |

use crate::status::{FixStatus, ScanStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric message identifier, stable per check
pub type MessageId = u16;

/// Text returned for IDs missing from a catalogue
pub const UNKNOWN_MESSAGE: &str = "Unknown message";

/// Status bucket a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageBucket {
    Good,
    Warning,
    Bad,
    CantFix,
}

impl MessageBucket {
    pub fn of(id: MessageId) -> Self {
        match id {
            0..=99 => MessageBucket::Good,
            100..=199 => MessageBucket::Warning,
            200..=299 => MessageBucket::Bad,
            _ => MessageBucket::CantFix,
        }
    }

    /// Status a scan message of this bucket implies
    pub fn scan_status(&self) -> ScanStatus {
        match self {
            MessageBucket::Good => ScanStatus::Good,
            MessageBucket::Warning => ScanStatus::Warning,
            MessageBucket::Bad => ScanStatus::Bad,
            MessageBucket::CantFix => ScanStatus::CantFix,
        }
    }

    /// Status a fix message of this bucket implies
    pub fn fix_status(&self) -> FixStatus {
        match self {
            MessageBucket::Good => FixStatus::Fixed,
            MessageBucket::Warning => FixStatus::PartiallyFixed,
            MessageBucket::Bad => FixStatus::NotFixed,
            MessageBucket::CantFix => FixStatus::CantFix,
        }
    }
}

/// A substitution argument: a single value or a list rendered as an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageArg {
    Text(String),
    List(Vec<String>),
}

impl MessageArg {
    /// Render the argument as it appears in a formatted message
    pub fn render(&self) -> String {
        match self {
            MessageArg::Text(text) => text.clone(),
            MessageArg::List(items) => enumerate(items),
        }
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        MessageArg::Text(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        MessageArg::Text(value)
    }
}

impl From<Vec<String>> for MessageArg {
    fn from(value: Vec<String>) -> Self {
        MessageArg::List(value)
    }
}

/// Join items as "a", "a and b", "a, b and c"
pub fn enumerate(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

/// Substitute `%s`, `%d`, `%N$s` and `%%` in a template.
///
/// Sequential placeholders consume arguments in order; positional ones
/// (`%2$s`) are 1-based and do not advance the sequence. Missing arguments
/// render as empty strings.
pub fn format_template(template: &str, args: &[MessageArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') | Some('d') => {
                chars.next();
                if let Some(arg) = args.get(next) {
                    out.push_str(&arg.render());
                }
                next += 1;
            }
            Some(d) if d.is_ascii_digit() => {
                // Candidate positional placeholder; fall back to literal text.
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('$') && matches!(lookahead.next(), Some('s') | Some('d')) {
                    chars.next();
                    chars.next();
                    let index = digits.parse::<usize>().unwrap_or(0);
                    if let Some(arg) = index.checked_sub(1).and_then(|i| args.get(i)) {
                        out.push_str(&arg.render());
                    }
                } else {
                    out.push('%');
                    out.push_str(&digits);
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

/// A check's message catalogue
#[derive(Debug, Clone, Default)]
pub struct MessageCatalogue {
    messages: BTreeMap<MessageId, &'static str>,
}

impl MessageCatalogue {
    pub fn new(entries: &[(MessageId, &'static str)]) -> Self {
        Self {
            messages: entries.iter().copied().collect(),
        }
    }

    /// Template for an ID, or [`UNKNOWN_MESSAGE`]
    pub fn get(&self, id: MessageId) -> &'static str {
        self.messages.get(&id).copied().unwrap_or(UNKNOWN_MESSAGE)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.messages.contains_key(&id)
    }

    /// Whole catalogue, one bucket, or a single message.
    ///
    /// An ID takes precedence over a bucket; an unknown ID yields a single
    /// [`UNKNOWN_MESSAGE`] entry.
    pub fn select(
        &self,
        bucket: Option<MessageBucket>,
        id: Option<MessageId>,
    ) -> Vec<(MessageId, &'static str)> {
        if let Some(id) = id {
            return vec![(id, self.get(id))];
        }

        self.messages
            .iter()
            .filter(|(id, _)| bucket.map_or(true, |b| MessageBucket::of(**id) == b))
            .map(|(id, text)| (*id, *text))
            .collect()
    }

    /// Render one message with its arguments
    pub fn format(&self, id: MessageId, args: &[MessageArg]) -> String {
        format_template(self.get(id), args)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> MessageCatalogue {
        MessageCatalogue::new(&[
            (0, "All good."),
            (100, "Unable to determine status of %s."),
            (200, "File permissions for %1$s should be %2$s, NOT %3$s!"),
            (201, "Unable to apply new file permissions to %s."),
            (300, "Cannot be fixed automatically."),
        ])
    }

    #[test]
    fn test_buckets() {
        assert_eq!(MessageBucket::of(0), MessageBucket::Good);
        assert_eq!(MessageBucket::of(99), MessageBucket::Good);
        assert_eq!(MessageBucket::of(150), MessageBucket::Warning);
        assert_eq!(MessageBucket::of(201), MessageBucket::Bad);
        assert_eq!(MessageBucket::of(300), MessageBucket::CantFix);
        assert_eq!(MessageBucket::Warning.fix_status(), FixStatus::PartiallyFixed);
    }

    #[test]
    fn test_positional_and_sequential_formatting() {
        let cat = catalogue();
        let text = cat.format(200, &["wp-config.php".into(), "0644".into(), "0666".into()]);
        assert_eq!(text, "File permissions for wp-config.php should be 0644, NOT 0666!");

        let text = format_template("%2$s before %1$s, then %s", &["a".into(), "b".into()]);
        assert_eq!(text, "b before a, then a");
    }

    #[test]
    fn test_list_arguments_are_enumerated() {
        let cat = catalogue();
        let files = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(
            cat.format(201, &[files.into()]),
            "Unable to apply new file permissions to a, b and c."
        );
        assert_eq!(enumerate(&["x".to_string(), "y".to_string()]), "x and y");
    }

    #[test]
    fn test_literal_percent_and_missing_args() {
        assert_eq!(format_template("100%% sure", &[]), "100% sure");
        assert_eq!(format_template("score %d%%", &["80".into()]), "score 80%");
        assert_eq!(format_template("value: %s", &[]), "value: ");
        assert_eq!(format_template("%3 apples", &[]), "%3 apples");
    }

    #[test]
    fn test_select() {
        let cat = catalogue();
        assert_eq!(cat.select(None, None).len(), 5);
        let bad = cat.select(Some(MessageBucket::Bad), None);
        assert_eq!(bad.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![200, 201]);
        assert_eq!(cat.select(None, Some(100))[0].0, 100);
        assert_eq!(cat.select(None, Some(999))[0].1, UNKNOWN_MESSAGE);
        assert_eq!(cat.get(42), UNKNOWN_MESSAGE);
    }

    #[test]
    fn test_arg_serialization_is_untagged() {
        let args = vec![MessageArg::from("x"), MessageArg::List(vec!["a".into()])];
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"["x",["a"]]"#);
        let back: Vec<MessageArg> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, args);
    }
}
