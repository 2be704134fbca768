//! Deny-list compilation and matching

use crate::lists::split_entries;
use crate::Result;
use regex::{Regex, RegexBuilder};

/// A deny list compiled into one case-insensitive alternation.
///
/// An empty list compiles to a pattern that never matches.
#[derive(Debug, Clone)]
pub struct DenyPattern {
    regex: Option<Regex>,
    entries: usize,
}

impl DenyPattern {
    /// Compile a comma-separated list; entries match as literal substrings
    pub fn compile(list: &str) -> Result<Self> {
        let alternatives: Vec<String> = split_entries(list).map(regex::escape).collect();
        if alternatives.is_empty() {
            return Ok(Self {
                regex: None,
                entries: 0,
            });
        }

        let regex = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            regex: Some(regex),
            entries: alternatives.len(),
        })
    }

    /// Whether any entry occurs in `value`; empty values never match
    pub fn is_match(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        self.regex.as_ref().is_some_and(|re| re.is_match(value))
    }

    /// The first entry found in `value`
    pub fn find<'v>(&self, value: &'v str) -> Option<&'v str> {
        if value.is_empty() {
            return None;
        }
        self.regex
            .as_ref()
            .and_then(|re| re.find(value))
            .map(|m| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Whether any entry of a comma-separated list occurs in `value`
pub fn matches(value: &str, list: &str) -> Result<bool> {
    Ok(DenyPattern::compile(list)?.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_literal() {
        let pattern = DenyPattern::compile("eval(, ../, pro[sz]ac, DA$").unwrap();
        assert_eq!(pattern.len(), 4);
        assert!(pattern.is_match("/?q=EVAL(base64)"));
        assert!(pattern.is_match("/../../etc"));
        assert!(pattern.is_match("pro[sz]ac"));
        assert!(!pattern.is_match("prozac"));
        assert!(pattern.is_match("da$h"));
        assert!(!pattern.is_match("evaluate"));
    }

    #[test]
    fn test_whitespace_and_empty_entries() {
        let pattern = DenyPattern::compile(" ,foo ,  , bar baz,").unwrap();
        assert_eq!(pattern.len(), 2);
        assert!(pattern.is_match("BAR BAZ"));
        assert_eq!(pattern.find("xxfooxx"), Some("foo"));
    }

    #[test]
    fn test_empty_list_never_matches() {
        for list in ["", " ", ",", " , ,"] {
            let pattern = DenyPattern::compile(list).unwrap();
            assert!(pattern.is_empty());
            for value in ["", "anything", "sqlmap", ","] {
                assert!(!pattern.is_match(value));
            }
        }
    }

    #[test]
    fn test_empty_value_never_matches() {
        assert!(!matches("", "a, b").unwrap());
        assert!(matches("xbx", "a, b").unwrap());
    }
}
