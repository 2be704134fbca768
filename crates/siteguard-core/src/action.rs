//! Fix actions: hand-off records for fixes that need user input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of form field the UI should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Checkbox,
    Number,
    Email,
}

/// One field of a fix-action form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Form description emitted by a delayed fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixActionRequest {
    pub fields: Vec<FormField>,
}

impl FixActionRequest {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Pending fix action, consumed by exactly one follow-up fix call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAction {
    pub check_name: String,
    pub request: FixActionRequest,
    pub created_at: DateTime<Utc>,
}

impl FixAction {
    pub fn new(check_name: impl Into<String>, request: FixActionRequest) -> Self {
        Self {
            check_name: check_name.into(),
            request,
            created_at: Utc::now(),
        }
    }

    /// Submitted values for the fields this action asked for, ignoring extras
    pub fn accepted_values<'a>(
        &self,
        submitted: &'a HashMap<String, String>,
    ) -> HashMap<&str, &'a str> {
        self.request
            .fields
            .iter()
            .filter_map(|f| {
                submitted
                    .get(&f.name)
                    .map(|value| (f.name.as_str(), value.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_values_ignore_unrequested_fields() {
        let action = FixAction::new(
            "bad_usernames",
            FixActionRequest::new(vec![FormField::new("new_login_admin", "admin", FieldKind::Text)]),
        );

        let mut submitted = HashMap::new();
        submitted.insert("new_login_admin".to_string(), "jane".to_string());
        submitted.insert("is_admin".to_string(), "1".to_string());

        let values = action.accepted_values(&submitted);
        assert_eq!(values.len(), 1);
        assert_eq!(values["new_login_admin"], "jane");
    }
}
