//! Validation results.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field name → message for every failing field.
pub type ErrorMap = BTreeMap<String, String>;

/// Result of one validation pass.
///
/// Besides the error map, the report carries the failing fields in focus
/// order so the caller can move focus to the most important one. The
/// report itself never touches UI focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: ErrorMap,
    focus_order: Vec<String>,
}

impl ValidationReport {
    pub(super) fn record(&mut self, field: &str, message: String) {
        if self.errors.insert(field.to_string(), message).is_none() {
            self.focus_order.push(field.to_string());
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// The field that should receive focus first.
    pub fn focus(&self) -> Option<&str> {
        self.focus_order.first().map(String::as_str)
    }

    /// All failing fields in focus order.
    pub fn focus_order(&self) -> &[String] {
        &self.focus_order
    }
}
