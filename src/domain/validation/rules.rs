//! Field rules for listing drafts.

use serde_json::Value;

use super::numeric::{read_number, NumericInput};

pub const NAME_MAX_LEN: usize = 100;
pub const UNIT_NUMBER_MAX_LEN: usize = 20;
pub const MEASUREMENT_MAX_DIGITS: usize = 10;
pub const PRICE_MAX_DECIMALS: usize = 2;
pub const PRICE_MIN_CENTS: i128 = 1_000_000 * 100;
pub const PRICE_MAX_CENTS: i128 = 999_999_999_999;

/// What a rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Free text with an optional presence requirement.
    Text { required: bool, max_len: usize },
    /// Optional non-negative area or length.
    Measurement,
    /// Optional whole-number count between zero and `max`.
    Count { max: i64 },
    /// Required asking price.
    Price,
}

/// A rule bound to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: RuleKind,
}

/// All rules, in focus order: name first, then selling price.
pub static RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        label: "Property name",
        kind: RuleKind::Text {
            required: true,
            max_len: NAME_MAX_LEN,
        },
    },
    FieldRule {
        field: "sellingPrice",
        label: "Selling price",
        kind: RuleKind::Price,
    },
    FieldRule {
        field: "unitNumber",
        label: "Unit number",
        kind: RuleKind::Text {
            required: false,
            max_len: UNIT_NUMBER_MAX_LEN,
        },
    },
    FieldRule {
        field: "lotSize",
        label: "Lot size",
        kind: RuleKind::Measurement,
    },
    FieldRule {
        field: "totalSqft",
        label: "Total square footage",
        kind: RuleKind::Measurement,
    },
    FieldRule {
        field: "basementSqft",
        label: "Basement square footage",
        kind: RuleKind::Measurement,
    },
    FieldRule {
        field: "bedrooms",
        label: "Bedrooms",
        kind: RuleKind::Count { max: 100 },
    },
    FieldRule {
        field: "fullBathrooms",
        label: "Full bathrooms",
        kind: RuleKind::Count { max: 50 },
    },
    FieldRule {
        field: "halfBathrooms",
        label: "Half bathrooms",
        kind: RuleKind::Count { max: 50 },
    },
];

impl FieldRule {
    /// Returns the error message for a value, or `None` if it passes.
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        match self.kind {
            RuleKind::Text { required, max_len } => self.check_text(value, required, max_len),
            RuleKind::Measurement => self.check_measurement(value),
            RuleKind::Count { max } => self.check_count(value, max),
            RuleKind::Price => self.check_price(value),
        }
    }

    fn check_text(&self, value: Option<&Value>, required: bool, max_len: usize) -> Option<String> {
        let text = match value {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.trim(),
            Some(_) => return Some(format!("{} must be text", self.label)),
        };
        if text.is_empty() {
            return required.then(|| format!("{} is required", self.label));
        }
        if text.chars().count() > max_len {
            return Some(format!(
                "{} exceeds max length of {} characters",
                self.label, max_len
            ));
        }
        None
    }

    fn check_measurement(&self, value: Option<&Value>) -> Option<String> {
        let number = match read_number(value) {
            NumericInput::Absent => return None,
            NumericInput::Invalid => return Some(format!("{} must be a number", self.label)),
            NumericInput::Number(n) => n,
        };
        if number.is_negative() {
            return Some(format!("{} cannot be negative", self.label));
        }
        if number.digit_count() > MEASUREMENT_MAX_DIGITS {
            return Some(format!(
                "{} exceeds max of {} digits",
                self.label, MEASUREMENT_MAX_DIGITS
            ));
        }
        None
    }

    fn check_count(&self, value: Option<&Value>, max: i64) -> Option<String> {
        let number = match read_number(value) {
            NumericInput::Absent => return None,
            NumericInput::Invalid => return Some(format!("{} must be a number", self.label)),
            NumericInput::Number(n) => n,
        };
        let Some(whole) = number.as_whole() else {
            return Some(format!("{} must be a whole number", self.label));
        };
        if !(0..=max).contains(&whole) {
            return Some(format!("{} must be between 0 and {}", self.label, max));
        }
        None
    }

    fn check_price(&self, value: Option<&Value>) -> Option<String> {
        let number = match read_number(value) {
            NumericInput::Absent => return Some(format!("{} is required", self.label)),
            NumericInput::Invalid => return Some(format!("{} must be a number", self.label)),
            NumericInput::Number(n) => n,
        };
        if number.decimal_places() > PRICE_MAX_DECIMALS {
            return Some(format!(
                "{} can have at most {} decimal places",
                self.label, PRICE_MAX_DECIMALS
            ));
        }
        let Some(cents) = number.as_cents() else {
            return Some(format!("{} must not exceed 9,999,999,999.99", self.label));
        };
        if cents < PRICE_MIN_CENTS {
            return Some(format!("{} must be at least 1,000,000", self.label));
        }
        if cents > PRICE_MAX_CENTS {
            return Some(format!("{} must not exceed 9,999,999,999.99", self.label));
        }
        None
    }
}

/// Looks a rule up by field name.
pub fn rule_for(field: &str) -> Option<&'static FieldRule> {
    RULES.iter().find(|r| r.field == field)
}
