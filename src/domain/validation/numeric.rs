//! Lenient parsing of numeric form input.
//!
//! Form fields arrive as JSON numbers or as strings typed by a user
//! ("2,000,000.00", "$1500000"). Values are parsed into their digit
//! strings so decimal places can be counted exactly.

use serde_json::Value;

/// Outcome of reading a numeric field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericInput {
    /// Field absent, null, or blank.
    Absent,
    /// Present but not a plain decimal number.
    Invalid,
    Number(ParsedNumber),
}

/// A decimal number split into sign and digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    pub negative: bool,
    integer: String,
    fraction: String,
}

impl ParsedNumber {
    /// Parses `-?digits(.digits)?`, ignoring `,` separators and a leading `$`.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text
            .trim()
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        let (negative, rest) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (integer, fraction) = match rest.split_once('.') {
            Some((i, f)) => (i, f),
            None => (rest, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let integer = integer.trim_start_matches('0');
        Some(Self {
            negative,
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        })
    }

    /// Digits on both sides of the decimal point, ignoring leading zeros.
    pub fn digit_count(&self) -> usize {
        self.integer.len() + self.fraction.len()
    }

    /// Number of digits after the decimal point.
    pub fn decimal_places(&self) -> usize {
        self.fraction.len()
    }

    /// True when the value is zero, whatever its sign.
    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.chars().all(|c| c == '0')
    }

    /// Whether the value is below zero.
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// The value as a whole number, if it has no fractional part.
    pub fn as_whole(&self) -> Option<i64> {
        if self.fraction.chars().any(|c| c != '0') {
            return None;
        }
        let magnitude: i64 = if self.integer.is_empty() {
            0
        } else {
            self.integer.parse().ok()?
        };
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// The value in hundredths, if it has at most two decimal places.
    pub fn as_cents(&self) -> Option<i128> {
        if self.fraction.len() > 2 || self.integer.len() > 30 {
            return None;
        }
        let units: i128 = if self.integer.is_empty() {
            0
        } else {
            self.integer.parse().ok()?
        };
        let padded = format!("{:0<2}", self.fraction);
        let cents: i128 = padded.parse().ok()?;
        let total = units * 100 + cents;
        Some(if self.negative { -total } else { total })
    }
}

/// Reads a form value as a number.
pub fn read_number(value: Option<&Value>) -> NumericInput {
    match value {
        None | Some(Value::Null) => NumericInput::Absent,
        Some(Value::String(s)) if s.trim().is_empty() => NumericInput::Absent,
        Some(Value::String(s)) => ParsedNumber::parse(s)
            .map(NumericInput::Number)
            .unwrap_or(NumericInput::Invalid),
        Some(Value::Number(n)) => ParsedNumber::parse(&n.to_string())
            .map(NumericInput::Number)
            .unwrap_or(NumericInput::Invalid),
        Some(_) => NumericInput::Invalid,
    }
}
