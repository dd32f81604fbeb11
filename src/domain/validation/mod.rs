//! Validation Engine - pure field rules over a listing draft.
//!
//! `validate` evaluates every rule; `validate_section` only the rules for
//! fields the given section owns. Neither has side effects.

mod numeric;
mod report;
mod rules;

pub use numeric::{read_number, NumericInput, ParsedNumber};
pub use report::{ErrorMap, ValidationReport};
pub use rules::{rule_for, FieldRule, RuleKind, RULES};

use crate::domain::listing::{fields::binding_for, ListingDraft, Section};

/// Evaluates every rule against the draft.
pub fn validate(draft: &ListingDraft) -> ValidationReport {
    run(draft, RULES.iter())
}

/// Evaluates the rules whose field belongs to `section`.
pub fn validate_section(draft: &ListingDraft, section: Section) -> ValidationReport {
    run(
        draft,
        RULES
            .iter()
            .filter(|rule| binding_for(rule.field).map(|b| b.section) == Some(section)),
    )
}

fn run<'a>(draft: &ListingDraft, rules: impl Iterator<Item = &'a FieldRule>) -> ValidationReport {
    let mut report = ValidationReport::default();
    for rule in rules {
        if let Some(message) = rule.check(draft.field(rule.field)) {
            report.record(rule.field, message);
        }
    }
    report
}
