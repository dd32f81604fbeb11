//! Wizard-specific errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::validation::ValidationReport;
use crate::ports::{DraftStoreError, GatewayError};

/// Errors returned by wizard operations.
///
/// None of these are fatal: the orchestrator stays in `Editing` with the
/// local draft intact after any of them.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The submitted section failed its field rules.
    #[error("Validation failed for {} field(s)", .0.errors().len())]
    Validation(ValidationReport),

    /// The backend refused or never received an upsert.
    #[error("Failed to save listing: {0}")]
    Upsert(#[source] GatewayError),

    #[error("Draft store error: {0}")]
    Store(#[from] DraftStoreError),

    #[error("Invalid wizard transition: {0}")]
    Transition(#[from] ValidationError),

    #[error("{0}")]
    Navigation(DomainError),
}

impl WizardError {
    pub fn not_mounted() -> Self {
        WizardError::Navigation(DomainError::new(
            ErrorCode::InvalidStateTransition,
            "Wizard has not been mounted",
        ))
    }

    pub fn no_listing() -> Self {
        WizardError::Navigation(DomainError::new(
            ErrorCode::ListingNotFound,
            "Draft has no listing id to refresh from",
        ))
    }

    /// The validation report, if this is a validation failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            WizardError::Validation(report) => Some(report),
            _ => None,
        }
    }

    /// Maps the error onto the shared error code set.
    pub fn code(&self) -> ErrorCode {
        match self {
            WizardError::Validation(_) => ErrorCode::ValidationFailed,
            WizardError::Upsert(_) => ErrorCode::GatewayError,
            WizardError::Store(_) => ErrorCode::StorageError,
            WizardError::Transition(_) => ErrorCode::InvalidStateTransition,
            WizardError::Navigation(err) => err.code,
        }
    }
}
