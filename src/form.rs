//! Campaign Form Validation
//!
//! Validates user-entered campaign parameters before anything touches the
//! network, and normalizes them into the units the ledger expects. Every
//! violated rule is reported, not just the first.

use crate::amount::{self, AmountError};
use crate::deadline::{self, DeadlineError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum lead time between "now" and an acceptable deadline. A deadline
/// closer than this cannot absorb confirmation latency.
pub const MIN_LEAD_TIME_SECS: i64 = 3_600;

/// User-entered campaign parameters, as they arrive from the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    /// Decimal string in display units.
    pub target: String,
    /// Datetime-local string, epoch seconds, or epoch milliseconds.
    pub deadline: String,
    /// Optional image URL; a placeholder is derived from the title when absent.
    #[serde(default)]
    pub image: Option<String>,
}

/// A form that passed every rule, normalized and ready for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub title: String,
    pub description: String,
    pub target_base_units: u128,
    pub deadline: DateTime<Utc>,
    pub image: Option<String>,
}

/// One violated validation rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("description must not be empty")]
    EmptyDescription,

    #[error("target is not a valid amount: {0}")]
    InvalidTarget(String),

    #[error("target must be greater than zero")]
    NonPositiveTarget,

    #[error("deadline is not a valid date: {0}")]
    UnparseableDeadline(String),

    #[error("deadline must be more than {0} minutes in the future")]
    DeadlineTooSoon(i64),
}

/// Validate against the current wall clock.
pub fn validate(form: &CampaignForm, decimals: u32) -> Result<ValidatedForm, Vec<ValidationError>> {
    validate_at(form, decimals, Utc::now())
}

/// Validate against an explicit clock, collecting every violated rule.
pub fn validate_at(
    form: &CampaignForm,
    decimals: u32,
    now: DateTime<Utc>,
) -> Result<ValidatedForm, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let title = form.title.trim();
    if title.is_empty() {
        errors.push(ValidationError::EmptyTitle);
    }

    let description = form.description.trim();
    if description.is_empty() {
        errors.push(ValidationError::EmptyDescription);
    }

    // A target that truncates to zero base units (sub-precision dust) is as
    // unusable as a literal zero.
    let target_base_units = match amount::to_base_units(&form.target, decimals) {
        Ok(0) => {
            errors.push(ValidationError::NonPositiveTarget);
            0
        }
        Ok(units) => units,
        Err(AmountError::InvalidAmount(reason)) => {
            errors.push(ValidationError::InvalidTarget(reason));
            0
        }
    };

    let deadline = match deadline::parse_deadline_lenient(&form.deadline) {
        Ok(instant) => {
            if instant <= now + Duration::seconds(MIN_LEAD_TIME_SECS) {
                errors.push(ValidationError::DeadlineTooSoon(MIN_LEAD_TIME_SECS / 60));
            }
            Some(instant)
        }
        Err(DeadlineError::InvalidDeadline(reason)) => {
            errors.push(ValidationError::UnparseableDeadline(reason));
            None
        }
    };

    let deadline = match deadline {
        Some(instant) => instant,
        None => return Err(errors),
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedForm {
        title: title.to_string(),
        description: description.to_string(),
        target_base_units,
        deadline,
        image: form.image.clone(),
    })
}
