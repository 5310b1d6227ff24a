//! Pure field validators composed by the domain services.
//!
//! Each check returns `Option<FieldIssue>` so callers can gather every
//! failure before rejecting a request; `require_valid` turns the gathered
//! issues into a `ValidationError::Fields` ahead of any store write.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, FieldIssue, Result, ValidationError};
use crate::types::FlowKind;

/// Fails when any issue was collected. Mutations call this before touching
/// the repository, so a rejected request never produces a partial write.
pub fn require_valid(issues: Vec<FieldIssue>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(ValidationError::Fields(issues)))
    }
}

pub fn check_not_blank(field: &str, value: &str) -> Option<FieldIssue> {
    if value.trim().is_empty() {
        Some(FieldIssue::new(field, "must not be blank"))
    } else {
        None
    }
}

pub fn check_amount_at_least(field: &str, amount: Decimal, min: Decimal) -> Option<FieldIssue> {
    if amount < min {
        Some(FieldIssue::new(field, format!("must be at least {min}")))
    } else {
        None
    }
}

/// Amounts are fixed-point with two decimal places; anything finer is a
/// client error rather than something to round away silently.
pub fn check_amount_scale(field: &str, amount: Decimal) -> Option<FieldIssue> {
    if amount.normalize().scale() > DISPLAY_DECIMAL_PRECISION {
        Some(FieldIssue::new(
            field,
            format!("must have at most {DISPLAY_DECIMAL_PRECISION} decimal places"),
        ))
    } else {
        None
    }
}

pub fn check_month(field: &str, month: i32) -> Option<FieldIssue> {
    if (1..=12).contains(&month) {
        None
    } else {
        Some(FieldIssue::new(field, "must be between 1 and 12"))
    }
}

pub fn check_year(field: &str, year: i32, range: &RangeInclusive<i32>) -> Option<FieldIssue> {
    if range.contains(&year) {
        None
    } else {
        Some(FieldIssue::new(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
        ))
    }
}

/// Cross-field rule: a transaction attached to a category must share the
/// category's kind.
pub fn check_kind_matches(
    field: &str,
    category_kind: FlowKind,
    transaction_kind: FlowKind,
) -> Option<FieldIssue> {
    if category_kind == transaction_kind {
        None
    } else {
        Some(FieldIssue::new(
            field,
            "category kind must match transaction kind",
        ))
    }
}
