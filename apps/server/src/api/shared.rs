//! Helpers shared by the API handlers.

use chrono::{NaiveDate, Utc};
use fintrack_core::errors::{Error, ValidationError};
use fintrack_core::types::Sort;

use crate::error::ApiError;

/// Parses an optional `YYYY-MM-DD` query value, failing with a field-scoped
/// 400 rather than an unhandled fault.
pub fn parse_date_optional(
    value: Option<String>,
    field: &str,
) -> Result<Option<NaiveDate>, ApiError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ApiError::from(Error::Validation(ValidationError::field(
                    field,
                    "must be a date in YYYY-MM-DD format",
                )))
            })
        })
        .transpose()
}

/// Parses a `?sort=` value: a column id with an optional `-` prefix for
/// descending order (e.g. `-createdAt`).
pub fn parse_sort(value: Option<String>) -> Option<Sort> {
    value.map(|raw| match raw.strip_prefix('-') {
        Some(id) => Sort {
            id: id.to_string(),
            desc: true,
        },
        None => Sort {
            id: raw,
            desc: false,
        },
    })
}

/// The server's clock, passed into the aggregation services so their
/// month/year defaults stay an explicit input.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
