//! Shared helpers for the storage repositories.

use std::str::FromStr;

use fintrack_core::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use log::error;
use rust_decimal::Decimal;

/// Parses a stored decimal string, logging and falling back to zero on
/// corrupt data so a single bad row cannot take down a whole listing.
pub fn parse_amount(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to parse {field_name} '{value_str}' as Decimal (err: {e}). Falling back to ZERO.");
            Decimal::ZERO
        }
    }
}

/// Normalizes client paging input into (page, page_size, offset). Pages are
/// 1-based; page sizes are clamped to the configured maximum.
pub fn page_window(page: Option<i64>, page_size: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, page_size, (page - 1) * page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42.50", "amount"), dec!(42.50));
        assert_eq!(parse_amount("not-a-number", "amount"), Decimal::ZERO);
    }

    #[test]
    fn test_page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, 50, 0));
        assert_eq!(page_window(Some(3), Some(20)), (3, 20, 40));
        assert_eq!(page_window(Some(0), Some(10_000)), (1, 200, 0));
    }
}
