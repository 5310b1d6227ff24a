/// Decimal precision for display and serialization of monetary amounts
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Smallest accepted transaction amount
pub const MIN_TRANSACTION_AMOUNT: &str = "0.01";

/// Default color assigned to categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#000000";

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Upper bound for client-supplied page sizes
pub const MAX_PAGE_SIZE: i64 = 200;

/// Default plausible range for budget years, overridable via configuration
pub const DEFAULT_MIN_BUDGET_YEAR: i32 = 2000;
pub const DEFAULT_MAX_BUDGET_YEAR: i32 = 2100;
