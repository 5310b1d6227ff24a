//! Budget domain models, including the derived spend-vs-budget views.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Sort;

/// Domain model for a monthly allocation on an expense category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub month: i32,
    pub year: i32,
    pub allocated_amount: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new budget.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub id: Option<String>,
    pub category_id: String,
    pub month: i32,
    pub year: i32,
    pub allocated_amount: Decimal,
}

/// Post-creation update. Only the allocation is mutable; category, month and
/// year are part of the budget's identity and silently keep their values.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub allocated_amount: Decimal,
}

/// List filters for budgets.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BudgetFilters {
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub category_id: Option<String>,
    pub sort: Option<Sort>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A budget joined with its category name, as loaded for aggregation.
#[derive(Debug, Clone)]
pub struct BudgetWithCategory {
    pub budget: Budget,
    pub category_name: String,
}

/// One budget row of the `current` view with its derived spend fields.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub category_name: String,
    pub spent_amount: Decimal,
    /// allocated - spent; negative when the budget is blown.
    pub remaining_amount: Decimal,
    /// spent / allocated * 100, rounded to 2 places; 0 when nothing is
    /// allocated. Display-only, never fed back into Decimal math.
    pub percentage_used: f64,
}

/// The `current` view: every budget for one month with spend progress.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub month: i32,
    pub year: i32,
    pub budgets: Vec<BudgetProgress>,
}

/// Over/under tag for the comparison view. Spending exactly the allocation
/// still counts as under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Over,
    Under,
}

/// Per-category row of the comparison view.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: f64,
    pub status: BudgetStatus,
}

/// Whole-month totals. `total_spent` covers every expense in the period,
/// budgeted or not, so it can exceed the sum of the per-category rows.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTotals {
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub percentage_used: f64,
}

/// The `comparison` view: overall totals plus the per-category breakdown.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    /// "M/YYYY" label of the compared month.
    pub period: String,
    pub overall: ComparisonTotals,
    pub by_category: Vec<CategoryComparison>,
}

/// Inclusive date range covered by a (month, year) pair.
pub fn month_bounds(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}
