//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{FlowKind, Sort};

/// Domain model for a single dated monetary event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    /// Cleared (not deleted) when the referenced category is removed.
    pub category_id: Option<String>,
    pub kind: FlowKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for recording a new transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub category_id: Option<String>,
    pub kind: FlowKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Full-record update; every mutable field is restated and revalidated.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub category_id: Option<String>,
    pub kind: FlowKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// List filters for transactions.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub kind: Option<FlowKind>,
    pub category_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    /// Substring match on the description.
    pub search: Option<String>,
    pub sort: Option<Sort>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One raw row feeding the dashboard summary: the repository returns these
/// from a single range query and the service does the grouping in Rust.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub category_name: Option<String>,
    pub kind: FlowKind,
    pub amount: Decimal,
}

/// Per-(category, kind) slice of the dashboard summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// None groups the transactions whose category was deleted.
    pub category: Option<String>,
    pub kind: FlowKind,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Dashboard summary over a date range.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub period: SummaryPeriod,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// income - expenses
    pub balance: Decimal,
    pub transaction_count: i64,
    /// Grouped by (category, kind), largest totals first.
    pub category_breakdown: Vec<CategoryBreakdown>,
}
