//! Shared domain types: money flow direction, sorting, pagination.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// Direction of a money flow. Categories and transactions are both tagged
/// with a kind, and a transaction's kind must match its category's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Income => "INCOME",
            FlowKind::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlowKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(FlowKind::Income),
            "EXPENSE" => Ok(FlowKind::Expense),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown flow kind '{other}', expected INCOME or EXPENSE"
            )))),
        }
    }
}

/// Client-supplied sort: a column id and direction.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sort {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

/// Pagination metadata returned alongside every list response.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_row_count: i64,
    pub page: i64,
    pub page_size: i64,
}

/// One page of results.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
