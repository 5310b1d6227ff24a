//! Category domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{FlowKind, Sort};

/// Domain model for an income or expense category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: FlowKind,
    pub icon: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new category.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: Option<String>,
    pub name: String,
    pub kind: FlowKind,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Partial update for a category. Absent fields keep their current value.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub kind: Option<FlowKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

/// List filters for categories.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilters {
    pub kind: Option<FlowKind>,
    pub is_active: Option<bool>,
    /// Substring match on the category name.
    pub search: Option<String>,
    pub sort: Option<Sort>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
