//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::budgets::Budget;

use crate::utils::parse_amount;

/// Database model for budgets. The allocation is stored as TEXT like every
/// other monetary amount.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub month: i32,
    pub year: i32,
    pub allocated_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        Self {
            allocated_amount: parse_amount(&db.allocated_amount, "allocated_amount"),
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            month: db.month,
            year: db.year,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
