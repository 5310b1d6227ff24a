//! Database models for transactions.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use fintrack_core::errors::{DatabaseError, Error};
use fintrack_core::transactions::Transaction;
use fintrack_core::types::FlowKind;
use fintrack_core::Result;

use crate::utils::parse_amount;

/// Database model for transactions. Amounts are stored as TEXT so no binary
/// float ever touches the value; dates are ISO-8601 TEXT, which keeps range
/// comparisons correct.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub kind: String,
    pub amount: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn into_domain(self) -> Result<Transaction> {
        let kind = FlowKind::from_str(&self.kind).map_err(|_| {
            Error::Database(DatabaseError::Internal(format!(
                "transaction {} has corrupt kind '{}'",
                self.id, self.kind
            )))
        })?;
        let amount = parse_amount(&self.amount, "amount");
        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            kind,
            amount,
            description: self.description,
            date: self.date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
