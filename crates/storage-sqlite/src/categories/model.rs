//! Database models for categories.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::categories::Category;
use fintrack_core::errors::{DatabaseError, Error};
use fintrack_core::types::FlowKind;
use fintrack_core::Result;

/// Database model for categories. `kind` is stored as TEXT and parsed into
/// the domain enum on load.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CategoryDB {
    pub fn into_domain(self) -> Result<Category> {
        let kind = FlowKind::from_str(&self.kind).map_err(|_| {
            Error::Database(DatabaseError::Internal(format!(
                "category {} has corrupt kind '{}'",
                self.id, self.kind
            )))
        })?;
        Ok(Category {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            kind,
            icon: self.icon,
            color: self.color,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
