//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use fintrack_core::users::User;

/// Database model for users. The password hash stays in this type and is
/// peeled off before the row crosses into the domain.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserDB {
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            first_name: db.first_name,
            last_name: db.last_name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
