use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use fintrack_core::errors::{DatabaseError, Error, ValidationError};
use fintrack_core::users::{NewUser, User, UserCredentials, UserRepositoryTrait, UserUpdate};
use fintrack_core::Result;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::users;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))?;
        Ok(User::from(user_db))
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(user_db.map(|db| UserCredentials {
            password_hash: db.password_hash().to_string(),
            user: User::from(db),
        }))
    }

    async fn insert_new_user(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let taken: i64 = users::table
                    .filter(users::email.eq(&new_user.email))
                    .count()
                    .get_result(conn)
                    .into_core()?;
                if taken > 0 {
                    return Err(Error::Validation(ValidationError::field(
                        "email",
                        "a user with this email already exists",
                    )));
                }

                let now = Utc::now().naive_utc();
                let user_db = UserDB {
                    id: new_user
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    first_name: new_user.first_name,
                    last_name: new_user.last_name,
                    created_at: now,
                    updated_at: now,
                };
                let result_db = diesel::insert_into(users::table)
                    .values(&user_db)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(User::from(result_db))
            })
            .await
    }

    async fn update_profile(&self, user_id: String, update: UserUpdate) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let affected = diesel::update(users::table.find(&user_id))
                    .set((
                        update.first_name.map(|v| users::first_name.eq(v)),
                        update.last_name.map(|v| users::last_name.eq(v)),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(user_id)));
                }
                let result_db = users::table
                    .find(&user_id)
                    .select(UserDB::as_select())
                    .first::<UserDB>(conn)
                    .into_core()?;
                Ok(User::from(result_db))
            })
            .await
    }

    async fn delete_user(&self, user_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
