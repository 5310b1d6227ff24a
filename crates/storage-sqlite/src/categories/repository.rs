use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use fintrack_core::categories::{
    Category, CategoryFilters, CategoryRepositoryTrait, CategoryUpdate, NewCategory,
};
use fintrack_core::constants::DEFAULT_CATEGORY_COLOR;
use fintrack_core::errors::{DatabaseError, Error, ValidationError};
use fintrack_core::types::{PageMeta, Paginated};
use fintrack_core::Result;

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::categories;
use crate::utils::page_window;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CategoryRepository { pool, writer }
    }

    fn get_owned(
        conn: &mut SqliteConnection,
        user_id: &str,
        category_id: &str,
    ) -> Result<CategoryDB> {
        categories::table
            .find(category_id)
            .filter(categories::user_id.eq(user_id))
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(category_id.to_string())))
    }

    /// The (user, name, kind) uniqueness pre-check shared by create and
    /// update; the unique index remains the authoritative guard.
    fn name_taken(
        conn: &mut SqliteConnection,
        user_id: &str,
        name: &str,
        kind: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool> {
        let mut query = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::name.eq(name))
            .filter(categories::kind.eq(kind))
            .into_boxed();
        if let Some(id) = exclude_id {
            query = query.filter(categories::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn).into_core()?;
        Ok(count > 0)
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        Self::get_owned(&mut conn, user_id, category_id)?.into_domain()
    }

    fn list(&self, user_id: &str, filters: &CategoryFilters) -> Result<Paginated<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size, offset) = page_window(filters.page, filters.page_size);

        let base_query = || {
            let mut query = categories::table
                .filter(categories::user_id.eq(user_id))
                .into_boxed();
            if let Some(kind) = filters.kind {
                query = query.filter(categories::kind.eq(kind.as_str()));
            }
            if let Some(is_active) = filters.is_active {
                query = query.filter(categories::is_active.eq(is_active));
            }
            if let Some(ref search) = filters.search {
                query = query.filter(categories::name.like(format!("%{search}%")));
            }
            query
        };

        let total_row_count: i64 = base_query().count().get_result(&mut conn).into_core()?;

        let mut query = base_query();
        query = match filters.sort {
            Some(ref sort) => match (sort.id.as_str(), sort.desc) {
                ("name", false) => query.order(categories::name.asc()),
                ("name", true) => query.order(categories::name.desc()),
                ("createdAt", false) => query.order(categories::created_at.asc()),
                ("createdAt", true) => query.order(categories::created_at.desc()),
                _ => query.order((categories::kind.asc(), categories::name.asc())),
            },
            None => query.order((categories::kind.asc(), categories::name.asc())),
        };

        let rows = query
            .select(CategoryDB::as_select())
            .limit(page_size)
            .offset(offset)
            .load::<CategoryDB>(&mut conn)
            .into_core()?;

        Ok(Paginated {
            data: rows
                .into_iter()
                .map(CategoryDB::into_domain)
                .collect::<Result<Vec<_>>>()?,
            meta: PageMeta {
                total_row_count,
                page,
                page_size,
            },
        })
    }

    async fn insert_new_category(
        &self,
        user_id: String,
        new_category: NewCategory,
    ) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                if Self::name_taken(
                    conn,
                    &user_id,
                    &new_category.name,
                    new_category.kind.as_str(),
                    None,
                )? {
                    return Err(Error::Validation(ValidationError::field(
                        "name",
                        "category with this name and kind already exists",
                    )));
                }

                let now = Utc::now().naive_utc();
                let category_db = CategoryDB {
                    id: new_category
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id,
                    name: new_category.name,
                    kind: new_category.kind.as_str().to_string(),
                    icon: new_category.icon,
                    color: new_category
                        .color
                        .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(categories::table)
                    .values(&category_db)
                    .returning(CategoryDB::as_returning())
                    .get_result::<CategoryDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn update_category(
        &self,
        user_id: String,
        category_id: String,
        update: CategoryUpdate,
    ) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let current = Self::get_owned(conn, &user_id, &category_id)?;

                // Re-check uniqueness against the values the row will end up
                // with, excluding the row itself.
                let next_name = update.name.clone().unwrap_or_else(|| current.name.clone());
                let next_kind = update
                    .kind
                    .map(|k| k.as_str().to_string())
                    .unwrap_or_else(|| current.kind.clone());
                if Self::name_taken(conn, &user_id, &next_name, &next_kind, Some(&category_id))? {
                    return Err(Error::Validation(ValidationError::field(
                        "name",
                        "category with this name and kind already exists",
                    )));
                }

                diesel::update(categories::table.find(&category_id))
                    .set((
                        categories::name.eq(next_name),
                        categories::kind.eq(next_kind),
                        update.icon.map(|v| categories::icon.eq(v)),
                        update.color.map(|v| categories::color.eq(v)),
                        update.is_active.map(|v| categories::is_active.eq(v)),
                        categories::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;

                Self::get_owned(conn, &user_id, &category_id)?.into_domain()
            })
            .await
    }

    async fn delete_category(&self, user_id: String, category_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // ON DELETE CASCADE removes dependent budgets and
                // ON DELETE SET NULL detaches transactions, all in this
                // one transaction.
                let affected = diesel::delete(
                    categories::table
                        .find(&category_id)
                        .filter(categories::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(category_id)));
                }
                Ok(affected)
            })
            .await
    }
}
