use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use fintrack_core::budgets::{
    Budget, BudgetFilters, BudgetRepositoryTrait, BudgetUpdate, BudgetWithCategory, NewBudget,
};
use fintrack_core::errors::{DatabaseError, Error, ValidationError};
use fintrack_core::types::{PageMeta, Paginated};
use fintrack_core::Result;

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{budgets, categories};
use crate::utils::page_window;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;
        let budget_db = budgets::table
            .find(budget_id)
            .filter(budgets::user_id.eq(user_id))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(budget_id.to_string())))?;
        Ok(Budget::from(budget_db))
    }

    fn list(&self, user_id: &str, filters: &BudgetFilters) -> Result<Paginated<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size, offset) = page_window(filters.page, filters.page_size);

        let base_query = || {
            let mut query = budgets::table
                .filter(budgets::user_id.eq(user_id))
                .into_boxed();
            if let Some(month) = filters.month {
                query = query.filter(budgets::month.eq(month));
            }
            if let Some(year) = filters.year {
                query = query.filter(budgets::year.eq(year));
            }
            if let Some(ref category_id) = filters.category_id {
                query = query.filter(budgets::category_id.eq(category_id));
            }
            query
        };

        let total_row_count: i64 = base_query().count().get_result(&mut conn).into_core()?;

        let mut query = base_query();
        query = match filters.sort {
            Some(ref sort) => match (sort.id.as_str(), sort.desc) {
                ("month", false) => query.order((budgets::year.asc(), budgets::month.asc())),
                ("month", true) => query.order((budgets::year.desc(), budgets::month.desc())),
                ("createdAt", false) => query.order(budgets::created_at.asc()),
                ("createdAt", true) => query.order(budgets::created_at.desc()),
                _ => query.order((budgets::year.desc(), budgets::month.desc())),
            },
            None => query.order((budgets::year.desc(), budgets::month.desc())),
        };

        let rows = query
            .select(BudgetDB::as_select())
            .limit(page_size)
            .offset(offset)
            .load::<BudgetDB>(&mut conn)
            .into_core()?;

        Ok(Paginated {
            data: rows.into_iter().map(Budget::from).collect(),
            meta: PageMeta {
                total_row_count,
                page,
                page_size,
            },
        })
    }

    fn list_for_period(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<BudgetWithCategory>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .inner_join(categories::table)
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::month.eq(month))
            .filter(budgets::year.eq(year))
            .select((BudgetDB::as_select(), categories::name))
            .order(categories::name.asc())
            .load::<(BudgetDB, String)>(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(|(budget_db, category_name)| BudgetWithCategory {
                budget: Budget::from(budget_db),
                category_name,
            })
            .collect())
    }

    async fn insert_new_budget(&self, user_id: String, new_budget: NewBudget) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                // Pre-check and insert share this transaction; a concurrent
                // duplicate that slips past still hits the unique index and
                // surfaces as a conflict, never a second row.
                let existing: i64 = budgets::table
                    .filter(budgets::user_id.eq(&user_id))
                    .filter(budgets::category_id.eq(&new_budget.category_id))
                    .filter(budgets::month.eq(new_budget.month))
                    .filter(budgets::year.eq(new_budget.year))
                    .count()
                    .get_result(conn)
                    .into_core()?;
                if existing > 0 {
                    return Err(Error::Validation(ValidationError::field(
                        "categoryId",
                        "budget already exists for this category and period",
                    )));
                }

                let now = Utc::now().naive_utc();
                let budget_db = BudgetDB {
                    id: new_budget
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id,
                    category_id: new_budget.category_id,
                    month: new_budget.month,
                    year: new_budget.year,
                    allocated_amount: new_budget.allocated_amount.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                let result_db = diesel::insert_into(budgets::table)
                    .values(&budget_db)
                    .returning(BudgetDB::as_returning())
                    .get_result::<BudgetDB>(conn)
                    .into_core()?;
                Ok(Budget::from(result_db))
            })
            .await
    }

    async fn update_allocated_amount(
        &self,
        user_id: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                // Only the allocation moves; category, month and year are
                // the budget's identity and stay as created.
                let affected = diesel::update(
                    budgets::table
                        .find(&budget_id)
                        .filter(budgets::user_id.eq(&user_id)),
                )
                .set((
                    budgets::allocated_amount.eq(update.allocated_amount.to_string()),
                    budgets::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(budget_id)));
                }
                let result_db = budgets::table
                    .find(&budget_id)
                    .select(BudgetDB::as_select())
                    .first::<BudgetDB>(conn)
                    .into_core()?;
                Ok(Budget::from(result_db))
            })
            .await
    }

    async fn delete_budget(&self, user_id: String, budget_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    budgets::table
                        .find(&budget_id)
                        .filter(budgets::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(budget_id)));
                }
                Ok(affected)
            })
            .await
    }
}
