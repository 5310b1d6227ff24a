use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Double};
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack_core::errors::{DatabaseError, Error};
use fintrack_core::transactions::{
    CategorySpend, NewTransaction, SummaryRow, Transaction, TransactionFilters,
    TransactionRepositoryTrait, TransactionUpdate,
};
use fintrack_core::types::{FlowKind, PageMeta, Paginated};
use fintrack_core::Result;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{categories, transactions};
use crate::utils::{page_window, parse_amount};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TransactionRepository { pool, writer }
    }

    fn get_owned(
        conn: &mut SqliteConnection,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<TransactionDB> {
        transactions::table
            .find(transaction_id)
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(transaction_id.to_string())))
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        Self::get_owned(&mut conn, user_id, transaction_id)?.into_domain()
    }

    fn list(&self, user_id: &str, filters: &TransactionFilters) -> Result<Paginated<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size, offset) = page_window(filters.page, filters.page_size);

        let base_query = || {
            let mut query = transactions::table
                .filter(transactions::user_id.eq(user_id))
                .into_boxed();
            if let Some(kind) = filters.kind {
                query = query.filter(transactions::kind.eq(kind.as_str()));
            }
            if let Some(ref category_id) = filters.category_id {
                query = query.filter(transactions::category_id.eq(category_id));
            }
            if let Some(start_date) = filters.start_date {
                query = query.filter(transactions::date.ge(start_date));
            }
            if let Some(end_date) = filters.end_date {
                query = query.filter(transactions::date.le(end_date));
            }
            // Amounts live in a TEXT column; compare numerically via CAST.
            if let Some(min_amount) = filters.min_amount {
                query = query.filter(
                    sql::<Bool>("CAST(amount AS REAL) >= ")
                        .bind::<Double, _>(min_amount.to_f64().unwrap_or(0.0)),
                );
            }
            if let Some(max_amount) = filters.max_amount {
                query = query.filter(
                    sql::<Bool>("CAST(amount AS REAL) <= ")
                        .bind::<Double, _>(max_amount.to_f64().unwrap_or(0.0)),
                );
            }
            if let Some(ref search) = filters.search {
                query = query.filter(transactions::description.like(format!("%{search}%")));
            }
            query
        };

        let total_row_count: i64 = base_query().count().get_result(&mut conn).into_core()?;

        let mut query = base_query();
        query = match filters.sort {
            Some(ref sort) => match (sort.id.as_str(), sort.desc) {
                ("date", false) => {
                    query.order((transactions::date.asc(), transactions::created_at.asc()))
                }
                ("date", true) => {
                    query.order((transactions::date.desc(), transactions::created_at.desc()))
                }
                ("amount", false) => query.order(sql::<Double>("CAST(amount AS REAL) ASC")),
                ("amount", true) => query.order(sql::<Double>("CAST(amount AS REAL) DESC")),
                ("createdAt", false) => query.order(transactions::created_at.asc()),
                ("createdAt", true) => query.order(transactions::created_at.desc()),
                _ => query.order((transactions::date.desc(), transactions::created_at.desc())),
            },
            None => query.order((transactions::date.desc(), transactions::created_at.desc())),
        };

        let rows = query
            .select(TransactionDB::as_select())
            .limit(page_size)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        Ok(Paginated {
            data: rows
                .into_iter()
                .map(TransactionDB::into_domain)
                .collect::<Result<Vec<_>>>()?,
            meta: PageMeta {
                total_row_count,
                page,
                page_size,
            },
        })
    }

    fn summary_rows(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SummaryRow>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .left_join(categories::table)
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::date.between(start_date, end_date))
            .select((
                categories::name.nullable(),
                transactions::kind,
                transactions::amount,
            ))
            .load::<(Option<String>, String, String)>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|(category_name, kind, amount)| {
                let kind = kind.parse::<FlowKind>().map_err(|_| {
                    Error::Database(DatabaseError::Internal(format!(
                        "transaction row has corrupt kind '{kind}'"
                    )))
                })?;
                Ok(SummaryRow {
                    category_name,
                    kind,
                    amount: parse_amount(&amount, "amount"),
                })
            })
            .collect()
    }

    fn expense_totals_by_category(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CategorySpend>> {
        let mut conn = get_connection(&self.pool)?;
        // One query for the whole period; the per-category fold runs on
        // exact Decimals in Rust rather than on SQLite's float SUM.
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::kind.eq(FlowKind::Expense.as_str()))
            .filter(transactions::date.between(start_date, end_date))
            .select((transactions::category_id, transactions::amount))
            .load::<(Option<String>, String)>(&mut conn)
            .into_core()?;

        let mut totals: HashMap<Option<String>, Decimal> = HashMap::new();
        for (category_id, amount) in rows {
            *totals.entry(category_id).or_insert(Decimal::ZERO) +=
                parse_amount(&amount, "amount");
        }
        Ok(totals
            .into_iter()
            .map(|(category_id, total)| CategorySpend { category_id, total })
            .collect())
    }

    async fn insert_new_transaction(
        &self,
        user_id: String,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let now = Utc::now().naive_utc();
                let transaction_db = TransactionDB {
                    id: new_transaction
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id,
                    category_id: new_transaction.category_id,
                    kind: new_transaction.kind.as_str().to_string(),
                    amount: new_transaction.amount.to_string(),
                    description: new_transaction.description,
                    date: new_transaction.date,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(transactions::table)
                    .values(&transaction_db)
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn update_transaction(
        &self,
        user_id: String,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let affected = diesel::update(
                    transactions::table
                        .find(&transaction_id)
                        .filter(transactions::user_id.eq(&user_id)),
                )
                .set((
                    transactions::category_id.eq(update.category_id),
                    transactions::kind.eq(update.kind.as_str()),
                    transactions::amount.eq(update.amount.to_string()),
                    transactions::description.eq(update.description),
                    transactions::date.eq(update.date),
                    transactions::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(transaction_id)));
                }
                Self::get_owned(conn, &user_id, &transaction_id)?.into_domain()
            })
            .await
    }

    async fn delete_transaction(&self, user_id: String, transaction_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    transactions::table
                        .find(&transaction_id)
                        .filter(transactions::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(transaction_id)));
                }
                Ok(affected)
            })
            .await
    }
}
