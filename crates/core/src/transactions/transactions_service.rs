use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use super::transactions_model::{
    CategoryBreakdown, NewTransaction, SummaryPeriod, Transaction, TransactionFilters,
    TransactionSummary, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::constants::MIN_TRANSACTION_AMOUNT;
use crate::errors::{FieldIssue, Result};
use crate::types::{FlowKind, Paginated};
use crate::validation::{
    check_amount_at_least, check_amount_scale, check_kind_matches, require_valid,
};

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        TransactionService {
            repository,
            category_repository,
        }
    }

    /// Shared write-time validation for create and update: amount floor and
    /// scale, and the category ownership + kind cross-check.
    fn validate_write(
        &self,
        user_id: &str,
        category_id: Option<&str>,
        kind: FlowKind,
        amount: Decimal,
    ) -> Result<()> {
        let min = Decimal::from_str(MIN_TRANSACTION_AMOUNT).unwrap_or(Decimal::ONE);
        let mut issues: Vec<FieldIssue> = [
            check_amount_at_least("amount", amount, min),
            check_amount_scale("amount", amount),
        ]
        .into_iter()
        .flatten()
        .collect();

        if let Some(category_id) = category_id {
            match self.category_repository.get_by_id(user_id, category_id) {
                Ok(category) => {
                    issues.extend(check_kind_matches("categoryId", category.kind, kind));
                }
                Err(_) => issues.push(FieldIssue::new("categoryId", "unknown category")),
            }
        }

        require_valid(issues)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(user_id, transaction_id)
    }

    fn list_transactions(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Paginated<Transaction>> {
        self.repository.list(user_id, filters)
    }

    fn summary(
        &self,
        user_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<TransactionSummary> {
        let start_date = start_date.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        let end_date = end_date.unwrap_or(today);

        let rows = self.repository.summary_rows(user_id, start_date, end_date)?;

        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut groups: HashMap<(Option<String>, FlowKind), (Decimal, i64)> = HashMap::new();

        for row in &rows {
            match row.kind {
                FlowKind::Income => total_income += row.amount,
                FlowKind::Expense => total_expenses += row.amount,
            }
            let entry = groups
                .entry((row.category_name.clone(), row.kind))
                .or_insert((Decimal::ZERO, 0));
            entry.0 += row.amount;
            entry.1 += 1;
        }

        let mut category_breakdown: Vec<CategoryBreakdown> = groups
            .into_iter()
            .map(|((category, kind), (total, count))| CategoryBreakdown {
                category,
                kind,
                total,
                count,
            })
            .collect();
        // Largest totals first; name as tie-breaker for a stable order.
        category_breakdown.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(TransactionSummary {
            period: SummaryPeriod {
                start_date,
                end_date,
            },
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            transaction_count: rows.len() as i64,
            category_breakdown,
        })
    }

    async fn create_transaction(
        &self,
        user_id: String,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        self.validate_write(
            &user_id,
            new_transaction.category_id.as_deref(),
            new_transaction.kind,
            new_transaction.amount,
        )?;
        debug!(
            "Recording {} transaction of {} for user {}",
            new_transaction.kind, new_transaction.amount, user_id
        );
        self.repository
            .insert_new_transaction(user_id, new_transaction)
            .await
    }

    async fn update_transaction(
        &self,
        user_id: String,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        self.validate_write(
            &user_id,
            update.category_id.as_deref(),
            update.kind,
            update.amount,
        )?;
        self.repository
            .update_transaction(user_id, transaction_id, update)
            .await
    }

    async fn delete_transaction(&self, user_id: String, transaction_id: String) -> Result<usize> {
        self.repository
            .delete_transaction(user_id, transaction_id)
            .await
    }
}
