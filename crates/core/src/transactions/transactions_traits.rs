use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::transactions::transactions_model::{
    NewTransaction, SummaryRow, Transaction, TransactionFilters, TransactionSummary,
    TransactionUpdate,
};
use crate::types::Paginated;

/// Per-category expense total for one period, produced by a single grouped
/// query. `category_id` is None for spending whose category was deleted.
#[derive(Debug, Clone)]
pub struct CategorySpend {
    pub category_id: Option<String>,
    pub total: Decimal,
}

/// Trait for transaction repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list(&self, user_id: &str, filters: &TransactionFilters) -> Result<Paginated<Transaction>>;
    /// Raw rows for the dashboard summary, one query for the whole range.
    fn summary_rows(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SummaryRow>>;
    /// EXPENSE totals per category in the range, one grouped query. Feeds
    /// the budget aggregation without a query per budget row.
    fn expense_totals_by_category(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CategorySpend>>;
    async fn insert_new_transaction(
        &self,
        user_id: String,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: String,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: String, transaction_id: String) -> Result<usize>;
}

/// Trait for transaction service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Paginated<Transaction>>;
    /// Dashboard summary. `today` is the caller's clock; the range defaults
    /// to the first of today's month through today.
    fn summary(
        &self,
        user_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<TransactionSummary>;
    async fn create_transaction(
        &self,
        user_id: String,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: String,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: String, transaction_id: String) -> Result<usize>;
}
