use async_trait::async_trait;
use chrono::NaiveDate;

use crate::budgets::budgets_model::{
    Budget, BudgetComparison, BudgetFilters, BudgetOverview, BudgetUpdate, BudgetWithCategory,
    NewBudget,
};
use crate::errors::Result;
use crate::types::Paginated;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
    fn list(&self, user_id: &str, filters: &BudgetFilters) -> Result<Paginated<Budget>>;
    /// All budgets for one (user, month, year) joined with category names.
    fn list_for_period(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<BudgetWithCategory>>;
    /// The (user, category, month, year) uniqueness check runs inside the
    /// same transaction as the insert.
    async fn insert_new_budget(&self, user_id: String, new_budget: NewBudget) -> Result<Budget>;
    async fn update_allocated_amount(
        &self,
        user_id: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn delete_budget(&self, user_id: String, budget_id: String) -> Result<usize>;
}

/// Trait for budget service operations, including the read-only
/// spend-vs-budget aggregation views.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
    fn list_budgets(&self, user_id: &str, filters: &BudgetFilters) -> Result<Paginated<Budget>>;
    async fn create_budget(&self, user_id: String, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(
        &self,
        user_id: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn delete_budget(&self, user_id: String, budget_id: String) -> Result<usize>;

    /// Spend progress for every budget of the month. `today` supplies the
    /// default month/year from the caller's clock.
    fn current(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<BudgetOverview>;

    /// Budget-vs-actual comparison with overall totals and over/under tags.
    fn comparison(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<BudgetComparison>;
}
