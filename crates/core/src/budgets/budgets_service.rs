use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::budgets_model::{
    month_bounds, Budget, BudgetComparison, BudgetFilters, BudgetOverview, BudgetProgress,
    BudgetStatus, BudgetUpdate, CategoryComparison, ComparisonTotals, NewBudget,
};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, FieldIssue, Result, ValidationError};
use crate::transactions::TransactionRepositoryTrait;
use crate::types::{FlowKind, Paginated};
use crate::validation::{
    check_amount_at_least, check_amount_scale, check_month, check_year, require_valid,
};

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    /// Plausible years for budget creation, from configuration.
    year_range: RangeInclusive<i32>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        year_range: RangeInclusive<i32>,
    ) -> Self {
        BudgetService {
            repository,
            category_repository,
            transaction_repository,
            year_range,
        }
    }

    /// spent / allocated * 100 rounded to two places, 0 when nothing is
    /// allocated. The result is display-only.
    fn percentage_used(spent: Decimal, allocated: Decimal) -> f64 {
        if allocated > Decimal::ZERO {
            (spent / allocated * Decimal::ONE_HUNDRED)
                .round_dp(DISPLAY_DECIMAL_PRECISION)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Resolves the requested period, defaulting to the caller's clock, and
    /// rejects months outside 1..=12 before any query runs.
    fn resolve_period(
        month: Option<i32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<(i32, i32)> {
        let month = month.unwrap_or(today.month() as i32);
        let year = year.unwrap_or(today.year());
        require_valid(check_month("month", month).into_iter().collect())?;
        Ok((month, year))
    }

    /// Per-category spend totals for the month, from one grouped query.
    fn spent_by_category(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<HashMap<Option<String>, Decimal>> {
        let (start, end) = month_bounds(month as u32, year).ok_or_else(|| {
            Error::Validation(ValidationError::field("month", "not a valid calendar month"))
        })?;
        let totals = self
            .transaction_repository
            .expense_totals_by_category(user_id, start, end)?;
        Ok(totals
            .into_iter()
            .map(|spend| (spend.category_id, spend.total))
            .collect())
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.repository.get_by_id(user_id, budget_id)
    }

    fn list_budgets(&self, user_id: &str, filters: &BudgetFilters) -> Result<Paginated<Budget>> {
        self.repository.list(user_id, filters)
    }

    async fn create_budget(&self, user_id: String, new_budget: NewBudget) -> Result<Budget> {
        let mut issues: Vec<FieldIssue> = [
            check_month("month", new_budget.month),
            check_year("year", new_budget.year, &self.year_range),
            check_amount_at_least("allocatedAmount", new_budget.allocated_amount, Decimal::ZERO),
            check_amount_scale("allocatedAmount", new_budget.allocated_amount),
        ]
        .into_iter()
        .flatten()
        .collect();

        match self
            .category_repository
            .get_by_id(&user_id, &new_budget.category_id)
        {
            Ok(category) if category.kind != FlowKind::Expense => issues.push(FieldIssue::new(
                "categoryId",
                "budgets can only be set for expense categories",
            )),
            Ok(_) => {}
            Err(_) => issues.push(FieldIssue::new("categoryId", "unknown category")),
        }
        require_valid(issues)?;

        debug!(
            "Creating budget for category {} {}/{} (user {})",
            new_budget.category_id, new_budget.month, new_budget.year, user_id
        );
        // Duplicate (category, month, year) detection happens inside the
        // repository write; a concurrent duplicate falls through to the
        // unique index and surfaces as a conflict.
        self.repository.insert_new_budget(user_id, new_budget).await
    }

    async fn update_budget(
        &self,
        user_id: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        let issues = [
            check_amount_at_least("allocatedAmount", update.allocated_amount, Decimal::ZERO),
            check_amount_scale("allocatedAmount", update.allocated_amount),
        ]
        .into_iter()
        .flatten()
        .collect();
        require_valid(issues)?;

        self.repository
            .update_allocated_amount(user_id, budget_id, update)
            .await
    }

    async fn delete_budget(&self, user_id: String, budget_id: String) -> Result<usize> {
        self.repository.delete_budget(user_id, budget_id).await
    }

    fn current(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<BudgetOverview> {
        let (month, year) = Self::resolve_period(month, year, today)?;
        let budgets = self.repository.list_for_period(user_id, month, year)?;
        let spent_by_category = self.spent_by_category(user_id, month, year)?;

        let budgets = budgets
            .into_iter()
            .map(|row| {
                let spent = spent_by_category
                    .get(&Some(row.budget.category_id.clone()))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                BudgetProgress {
                    spent_amount: spent,
                    remaining_amount: row.budget.allocated_amount - spent,
                    percentage_used: Self::percentage_used(spent, row.budget.allocated_amount),
                    category_name: row.category_name,
                    budget: row.budget,
                }
            })
            .collect();

        Ok(BudgetOverview {
            month,
            year,
            budgets,
        })
    }

    fn comparison(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<BudgetComparison> {
        let (month, year) = Self::resolve_period(month, year, today)?;
        let budgets = self.repository.list_for_period(user_id, month, year)?;
        let spent_by_category = self.spent_by_category(user_id, month, year)?;

        // Every expense in the month counts, including spending on
        // unbudgeted or deleted categories.
        let total_spent: Decimal = spent_by_category.values().copied().sum();
        let total_allocated: Decimal = budgets
            .iter()
            .map(|row| row.budget.allocated_amount)
            .sum();

        let by_category = budgets
            .into_iter()
            .map(|row| {
                let allocated = row.budget.allocated_amount;
                let spent = spent_by_category
                    .get(&Some(row.budget.category_id.clone()))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                CategoryComparison {
                    category: row.category_name,
                    allocated,
                    spent,
                    remaining: allocated - spent,
                    percentage_used: Self::percentage_used(spent, allocated),
                    status: if spent > allocated {
                        BudgetStatus::Over
                    } else {
                        BudgetStatus::Under
                    },
                }
            })
            .collect();

        Ok(BudgetComparison {
            period: format!("{month}/{year}"),
            overall: ComparisonTotals {
                total_allocated,
                total_spent,
                total_remaining: total_allocated - total_spent,
                percentage_used: Self::percentage_used(total_spent, total_allocated),
            },
            by_category,
        })
    }
}
