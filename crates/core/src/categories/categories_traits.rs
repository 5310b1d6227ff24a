use async_trait::async_trait;

use crate::categories::categories_model::{
    Category, CategoryFilters, CategoryUpdate, NewCategory,
};
use crate::errors::Result;
use crate::types::Paginated;

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category>;
    fn list(&self, user_id: &str, filters: &CategoryFilters) -> Result<Paginated<Category>>;
    async fn insert_new_category(&self, user_id: String, new_category: NewCategory)
        -> Result<Category>;
    async fn update_category(
        &self,
        user_id: String,
        category_id: String,
        update: CategoryUpdate,
    ) -> Result<Category>;
    /// Deletes the category, its budgets, and detaches its transactions,
    /// all inside one transaction.
    async fn delete_category(&self, user_id: String, category_id: String) -> Result<usize>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    fn list_categories(
        &self,
        user_id: &str,
        filters: &CategoryFilters,
    ) -> Result<Paginated<Category>>;
    async fn create_category(&self, user_id: String, new_category: NewCategory)
        -> Result<Category>;
    async fn update_category(
        &self,
        user_id: String,
        category_id: String,
        update: CategoryUpdate,
    ) -> Result<Category>;
    async fn delete_category(&self, user_id: String, category_id: String) -> Result<usize>;
}
