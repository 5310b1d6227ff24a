use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::categories_model::{Category, CategoryFilters, CategoryUpdate, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{FieldIssue, Result};
use crate::types::Paginated;
use crate::validation::{check_not_blank, require_valid};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        CategoryService { repository }
    }

    fn check_color(color: Option<&str>) -> Option<FieldIssue> {
        let color = color?;
        if color.len() == 7 && color.starts_with('#') && color[1..].chars().all(|c| c.is_ascii_hexdigit())
        {
            None
        } else {
            Some(FieldIssue::new("color", "must be a #RRGGBB hex color"))
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.repository.get_by_id(user_id, category_id)
    }

    fn list_categories(
        &self,
        user_id: &str,
        filters: &CategoryFilters,
    ) -> Result<Paginated<Category>> {
        self.repository.list(user_id, filters)
    }

    async fn create_category(
        &self,
        user_id: String,
        mut new_category: NewCategory,
    ) -> Result<Category> {
        new_category.name = new_category.name.trim().to_string();
        let issues = [
            check_not_blank("name", &new_category.name),
            Self::check_color(new_category.color.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        require_valid(issues)?;

        debug!(
            "Creating {} category '{}' for user {}",
            new_category.kind, new_category.name, user_id
        );
        // The (user, name, kind) uniqueness check lives in the repository
        // write transaction; a duplicate surfaces as a field error.
        self.repository
            .insert_new_category(user_id, new_category)
            .await
    }

    async fn update_category(
        &self,
        user_id: String,
        category_id: String,
        mut update: CategoryUpdate,
    ) -> Result<Category> {
        if let Some(name) = update.name.take() {
            let name = name.trim().to_string();
            require_valid(check_not_blank("name", &name).into_iter().collect())?;
            update.name = Some(name);
        }
        require_valid(
            Self::check_color(update.color.as_deref())
                .into_iter()
                .collect(),
        )?;

        self.repository
            .update_category(user_id, category_id, update)
            .await
    }

    async fn delete_category(&self, user_id: String, category_id: String) -> Result<usize> {
        debug!("Deleting category {} for user {}", category_id, user_id);
        self.repository.delete_category(user_id, category_id).await
    }
}
