use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::categories::{
    Category, CategoryFilters, CategoryRepositoryTrait, CategoryService, CategoryServiceTrait,
    CategoryUpdate, NewCategory,
};
use crate::constants::DEFAULT_CATEGORY_COLOR;
use crate::errors::{Error, Result, ValidationError};
use crate::types::{FlowKind, PageMeta, Paginated};

fn stamp() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-06-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// In-memory repository emulating the store's uniqueness rule.
struct MockCategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl MockCategoryRepository {
    fn new() -> Self {
        Self {
            categories: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for MockCategoryRepository {
    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.categories
            .read()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.id == category_id)
            .cloned()
            .ok_or_else(|| {
                Error::Database(crate::errors::DatabaseError::NotFound(
                    category_id.to_string(),
                ))
            })
    }

    fn list(&self, user_id: &str, _filters: &CategoryFilters) -> Result<Paginated<Category>> {
        let data: Vec<Category> = self
            .categories
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        let total = data.len() as i64;
        Ok(Paginated {
            data,
            meta: PageMeta {
                total_row_count: total,
                page: 1,
                page_size: 50,
            },
        })
    }

    async fn insert_new_category(
        &self,
        user_id: String,
        new_category: NewCategory,
    ) -> Result<Category> {
        let mut categories = self.categories.write().unwrap();
        if categories.iter().any(|c| {
            c.user_id == user_id && c.name == new_category.name && c.kind == new_category.kind
        }) {
            return Err(Error::Validation(ValidationError::field(
                "name",
                "category with this name and kind already exists",
            )));
        }
        let category = Category {
            id: new_category.id.unwrap_or_else(|| "cat-1".to_string()),
            user_id,
            name: new_category.name,
            kind: new_category.kind,
            icon: new_category.icon,
            color: new_category
                .color
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            is_active: true,
            created_at: stamp(),
            updated_at: stamp(),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        _user_id: String,
        _category_id: String,
        _update: CategoryUpdate,
    ) -> Result<Category> {
        unimplemented!()
    }

    async fn delete_category(&self, _user_id: String, _category_id: String) -> Result<usize> {
        unimplemented!()
    }
}

fn make_service() -> CategoryService {
    CategoryService::new(Arc::new(MockCategoryRepository::new()))
}

#[tokio::test]
async fn test_create_category_trims_name() {
    let service = make_service();
    let created = service
        .create_category(
            "user-1".to_string(),
            NewCategory {
                id: None,
                name: "  Groceries ".to_string(),
                kind: FlowKind::Expense,
                icon: None,
                color: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Groceries");
    assert_eq!(created.color, DEFAULT_CATEGORY_COLOR);
}

#[tokio::test]
async fn test_create_category_blank_name_rejected() {
    let service = make_service();
    let err = service
        .create_category(
            "user-1".to_string(),
            NewCategory {
                id: None,
                name: "   ".to_string(),
                kind: FlowKind::Income,
                icon: None,
                color: None,
            },
        )
        .await
        .unwrap_err();
    match err {
        Error::Validation(ValidationError::Fields(fields)) => {
            assert_eq!(fields[0].field, "name");
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[tokio::test]
async fn test_create_category_invalid_color_rejected() {
    let service = make_service();
    let err = service
        .create_category(
            "user-1".to_string(),
            NewCategory {
                id: None,
                name: "Rent".to_string(),
                kind: FlowKind::Expense,
                icon: None,
                color: Some("red".to_string()),
            },
        )
        .await
        .unwrap_err();
    match err {
        Error::Validation(ValidationError::Fields(fields)) => {
            assert_eq!(fields[0].field, "color");
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[tokio::test]
async fn test_duplicate_name_and_kind_rejected() {
    let service = make_service();
    let new = |name: &str, kind: FlowKind| NewCategory {
        id: None,
        name: name.to_string(),
        kind,
        icon: None,
        color: None,
    };
    service
        .create_category("user-1".to_string(), new("Groceries", FlowKind::Expense))
        .await
        .unwrap();

    // Same name under the other kind is a different category
    service
        .create_category("user-1".to_string(), new("Groceries", FlowKind::Income))
        .await
        .unwrap();

    let err = service
        .create_category("user-1".to_string(), new("Groceries", FlowKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Fields(_))
    ));
}
