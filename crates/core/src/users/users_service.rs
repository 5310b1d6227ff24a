use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::users_model::{NewUser, User, UserCredentials, UserUpdate};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::Result;
use crate::validation::{check_not_blank, require_valid};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        UserService { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        self.repository.find_credentials_by_email(email)
    }

    async fn register(&self, mut new_user: NewUser) -> Result<User> {
        new_user.email = new_user.email.trim().to_lowercase();
        let issues = [
            check_not_blank("email", &new_user.email),
            if new_user.email.contains('@') {
                None
            } else {
                Some(crate::errors::FieldIssue::new(
                    "email",
                    "must be a valid email address",
                ))
            },
        ]
        .into_iter()
        .flatten()
        .collect();
        require_valid(issues)?;

        debug!("Registering user {}", new_user.email);
        // Duplicate-email detection happens inside the repository write so the
        // check and the insert share one transaction.
        self.repository.insert_new_user(new_user).await
    }

    async fn update_profile(&self, user_id: String, update: UserUpdate) -> Result<User> {
        self.repository.update_profile(user_id, update).await
    }

    async fn delete_user(&self, user_id: String) -> Result<usize> {
        self.repository.delete_user(user_id).await
    }
}
