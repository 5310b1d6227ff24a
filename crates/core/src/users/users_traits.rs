use async_trait::async_trait;

use crate::errors::Result;
use crate::users::users_model::{NewUser, User, UserCredentials, UserUpdate};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
    async fn insert_new_user(&self, new_user: NewUser) -> Result<User>;
    async fn update_profile(&self, user_id: String, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, user_id: String) -> Result<usize>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>>;
    async fn register(&self, new_user: NewUser) -> Result<User>;
    async fn update_profile(&self, user_id: String, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, user_id: String) -> Result<usize>;
}
