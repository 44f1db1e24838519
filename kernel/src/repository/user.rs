use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{id::UserId, user::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    // Persist a user keyed by its id. Uniqueness is the caller's concern.
    async fn create(&self, user: User) -> AppResult<User>;
    // Missing users are a normal `None`, never an error.
    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>>;
    async fn exists(&self, user_id: &UserId) -> AppResult<bool>;
}
