use shared::error::{AppError, AppResult};

use crate::model::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

impl User {
    /// Validates both fields on construction; an invalid input never
    /// produces a `User`.
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> AppResult<Self> {
        let user_id = user_id.into();
        let name = name.into();

        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError("userId cannot be empty".into()));
        }
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("name cannot be empty".into()));
        }

        Ok(Self {
            user_id: UserId::new(user_id),
            name,
        })
    }
}
