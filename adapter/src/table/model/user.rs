use kernel::model::user::User;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub name: String,
}

impl From<&User> for UserRow {
    fn from(value: &User) -> Self {
        Self {
            user_id: value.user_id.as_str().to_string(),
            name: value.name.clone(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        User::new(value.user_id, value.name)
    }
}
