use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{id::UserId, user::User};
use kernel::repository::user::UserRepository;
use shared::error::AppResult;

use crate::table::{model::user::UserRow, user_pk, KvTable, TableRecord, SK_METADATA};

#[derive(new)]
pub struct UserRepositoryImpl {
    table: Arc<dyn KvTable>,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: User) -> AppResult<User> {
        let row = UserRow::from(&user);
        let record = TableRecord::new(
            user_pk(&user.user_id),
            SK_METADATA,
            serde_json::to_value(&row)?,
        );
        self.table.put(record).await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AppResult<Option<User>> {
        match self.table.get(&user_pk(user_id), SK_METADATA).await? {
            Some(record) => {
                let row: UserRow = record.payload_as()?;
                Ok(Some(row.try_into()?))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, user_id: &UserId) -> AppResult<bool> {
        Ok(self.find_by_id(user_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::memory::MemoryTable;

    fn repository() -> UserRepositoryImpl {
        UserRepositoryImpl::new(Arc::new(MemoryTable::new()))
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let repo = repository();
        let user = User::new("user123", "John Doe").unwrap();
        repo.create(user.clone()).await.unwrap();

        let found = repo.find_by_id(&UserId::from("user123")).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let repo = repository();
        let found = repo.find_by_id(&UserId::from("nonexistent")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn exists_reflects_creation() {
        let repo = repository();
        repo.create(User::new("user123", "John Doe").unwrap())
            .await
            .unwrap();

        assert!(repo.exists(&UserId::from("user123")).await.unwrap());
        assert!(!repo.exists(&UserId::from("nonexistent")).await.unwrap());
    }
}
