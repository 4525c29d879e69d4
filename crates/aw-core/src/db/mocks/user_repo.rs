//! In-memory user repository.

use super::MemoryStore;
use crate::auth::{Role, User};
use crate::db::error::DbError;
use crate::db::user_repo::UserRepository;
use async_trait::async_trait;
use uuid::Uuid;

/// Mock implementation of UserRepository over a shared [`MemoryStore`].
#[derive(Clone)]
pub struct MockUserRepository {
    store: MemoryStore,
}

impl MockUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: &User) -> Result<User, DbError> {
        let mut inner = self.store.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(DbError::Constraint(format!(
                "email already exists: {}",
                user.email
            )));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, DbError> {
        Ok(self.store.inner.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        Ok(self
            .store
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_reviewers(&self) -> Result<Vec<User>, DbError> {
        let inner = self.store.inner.read().await;
        let mut reviewers: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.active && u.role.has_min(Role::Reviewer))
            .cloned()
            .collect();
        reviewers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(reviewers)
    }

    async fn any_exist(&self) -> Result<bool, DbError> {
        Ok(!self.store.inner.read().await.users.is_empty())
    }
}
