use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{NewUser, UserDirectory, UserRecord};

/// Process-local directory, used when no `DATABASE_URL` is configured.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn insert(&self, user: NewUser) -> RepoResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepoError::Conflict);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            roles: user.roles,
            enabled: true,
            created_at: Utc::now(),
        };
        users.insert(record.username.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
