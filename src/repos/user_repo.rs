/*
 * Responsibility
 * - ユーザーディレクトリの抽象 (UserDirectory)
 * - 実装は memory_user_repo (開発/テスト) と pg_user_repo (PostgreSQL)
 * - パスワードはハッシュ済みの値だけを扱う
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::services::users::roles::Role;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Store a new user. Returns `RepoError::Conflict` if the username is taken.
    async fn insert(&self, user: NewUser) -> RepoResult<UserRecord>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>>;
}
