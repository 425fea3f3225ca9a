//! Account service: sign-up and log-in on top of a `UserDirectory`.
//!
//! Both operations end by issuing a session token through `TokenCodec`.

pub mod password;
pub mod roles;

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::{NewUser, UserDirectory};
use crate::services::auth::{Identity, TokenCodec};
use roles::{Role, granted_authorities};

pub const MAX_ROLES_PER_USER: usize = 3;

#[derive(Debug, Clone)]
pub struct SignUp {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

/// What sign-up and log-in hand back to the caller.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub username: String,
    pub message: &'static str,
    pub jwt: String,
    pub status: bool,
}

#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
    tokens: Arc<TokenCodec>,
    // Stand-in hash checked when there is no usable stored hash.
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserService {
    pub fn new(directory: Arc<dyn UserDirectory>, tokens: Arc<TokenCodec>) -> Self {
        Self {
            directory,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn create_user(&self, req: SignUp) -> Result<AuthResult, AppError> {
        require_non_blank("username", &req.username)?;
        require_non_blank("password", &req.password)?;
        if req.roles.len() > MAX_ROLES_PER_USER {
            return Err(AppError::invalid_request(format!(
                "The user cannot have more than {MAX_ROLES_PER_USER} roles"
            )));
        }

        let roles = req
            .roles
            .iter()
            .map(|name| name.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| AppError::invalid_request(e.to_string()))?;
        let roles: Vec<Role> = roles.into_iter().collect();

        let plain = req.password;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password(&plain))
                .await
                .map_err(|_| AppError::Internal)??;

        let user = self
            .directory
            .insert(NewUser {
                username: req.username,
                password_hash,
                roles,
            })
            .await?;

        info!(
            username = %user.username,
            roles = ?user.roles,
            created_at = %user.created_at,
            "user created"
        );

        let jwt = self.issue_for(&user.username, &user.roles)?;
        Ok(AuthResult {
            username: user.username,
            message: "User created successfully",
            jwt,
            status: true,
        })
    }

    /// Unknown user, wrong password and disabled account are indistinguishable to the caller.
    ///
    /// Every branch runs one argon2 verification, so response time does not
    /// reveal whether the username exists.
    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResult, AppError> {
        require_non_blank("username", username)?;
        require_non_blank("password", password)?;

        let user = self.directory.find_by_username(username).await?;
        let stored = match &user {
            Some(user) if user.enabled => Some(user.password_hash.clone()),
            _ => None,
        };
        let matches = self.password_matches(password, stored).await?;

        let user = match user {
            None => {
                warn!(username, "log-in rejected: unknown user");
                return Err(AppError::Unauthorized);
            }
            Some(user) if !user.enabled => {
                warn!(username, "log-in rejected: account disabled");
                return Err(AppError::Unauthorized);
            }
            Some(_) if !matches => {
                warn!(username, "log-in rejected: bad password");
                return Err(AppError::Unauthorized);
            }
            Some(user) => user,
        };

        let jwt = self.issue_for(&user.username, &user.roles)?;
        Ok(AuthResult {
            username: user.username,
            message: "User logged in successfully",
            jwt,
            status: true,
        })
    }

    /// `stored = None` checks against the dummy hash and never matches.
    async fn password_matches(
        &self,
        candidate: &str,
        stored: Option<String>,
    ) -> Result<bool, AppError> {
        let (stored, real) = match stored {
            Some(hash) => (hash, true),
            None => (self.dummy_hash().await?.to_string(), false),
        };

        let candidate = candidate.to_string();
        let matches =
            tokio::task::spawn_blocking(move || password::verify_password(&candidate, &stored))
                .await
                .map_err(|_| AppError::Internal)??;

        Ok(real && matches)
    }

    async fn dummy_hash(&self) -> Result<&str, AppError> {
        self.dummy_hash
            .get_or_try_init(|| async {
                let plain = Uuid::new_v4().to_string();
                let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
                    .await
                    .map_err(|_| AppError::Internal)??;
                Ok::<_, AppError>(hash)
            })
            .await
            .map(String::as_str)
    }

    fn issue_for(&self, username: &str, roles: &[Role]) -> Result<String, AppError> {
        let identity = Identity::new(username, granted_authorities(roles));
        Ok(self.tokens.issue(&identity)?)
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_request(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::config::SigningSecret;
    use crate::repos::error::RepoResult;
    use crate::repos::{InMemoryUserDirectory, UserRecord};

    /// Knows exactly one account, with the right password but switched off.
    struct DisabledAccount {
        record: UserRecord,
    }

    impl DisabledAccount {
        fn new(username: &str, plain: &str) -> Self {
            Self {
                record: UserRecord {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    password_hash: password::hash_password(plain).unwrap(),
                    roles: vec![Role::Admin],
                    enabled: false,
                    created_at: Utc::now(),
                },
            }
        }
    }

    #[async_trait]
    impl UserDirectory for DisabledAccount {
        async fn insert(&self, _user: NewUser) -> RepoResult<UserRecord> {
            unreachable!("read-only directory")
        }

        async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
            Ok((username == self.record.username).then(|| self.record.clone()))
        }
    }

    fn tokens() -> Arc<TokenCodec> {
        let secret = SigningSecret::new("user-service-test-secret").unwrap();
        Arc::new(TokenCodec::new(&secret, "TEST", TimeDelta::minutes(30)))
    }

    fn service() -> (UserService, Arc<TokenCodec>) {
        let tokens = tokens();
        let service = UserService::new(Arc::new(InMemoryUserDirectory::new()), tokens.clone());
        (service, tokens)
    }

    fn sign_up(username: &str, roles: &[&str]) -> SignUp {
        SignUp {
            username: username.to_string(),
            password: "1234".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn created_user_token_carries_role_authorities() {
        let (service, tokens) = service();
        let result = service.create_user(sign_up("alice", &["USER"])).await.unwrap();

        assert!(result.status);
        assert_eq!(result.username, "alice");
        assert_eq!(result.message, "User created successfully");

        let identity = tokens.verify(&result.jwt).unwrap();
        assert_eq!(identity.subject(), "alice");
        assert!(identity.has_authority("READ"));
        assert!(identity.has_authority("ROLE_USER"));
        assert!(!identity.has_authority("CREATE"));
    }

    #[tokio::test]
    async fn login_issues_a_fresh_token() {
        let (service, tokens) = service();
        service
            .create_user(sign_up("bob", &["ADMIN"]))
            .await
            .unwrap();

        let result = service.login_user("bob", "1234").await.unwrap();
        assert_eq!(result.message, "User logged in successfully");
        assert!(tokens.verify(&result.jwt).unwrap().has_authority("DELETE"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (service, _) = service();
        service.create_user(sign_up("carol", &[])).await.unwrap();

        assert!(matches!(
            service.login_user("carol", "nope").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            service.login_user("nobody", "1234").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn more_than_three_roles_is_rejected() {
        let (service, _) = service();
        let result = service
            .create_user(sign_up("dave", &["ADMIN", "USER", "INVITED", "DEVELOPER"]))
            .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let (service, _) = service();
        let result = service.create_user(sign_up("erin", &["ROOT"])).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(m)) if m.contains("ROOT")));
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected() {
        let (service, _) = service();
        let mut req = sign_up("   ", &[]);
        assert!(matches!(
            service.create_user(req.clone()).await,
            Err(AppError::InvalidRequest(_))
        ));

        req.username = "frank".to_string();
        req.password = " ".to_string();
        assert!(matches!(
            service.create_user(req).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.login_user("frank", "").await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_sign_up_conflicts() {
        let (service, _) = service();
        service.create_user(sign_up("gina", &[])).await.unwrap();
        assert!(matches!(
            service.create_user(sign_up("gina", &[])).await,
            Err(AppError::Conflict)
        ));
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in_even_with_the_right_password() {
        let directory = DisabledAccount::new("henry", "1234");
        let service = UserService::new(Arc::new(directory), tokens());

        assert!(matches!(
            service.login_user("henry", "1234").await,
            Err(AppError::Unauthorized)
        ));
        assert!(service.dummy_hash.initialized());
    }

    #[tokio::test]
    async fn unknown_user_still_runs_a_password_check() {
        let (service, _) = service();
        assert!(!service.dummy_hash.initialized());

        assert!(matches!(
            service.login_user("nobody", "1234").await,
            Err(AppError::Unauthorized)
        ));
        assert!(service.dummy_hash.initialized());
    }

    #[tokio::test]
    async fn dummy_hash_never_matches() {
        let (service, _) = service();
        let hash = service.dummy_hash().await.unwrap().to_string();

        assert!(hash.starts_with("$argon2"));
        assert!(!service.password_matches("1234", None).await.unwrap());
        assert!(!service.password_matches("", None).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_is_not_much_faster_than_a_wrong_password() {
        let (service, _) = service();
        service.create_user(sign_up("ivy", &[])).await.unwrap();
        // Warm the dummy hash so its one-off creation is not timed.
        let _ = service.login_user("nobody", "1234").await;

        let started = std::time::Instant::now();
        let _ = service.login_user("ivy", "wrong").await;
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        let _ = service.login_user("nobody", "wrong").await;
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 10 >= wrong_password,
            "unknown={unknown_user:?} wrong={wrong_password:?}"
        );
    }
}
