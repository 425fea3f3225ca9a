/*
 * Responsibility
 * - 環境変数の読み込み (AUTH_ISSUER, AUTH_SIGNING_SECRET, DATABASE_URL など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 署名鍵は Debug に出さない
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::services::auth::token_codec::DEFAULT_VALIDITY_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Symmetric HMAC key shared by token issuance and verification.
///
/// Loaded once at start-up and never rotated while the process runs.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Invalid("AUTH_SIGNING_SECRET"));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Transport limits applied by `middleware::http`.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub issuer: String,
    pub signing_secret: SigningSecret,
    pub access_token_validity: TimeDelta,

    // None => users are kept in memory for the lifetime of the process
    pub database_url: Option<String>,

    pub http_limits: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. Unset keys take their default;
    /// set but unparsable (or zero) values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or("PORT", &lookup, 8080)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let issuer = lookup("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        if issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_ISSUER"));
        }

        let signing_secret = lookup("AUTH_SIGNING_SECRET")
            .ok_or(ConfigError::Missing("AUTH_SIGNING_SECRET"))
            .and_then(SigningSecret::new)?;

        let ttl_seconds: i64 = parse_or(
            "ACCESS_TOKEN_TTL_SECONDS",
            &lookup,
            DEFAULT_VALIDITY_SECONDS,
        )?;
        let access_token_validity = TimeDelta::try_seconds(ttl_seconds)
            .filter(|d| *d > TimeDelta::zero())
            .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?;

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let defaults = HttpLimits::default();
        let timeout_seconds: u64 = parse_or(
            "HTTP_REQUEST_TIMEOUT_SECONDS",
            &lookup,
            defaults.request_timeout.as_secs(),
        )?;
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECONDS"));
        }
        let body_limit_bytes: usize =
            parse_or("HTTP_BODY_LIMIT_BYTES", &lookup, defaults.body_limit_bytes)?;
        if body_limit_bytes == 0 {
            return Err(ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"));
        }

        Ok(Self {
            addr,
            app_env,
            issuer,
            signing_secret,
            access_token_validity,
            database_url,
            http_limits: HttpLimits {
                request_timeout: Duration::from_secs(timeout_seconds),
                body_limit_bytes,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
