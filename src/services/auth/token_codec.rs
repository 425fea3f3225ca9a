//! Session token issuance and verification (HS256 JWT).
//!
//! `jsonwebtoken` checks the signature, the algorithm and the issuer. The
//! `[nbf, exp]` window is checked here against an explicit clock so callers
//! (and tests) can pin "now".

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::SigningSecret;
use crate::services::auth::identity::Identity;

/// 30 minutes.
pub const DEFAULT_VALIDITY_SECONDS: i64 = 1_800;

const AUTHORITIES_SEPARATOR: char = ',';

#[derive(Debug, Error)]
pub enum TokenError {
    // Deliberately carries no detail: expired, forged and foreign tokens look the same.
    #[error("token invalid")]
    Invalid,

    #[error("subject must not be empty")]
    EmptySubject,

    #[error("authority {0:?} cannot be encoded in the authorities claim")]
    UnencodableAuthority(String),

    #[error("validity window must be positive")]
    NonPositiveValidity,

    #[error("expiry falls outside the representable time range")]
    ValidityOutOfRange,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    iss: String,
    sub: String,
    #[serde(default)]
    authorities: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    // Correlation only; tokens without one still verify.
    #[serde(default)]
    jti: String,
}

/// Everything a verified token says, for callers that want more than the identity.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub identity: Identity,
    pub token_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    validity: TimeDelta,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("validity", &self.validity)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret, issuer: impl Into<String>, validity: TimeDelta) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.validate_aud = false;
        // Temporal checks happen in `check_window` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            issuer,
            validity,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn validity(&self) -> TimeDelta {
        self.validity
    }

    /// Issue a token for `identity` valid for the configured window, starting now.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, self.validity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &Identity,
        validity: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if identity.subject().trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if validity <= TimeDelta::zero() {
            return Err(TokenError::NonPositiveValidity);
        }

        let authorities = encode_authorities(identity)?;
        let issued_at = now.timestamp();
        let expires_at = now
            .checked_add_signed(validity)
            .ok_or(TokenError::ValidityOutOfRange)?
            .timestamp();

        let claims = SessionClaims {
            iss: self.issuer.clone(),
            sub: identity.subject().to_string(),
            authorities,
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at,
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign session token");
            TokenError::Signing(e)
        })
    }

    /// Verify a raw token (scheme prefix already removed) and return its identity.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.inspect_at(token, now).map(|v| v.identity)
    }

    pub fn inspect(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.inspect_at(token, Utc::now())
    }

    /// Verify and return the full claim set.
    ///
    /// Every failure collapses into `TokenError::Invalid`; the underlying cause
    /// is only visible at debug level.
    pub fn inspect_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected by decoder");
                TokenError::Invalid
            })?;
        let claims = data.claims;

        check_window(&claims, now.timestamp())?;
        if claims.sub.trim().is_empty() {
            debug!("token rejected: empty subject");
            return Err(TokenError::Invalid);
        }

        Ok(VerifiedToken {
            identity: Identity::new(claims.sub, decode_authorities(&claims.authorities)),
            token_id: claims.jti,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

// Inclusive on both ends.
fn check_window(claims: &SessionClaims, now: i64) -> Result<(), TokenError> {
    if now < claims.nbf {
        debug!(nbf = claims.nbf, now, "token rejected: not yet valid");
        return Err(TokenError::Invalid);
    }
    if now > claims.exp {
        debug!(exp = claims.exp, now, "token rejected: expired");
        return Err(TokenError::Invalid);
    }
    Ok(())
}

fn encode_authorities(identity: &Identity) -> Result<String, TokenError> {
    for authority in identity.authorities() {
        if authority.is_empty()
            || authority.contains(AUTHORITIES_SEPARATOR)
            || authority.trim() != authority
        {
            return Err(TokenError::UnencodableAuthority(authority.clone()));
        }
    }

    // BTreeSet iteration is sorted, so the same set always encodes the same way.
    Ok(identity
        .authorities()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(","))
}

fn decode_authorities(claim: &str) -> impl Iterator<Item = &str> {
    claim
        .split(AUTHORITIES_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
