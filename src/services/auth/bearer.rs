//! `Authorization: Bearer <token>` parsing.

use axum::http::{HeaderMap, header};
use thiserror::Error;

const SCHEME: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential header")]
    MalformedCredentialHeader,
}

/// Extract the raw bearer token from the request headers.
///
/// - `Ok(None)`: no `Authorization` header (anonymous request)
/// - `Ok(Some(token))`: `Bearer` scheme (case-insensitive), single space, non-empty token
/// - `Err(_)`: header present but unusable (non-ASCII, other scheme, empty token, repeated header)
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, CredentialError> {
    let mut values = headers.get_all(header::AUTHORIZATION).iter();
    let Some(value) = values.next() else {
        return Ok(None);
    };
    if values.next().is_some() {
        return Err(CredentialError::MalformedCredentialHeader);
    }

    let value = value
        .to_str()
        .map_err(|_| CredentialError::MalformedCredentialHeader)?;

    parse_bearer(value).map(Some)
}

pub fn parse_bearer(value: &str) -> Result<&str, CredentialError> {
    let (scheme, token) = value
        .split_once(' ')
        .ok_or(CredentialError::MalformedCredentialHeader)?;

    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(CredentialError::MalformedCredentialHeader);
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(CredentialError::MalformedCredentialHeader);
    }

    Ok(token)
}
