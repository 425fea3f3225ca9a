/*
 * Responsibility
 * - /auth/sign-up, /auth/log-in の request/response DTO
 * - JSON のフィールド名 (camelCase) を固定する
 */
use serde::{Deserialize, Serialize};

use crate::services::users::{AuthResult, SignUp};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role_request: RoleRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    #[serde(default)]
    pub role_list_name: Vec<String>,
}

impl From<AuthCreateUserRequest> for SignUp {
    fn from(req: AuthCreateUserRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            roles: req.role_request.role_list_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthLoginRequest {
    pub username: String,
    pub password: String,
}

// Field order is part of the response contract: username, message, status, jwt.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub username: String,
    pub message: String,
    pub status: bool,
    pub jwt: String,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            username: result.username,
            message: result.message.to_string(),
            status: result.status,
            jwt: result.jwt,
        }
    }
}
