/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - tokens: TokenCodec, users: UserService, routes: RouteTable
 * - Clone 前提で持つ (内部は Arc)
 * - 起動後は読み取り専用 (ロック不要)
 */
use std::sync::Arc;

use crate::services::auth::{TokenCodec, policy::RouteTable};
use crate::services::users::UserService;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub users: Arc<UserService>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(tokens: Arc<TokenCodec>, users: Arc<UserService>, routes: Arc<RouteTable>) -> Self {
        Self {
            tokens,
            users,
            routes,
        }
    }
}
