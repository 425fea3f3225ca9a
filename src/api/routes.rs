/*
 * Responsibility
 * - URL 構造を定義 (/auth/..., /method/...)
 * - ここに登録しても policy の RouteTable に載っていなければ 403 になる
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::api::handlers::{
    auth::{log_in, sign_up},
    method::{call_delete, call_get, call_post, call_put},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/log-in", post(log_in))
        .route("/method/get", get(call_get))
        .route("/method/post", post(call_post))
        .route("/method/put", put(call_put))
        .route("/method/delete", delete(call_delete))
}
