//! Authentication stage: bearer token → `AuthCtx` in request extensions.
//!
//! - No `Authorization` header: the request continues as `AuthCtx::Anonymous`.
//! - Malformed header or a token that fails verification: logged, then the
//!   request also continues as `AuthCtx::Anonymous`. The policy stage answers
//!   401 on protected routes; public routes (`POST /auth/**`) keep working.
//! - Valid token: `AuthCtx::Authenticated` for the rest of this request only.
//!
//! This stage never rejects a request by itself.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::api::extractors::AuthCtx;
use crate::services::auth::bearer;
use crate::state::AppState;

/// 認証ステージを Router 全体 (fallback 含む) に掛ける。
///
/// policy ステージより外側に置くこと (`policy::apply` の後に呼ぶ)。
pub fn apply(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_ctx = match bearer::bearer_token(req.headers()) {
        Ok(None) => AuthCtx::Anonymous,
        Ok(Some(token)) => match state.tokens.inspect(token) {
            Ok(verified) => {
                debug!(
                    subject = verified.identity.subject(),
                    jti = %verified.token_id,
                    iat = verified.issued_at,
                    exp = verified.expires_at,
                    "access token verified"
                );
                AuthCtx::Authenticated {
                    identity: verified.identity,
                    token_id: verified.token_id,
                }
            }
            Err(err) => {
                warn!(error = %err, path = req.uri().path(), "access token verification failed");
                AuthCtx::Anonymous
            }
        },
        Err(err) => {
            warn!(error = %err, path = req.uri().path(), "unusable authorization header");
            AuthCtx::Anonymous
        }
    };

    // middleware → policy / extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    next.run(req).await
}
