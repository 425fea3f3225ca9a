//! Authorization stage: consult the `RouteTable` before any handler runs.
//!
//! Applied around the whole router (fallback included) so that paths with no
//! handler and methods the router would answer with 405 are still denied here.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::info;

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::policy::Decision;
use crate::state::AppState;

pub fn apply(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, policy_middleware))
}

async fn policy_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let decision = {
        let auth_ctx = req.extensions().get::<AuthCtx>();
        let identity = auth_ctx.and_then(AuthCtx::identity);
        let decision = state
            .routes
            .decide(req.method(), req.uri().path(), identity);

        if decision != Decision::Permit {
            info!(
                method = %req.method(),
                path = req.uri().path(),
                subject = identity.map(|i| i.subject()),
                jti = auth_ctx.and_then(AuthCtx::token_id),
                ?decision,
                "request denied by route policy"
            );
        }
        decision
    };

    match decision {
        Decision::Permit => Ok(next.run(req).await),
        Decision::Unauthenticated => Err(AppError::Unauthorized),
        Decision::AuthorityDenied => Err(AppError::Forbidden),
    }
}
