/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (TokenCodec, UserDirectory, UserService, RouteTable)
 * - Router 組み立て: routes → policy → access → security headers → http
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{self, auth::access, auth::policy};
use crate::repos::{InMemoryUserDirectory, PgUserDirectory, UserDirectory};
use crate::services::auth::{build_token_codec, policy::RouteTable};
use crate::services::users::UserService;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,authgate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting authgate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = middleware::http::apply(build_router(state), config.http_limits);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("authgate stopped");
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let tokens = build_token_codec(config);

    let directory: Arc<dyn UserDirectory> = match &config.database_url {
        Some(url) => {
            let directory = PgUserDirectory::connect(url)
                .await
                .context("failed to open user directory")?;
            tracing::info!("user directory: postgres");
            Arc::new(directory)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Arc::new(InMemoryUserDirectory::new())
        }
    };

    let users = Arc::new(UserService::new(directory, tokens.clone()));

    Ok(AppState::new(tokens, users, Arc::new(RouteTable::gateway())))
}

/// Routes wrapped by the two auth stages.
///
/// Layer order matters: the last `apply` runs first, so a request goes
/// access (authentication) → policy (authorization) → handler.
pub fn build_router(state: AppState) -> Router {
    let router = api::routes().with_state(state.clone());
    let router = policy::apply(router, state.clone());
    let router = access::apply(router, state);

    middleware::security_headers::apply(router)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving rather than exiting at once.
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
