pub(crate) mod api;
mod cli;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

pub use cli::run_cli;

use crate::core::{config::Settings, redis::RedisHandle, state::AppState, telemetry};
use crate::services::auth_provider::AuthClient;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let redis = RedisHandle::new(settings.redis().redis_url());
    if let Err(err) = redis.connect().await {
        tracing::error!(error = %err, "Failed to connect to Redis; rate limiting disabled");
    } else {
        tracing::info!("Redis connected successfully");
    }

    if settings.auth().provider_url.is_empty() {
        tracing::warn!("AUTH_PROVIDER_URL is not set; sign-in and sign-up are unavailable");
    }
    if settings.auth().admin_emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; every signed-in user has admin access");
    }

    let auth = AuthClient::from_settings(&settings)?;
    let state = AppState::new(settings, db_pool, redis.clone(), auth);

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        "Assessment API listening"
    );

    let result =
        axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await;

    redis.disconnect().await;
    tracing::info!("Redis disconnected");

    result?;

    Ok(())
}
