use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app_state::AppState;

mod app_state;
mod config;
mod domain;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./career-api/.env.local").ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,career_api=debug,tower_http=info")),
        )
        .with(fmt::layer())
        .init();

    let config = config::read_config().context("failed to read configuration")?;

    let connection_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy_with(config.database.with_db());

    if config.application.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&connection_pool)
            .await
            .context("failed to run database migrations")?;
    }

    let app_state = AppState::new(connection_pool, config.search.clone());
    let app = router::create(app_state, &config);

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
