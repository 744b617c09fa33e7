mod config;
mod error;
mod middleware;
mod models;
mod pricing;
mod routes;
mod state;

use crate::config::Config;
use crate::state::AppState;
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_credits=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    let port = config.port;
    tracing::info!(rates = %config.rates_source, "Credit rates loaded");

    // Load templates
    let tera = tera::Tera::new(&config.templates_glob)
        .with_context(|| format!("loading templates from {}", config.templates_glob))?;
    if !tera
        .get_template_names()
        .any(|name| name == routes::credits::CALCULATOR_TEMPLATE)
    {
        anyhow::bail!(
            "{} not found under {}",
            routes::credits::CALCULATOR_TEMPLATE,
            config.templates_glob
        );
    }

    let state = AppState::new(config, tera)?;
    routes::health::init_start_time();

    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
