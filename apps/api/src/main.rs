mod access;
mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod extractors;
mod jobs;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;
mod store;
mod tailoring;
mod users;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::HttpIdentityVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;

    // One HTTP client shared by the identity verifier and the tailoring backend
    let http = reqwest::Client::builder().build()?;

    let verifier = HttpIdentityVerifier::new(
        http.clone(),
        &config.identity_url,
        config.identity_public_key.clone(),
    );
    info!("Identity verifier initialized ({})", config.identity_url);

    let tailor = tailoring::from_config(&config, http);

    // Build app state
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        verifier: Arc::new(verifier),
        tailor,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
