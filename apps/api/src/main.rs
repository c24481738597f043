mod admin;
mod config;
mod documents;
mod errors;
mod export;
mod extraction;
mod llm_client;
mod models;
mod recruitment;
mod render;
mod routes;
mod sales;
mod session;
mod state;

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::credentials::CredentialStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Structured logging to stdout, plus errors appended to the error log file
    let error_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.error_log_path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(error_log))
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    info!("Starting TalentStream API v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.output_dir)?;
    info!("Writing generated files to {}", config.output_dir.display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Seed accounts are hashed once; sessions copy them
    let seed_users = CredentialStore::seeded(&config.seed_password, config.bcrypt_cost)?;
    info!("Seeded {} accounts", seed_users.usernames().len());

    let state = AppState::new(config.clone(), Arc::new(llm), seed_users);

    // Idle sessions are swept once a minute
    session::spawn_sweeper(state.sessions.clone(), Duration::from_secs(60));
    info!("Sessions expire after {}s idle", config.session_idle_secs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
