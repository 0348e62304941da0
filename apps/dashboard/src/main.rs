use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard::config::Config;
use dashboard::llm_client::GeminiClient;
use dashboard::routes::build_router;
use dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast when GOOGLE_API_KEY is missing
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting consulting dashboard v{}", env!("CARGO_PKG_VERSION"));

    let gemini = GeminiClient::new(config.google_api_key.clone())?;
    info!(
        "Gemini client initialized (plan: {}, chat: {})",
        config.model_pro, config.model_flash
    );

    info!("Profiles: {}", config.data_file.display());
    info!("Documents: {}", config.docs_dir.display());
    info!("Subscribers: {}", config.subscribers_file.display());

    let state = AppState::new(config.clone(), Arc::new(gemini));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
