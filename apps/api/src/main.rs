mod catalog;
mod config;
mod errors;
mod llm_client;
mod matching;
mod narrative;
mod routes;
mod skills;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::{ChatBackend, LlmClient};
use crate::routes::build_router;
use crate::skills::normalizer::{Normalizer, NormalizerSettings};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on malformed or out-of-range values
    let config = Config::from_env()?;

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

    info!("Starting Elevatr API v{}", env!("CARGO_PKG_VERSION"));

    // Missing or malformed catalog files degrade to empty collections
    let catalog = Arc::new(Catalog::load(&config.resources_dir));

    let normalizer = Arc::new(Normalizer::new(
        Arc::clone(&catalog.vocabulary),
        NormalizerSettings {
            threshold: config.skill_match_threshold,
            fallback_cutoff: config.fuzzy_match_cutoff,
        },
    ));

    // Select the matching backend in the background so the first request doesn't pay for it
    let warm = Arc::clone(&normalizer);
    tokio::task::spawn_blocking(move || {
        let backend = warm.warm_up();
        info!(?backend, "Skill matching backend ready");
    });

    let narrator: Option<Arc<dyn ChatBackend>> = match &config.llm_server_url {
        Some(url) => {
            let client = LlmClient::new(url.clone(), config.llm_temperature)?;
            info!("LLM client initialized (endpoint: {})", client.endpoint());
            Some(Arc::new(client) as Arc<dyn ChatBackend>)
        }
        None => {
            warn!("LLM_SERVER_URL not set; learning plans will omit the narrative");
            None
        }
    };

    let state = AppState {
        catalog,
        normalizer,
        narrator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
