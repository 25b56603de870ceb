use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::ChatBackend;
use crate::skills::normalizer::Normalizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub normalizer: Arc<Normalizer>,
    /// Chat backend for learning-plan narratives. `None` when no LLM server is configured.
    pub narrator: Option<Arc<dyn ChatBackend>>,
    pub config: Config,
}
