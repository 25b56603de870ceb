use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version, catalog sizes and the matching backend
/// (`null` while the backend is still warming up).
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "elevatr-api",
        "backend": state.normalizer.selected_backend(),
        "catalog": {
            "skills": state.catalog.vocabulary.len(),
            "roles": state.catalog.roles.len(),
            "resource_skills": state.catalog.resources.skill_count(),
        },
        "narrative_enabled": state.narrator.is_some(),
    }))
}
