//! Axum route handlers for skill extraction.

use std::collections::BTreeSet;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::vocabulary::Skill;
use crate::errors::AppError;
use crate::routes::run_blocking;
use crate::skills::extractor::{extract_from_manual_list, extract_from_resume, extract_from_text};
use crate::skills::normalizer::MatcherBackend;
use crate::skills::resume::extract_resume_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Every word on its own.
    #[default]
    Text,
    /// Comma-separated phrases.
    Manual,
    /// Words plus multi-word containment.
    Resume,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(default)]
    pub mode: ExtractMode,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: Vec<Skill>,
    pub count: usize,
    pub backend: MatcherBackend,
}

impl ExtractResponse {
    fn new(skills: BTreeSet<Skill>, backend: MatcherBackend) -> Self {
        let skills: Vec<Skill> = skills.into_iter().collect();
        Self {
            count: skills.len(),
            skills,
            backend,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let normalizer = state.normalizer.clone();
    let response = run_blocking(move || {
        let skills = match request.mode {
            ExtractMode::Text => extract_from_text(&normalizer, &request.text),
            ExtractMode::Manual => extract_from_manual_list(&normalizer, &request.text),
            ExtractMode::Resume => extract_from_resume(&normalizer, &request.text),
        };
        ExtractResponse::new(skills, normalizer.backend())
    })
    .await?;

    Ok(Json(response))
}

/// POST /api/v1/resume
///
/// Multipart upload with a `resume` file part. Only PDF is accepted.
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload: Option<(Option<String>, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
        upload = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) = upload
        .ok_or_else(|| AppError::Validation("Missing 'resume' file field".to_string()))?;

    let text = extract_resume_text(file_name.as_deref(), content_type.as_deref(), data).await?;

    let normalizer = state.normalizer.clone();
    let response = run_blocking(move || {
        ExtractResponse::new(extract_from_resume(&normalizer, &text), normalizer.backend())
    })
    .await?;

    info!(skills = response.count, "Extracted skills from uploaded resume");
    Ok(Json(response))
}
