//! Axum route handlers for role listing, gap analysis, recommendations and learning plans.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::roles::Role;
use crate::errors::AppError;
use crate::matching::gap::{analyze, GapAnalysis, GapRequest, TransitionKind};
use crate::matching::recommend::{recommend, Recommendations};
use crate::narrative::{generate_learning_plan, LearningPlan};
use crate::routes::run_blocking;
use crate::skills::intake::{parse_user_input, IntakePurpose, UserInput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
    pub count: usize,
}

fn default_transition() -> TransitionKind {
    TransitionKind::Upskill
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillGapRequest {
    /// Comma-separated manual entry.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    pub target_role: String,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default = "default_transition")]
    pub transition_type: TransitionKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    /// Zero or negative asks for an empty list.
    #[serde(default)]
    pub top_k: Option<i64>,
}

impl RecommendRequest {
    fn top_k(&self, default: usize) -> usize {
        match self.top_k {
            Some(k) => usize::try_from(k).unwrap_or(0),
            None => default,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles: Vec<Role> = state.catalog.roles.iter().cloned().collect();
    Json(RolesResponse {
        count: roles.len(),
        roles,
    })
}

async fn run_gap_analysis(state: &AppState, request: SkillGapRequest) -> Result<GapAnalysis, AppError> {
    let catalog = state.catalog.clone();
    let normalizer = state.normalizer.clone();

    run_blocking(move || {
        let input = UserInput {
            skills: request.skills.as_deref(),
            resume_text: request.resume_text.as_deref(),
            target_role: Some(request.target_role.as_str()),
            current_role: request.current_role.as_deref(),
        };
        let parsed = parse_user_input(
            &catalog,
            &normalizer,
            &input,
            IntakePurpose::Analyze(request.transition_type),
        )?;
        let gap = analyze(
            &catalog,
            &GapRequest {
                user_skills: &parsed.skills,
                current_role: Some(parsed.current_role.as_str()),
                target_role: &request.target_role,
                transition: request.transition_type,
            },
        )?;
        Ok::<_, AppError>(gap)
    })
    .await?
}

/// POST /api/v1/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<GapAnalysis>, AppError> {
    Ok(Json(run_gap_analysis(&state, request).await?))
}

/// POST /api/v1/recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<Recommendations>, AppError> {
    let catalog = state.catalog.clone();
    let normalizer = state.normalizer.clone();
    let top_k = request.top_k(state.config.recommend_top_k);

    let recommendations = run_blocking(move || {
        let input = UserInput {
            skills: request.skills.as_deref(),
            resume_text: request.resume_text.as_deref(),
            ..Default::default()
        };
        let parsed = parse_user_input(&catalog, &normalizer, &input, IntakePurpose::Recommend)?;
        Ok::<_, AppError>(recommend(&catalog, &parsed.skills, top_k))
    })
    .await??;

    Ok(Json(recommendations))
}

/// POST /api/v1/learning-plan
///
/// Gap analysis plus an LLM narrative. Without a configured LLM server the
/// structured analysis is still returned.
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<LearningPlan>, AppError> {
    let gap = run_gap_analysis(&state, request).await?;

    let plan = match &state.narrator {
        Some(narrator) => generate_learning_plan(narrator.as_ref(), gap).await,
        None => LearningPlan::without_narrative(gap, "No LLM server is configured"),
    };
    Ok(Json(plan))
}
