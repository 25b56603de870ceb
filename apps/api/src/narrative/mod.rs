//! Narrative: wraps a gap analysis in an LLM-written learning plan.
//!
//! The chain runs analysis → roadmap → friendly message. The structured gap
//! analysis is always returned; when any step fails or answers with
//! something that is not JSON, the plan is marked as having no narrative.

pub mod prompts;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::catalog::vocabulary::Skill;
use crate::llm_client::{parse_json_reply, ChatBackend, LlmError};
use crate::matching::gap::{GapAnalysis, TransitionKind};

#[derive(Debug, Clone, Serialize)]
pub struct LearningPlan {
    pub gap_analysis: GapAnalysis,
    pub narrative_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Why the narrative is missing, when it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<String>,
}

impl LearningPlan {
    /// A plan carrying only the structured analysis.
    pub fn without_narrative(gap_analysis: GapAnalysis, reason: impl Into<String>) -> Self {
        Self {
            gap_analysis,
            narrative_available: false,
            analysis: None,
            roadmap: None,
            message: None,
            narrative_error: Some(reason.into()),
        }
    }
}

/// Context object sent with every prompt of the chain.
pub fn chat_context(gap: &GapAnalysis) -> Value {
    json!({
        "target_role": gap.target_role.career,
        "known_skills": gap.matched_skills,
        "learn_skills": gap.missing_skills,
        "full_skillset": gap.target_role.skills,
        "resources": gap.learning_resources,
    })
}

fn skill_names(skills: &[Skill]) -> Vec<&str> {
    skills.iter().map(Skill::as_str).collect()
}

#[derive(Debug)]
enum ChainError {
    Step(&'static str, LlmError),
}

impl ChainError {
    fn describe(&self) -> String {
        match self {
            ChainError::Step(step, LlmError::Parse(_)) => {
                format!("Could not parse the {step} step output")
            }
            ChainError::Step(step, err) => format!("The {step} step failed: {err}"),
        }
    }
}

async fn json_step(
    backend: &dyn ChatBackend,
    context: &Value,
    prompt: &str,
    step: &'static str,
) -> Result<Value, ChainError> {
    let reply = backend
        .chat(context, prompt)
        .await
        .map_err(|e| ChainError::Step(step, e))?;
    parse_json_reply(&reply).map_err(|e| ChainError::Step(step, e))
}

/// Runs the three-step chain for `gap`. Never fails: LLM problems are
/// reported through `narrative_available` and `narrative_error`.
pub async fn generate_learning_plan(backend: &dyn ChatBackend, gap: GapAnalysis) -> LearningPlan {
    let context = chat_context(&gap);
    let from_scratch = gap.transition_type == TransitionKind::Beginner;

    let mut plan = LearningPlan {
        gap_analysis: gap,
        narrative_available: false,
        analysis: None,
        roadmap: None,
        message: None,
        narrative_error: None,
    };

    let analysis_prompt = prompts::analysis_prompt(
        &plan.gap_analysis.target_role.career,
        &skill_names(&plan.gap_analysis.matched_skills),
        &skill_names(&plan.gap_analysis.missing_skills),
        from_scratch,
    );

    let outcome: Result<(), ChainError> = async {
        let analysis = json_step(backend, &context, &analysis_prompt, "analysis").await?;
        let roadmap_prompt = prompts::roadmap_prompt(&analysis, from_scratch);
        plan.analysis = Some(analysis);

        let roadmap = json_step(backend, &context, &roadmap_prompt, "roadmap").await?;
        let message_prompt = prompts::message_prompt(&roadmap);
        plan.roadmap = Some(roadmap);

        let message = backend
            .chat(&context, &message_prompt)
            .await
            .map_err(|e| ChainError::Step("message", e))?;
        plan.message = Some(message.trim().to_string());
        Ok(())
    }
    .await;

    match outcome {
        Ok(()) => {
            plan.narrative_available = true;
            info!(
                role = %plan.gap_analysis.target_role.slug,
                "Generated learning plan narrative"
            );
        }
        Err(err) => {
            let reason = err.describe();
            warn!(role = %plan.gap_analysis.target_role.slug, "{reason}");
            plan.narrative_error = Some(reason);
        }
    }
    plan
}
