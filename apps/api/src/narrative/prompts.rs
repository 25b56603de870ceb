//! Prompts for the three-step learning-plan chain.

use serde_json::Value;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, STAY_ON_CONTEXT};

pub fn analysis_prompt(target_role: &str, known: &[&str], to_learn: &[&str], from_scratch: bool) -> String {
    let skill_part = if from_scratch {
        "The user is a complete beginner. Provide foundational topics to start from zero.".to_string()
    } else {
        format!(
            "Known: {}\nTo learn: {}",
            known.join(", "),
            to_learn.join(", ")
        )
    };
    format!(
        "You are a career analyst. Target role: {target_role}\n\
         {skill_part}\n\
         {STAY_ON_CONTEXT}\n\
         Return a JSON object with keys: missing_skills (list), recommendations (list), reason (short).\n\
         {JSON_ONLY_INSTRUCTION}"
    )
}

pub fn roadmap_prompt(analysis: &Value, from_scratch: bool) -> String {
    let mode = if from_scratch {
        "Beginner: start from basic fundamentals."
    } else {
        "Targeted gap-filling roadmap."
    };
    format!(
        "You are a career coach. Based on this analysis: {analysis}\n\
         {mode}\n\
         Produce a JSON object with a 'roadmap' array of 3-5 stages. \
         Each stage has: title, weeks, outcomes, project.\n\
         {JSON_ONLY_INSTRUCTION}"
    )
}

pub fn message_prompt(roadmap: &Value) -> String {
    format!(
        "You are a friendly coach. Turn this roadmap into a short motivating message \
         (at most 200 words). End with 2 follow-up questions.\n\
         Roadmap: {roadmap}"
    )
}
