//! Intake: validates a request and collects the user's skills from every source.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::vocabulary::Skill;
use crate::catalog::Catalog;
use crate::errors::AnalysisError;
use crate::matching::gap::{TransitionKind, ENTRY_LEVEL};
use crate::skills::extractor::{extract_from_manual_list, extract_from_resume};
use crate::skills::normalizer::Normalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakePurpose {
    /// No target role; rank every role.
    Recommend,
    /// Gap analysis against a target role.
    Analyze(TransitionKind),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserInput<'a> {
    /// Comma-separated manual entry.
    pub skills: Option<&'a str>,
    /// Plain text already extracted from an uploaded resume.
    pub resume_text: Option<&'a str>,
    pub target_role: Option<&'a str>,
    pub current_role: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedInput {
    pub target_role: Option<String>,
    pub current_role: String,
    /// Sorted, duplicate-free.
    pub skills: Vec<Skill>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_user_input(
    catalog: &Catalog,
    normalizer: &Normalizer,
    input: &UserInput<'_>,
    purpose: IntakePurpose,
) -> Result<ParsedInput, AnalysisError> {
    let manual = non_blank(input.skills);
    let resume = non_blank(input.resume_text);
    let target_role = non_blank(input.target_role);

    match purpose {
        IntakePurpose::Recommend => {
            if manual.is_none() && resume.is_none() {
                return Err(AnalysisError::MissingInput(
                    "Please provide skills for role recommendations".to_string(),
                ));
            }
        }
        IntakePurpose::Analyze(_) => {
            let slug = target_role.unwrap_or_default();
            if !catalog.roles.contains(slug) {
                return Err(AnalysisError::RoleNotFound(slug.to_string()));
            }
        }
    }

    let mut extracted: BTreeSet<Skill> = BTreeSet::new();
    if let Some(csv) = manual {
        extracted.extend(extract_from_manual_list(normalizer, csv));
    }
    if let Some(text) = resume {
        extracted.extend(extract_from_resume(normalizer, text));
    }

    if extracted.is_empty() && purpose != IntakePurpose::Analyze(TransitionKind::Beginner) {
        return Err(AnalysisError::NoSkillsExtracted);
    }

    let current_role = non_blank(input.current_role)
        .filter(|slug| catalog.roles.contains(slug))
        .unwrap_or(ENTRY_LEVEL)
        .to_string();

    Ok(ParsedInput {
        target_role: target_role.map(str::to_string),
        current_role,
        skills: extracted.into_iter().collect(),
    })
}
