//! Gap & Roadmap Engine: compares a user's skills with one target role.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::resources::LearningResource;
use crate::catalog::vocabulary::Skill;
use crate::catalog::Catalog;
use crate::errors::AnalysisError;
use crate::matching::roadmap::{build_phases, LearningPhase};
use crate::matching::scoring::partition_skills;

/// Placeholder used when the user has no (known) current role.
pub const ENTRY_LEVEL: &str = "entry_level";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Starting from zero: every required skill is treated as missing.
    Beginner,
    /// Levelling up within the current role.
    SameRole,
    /// Moving to a different role.
    Upskill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRole {
    pub slug: String,
    pub career: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub transition_type: TransitionKind,
    pub current_role: String,
    pub target_role: TargetRole,
    pub matched_skills: Vec<Skill>,
    pub missing_skills: Vec<Skill>,
    /// 0 – 100
    pub completion_percentage: u32,
    pub learning_resources: BTreeMap<Skill, Vec<LearningResource>>,
    pub phases: Vec<LearningPhase>,
}

#[derive(Debug, Clone, Copy)]
pub struct GapRequest<'a> {
    pub user_skills: &'a [Skill],
    pub current_role: Option<&'a str>,
    pub target_role: &'a str,
    pub transition: TransitionKind,
}

/// `round(matched / required * 100)`, 0 when nothing is required.
pub fn completion_percentage(matched: usize, required: usize) -> u32 {
    if required == 0 {
        return 0;
    }
    (matched as f64 / required as f64 * 100.0).round() as u32
}

/// Builds the gap analysis for `request`.
///
/// The only failure is an unknown target role; empty skill sets and roles
/// with no requirements produce a result with empty lists.
pub fn analyze(catalog: &Catalog, request: &GapRequest<'_>) -> Result<GapAnalysis, AnalysisError> {
    let role = catalog
        .roles
        .get(request.target_role)
        .ok_or_else(|| AnalysisError::RoleNotFound(request.target_role.to_string()))?;

    let required = role.required_skills();
    let (matched_skills, missing_skills, completion) = match request.transition {
        TransitionKind::Beginner => (Vec::new(), required.clone(), 0),
        TransitionKind::SameRole | TransitionKind::Upskill => {
            let (matched, missing) = partition_skills(request.user_skills, &required);
            let completion = completion_percentage(matched.len(), required.len());
            (matched, missing, completion)
        }
    };

    let learning_resources: BTreeMap<Skill, Vec<LearningResource>> = missing_skills
        .iter()
        .map(|skill| (skill.clone(), catalog.resources.lookup(skill.as_str())))
        .collect();
    let phases = build_phases(&missing_skills, &learning_resources);

    let current_role = request
        .current_role
        .filter(|slug| catalog.roles.contains(slug))
        .unwrap_or(ENTRY_LEVEL)
        .to_string();

    Ok(GapAnalysis {
        transition_type: request.transition,
        current_role,
        target_role: TargetRole {
            slug: role.slug.clone(),
            career: role.title.clone(),
            skills: required,
        },
        matched_skills,
        missing_skills,
        completion_percentage: completion,
        learning_resources,
        phases,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::fixtures;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names.iter().filter_map(|n| Skill::parse(n)).collect()
    }

    fn as_strs(list: &[Skill]) -> Vec<&str> {
        list.iter().map(Skill::as_str).collect()
    }

    fn request<'a>(
        user: &'a [Skill],
        target: &'a str,
        transition: TransitionKind,
    ) -> GapRequest<'a> {
        GapRequest {
            user_skills: user,
            current_role: None,
            target_role: target,
            transition,
        }
    }

    #[test]
    fn test_partial_match_scores_fifty_percent() {
        let catalog = fixtures::catalog();
        let user = skills(&["python"]);
        let result = analyze(&catalog, &request(&user, "data_analyst", TransitionKind::Upskill)).unwrap();
        assert_eq!(as_strs(&result.matched_skills), vec!["python"]);
        assert_eq!(as_strs(&result.missing_skills), vec!["sql"]);
        assert_eq!(result.completion_percentage, 50);
    }

    #[test]
    fn test_beginner_treats_everything_as_missing() {
        let catalog = fixtures::catalog();
        let user = skills(&["python"]);
        let result =
            analyze(&catalog, &request(&user, "data_analyst", TransitionKind::Beginner)).unwrap();
        assert!(result.matched_skills.is_empty());
        assert_eq!(as_strs(&result.missing_skills), vec!["python", "sql"]);
        assert_eq!(result.completion_percentage, 0);

        let total: usize = result.phases.iter().map(|p| p.skills.len()).sum();
        assert_eq!(total, 2);
        assert_eq!(result.phases[0].name, "Foundation Skills");
        assert!(result.phases.iter().all(|p| !p.skills.is_empty()));
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let catalog = fixtures::catalog();
        let err = analyze(&catalog, &request(&[], "no_such_role", TransitionKind::Upskill))
            .unwrap_err();
        assert_eq!(err, AnalysisError::RoleNotFound("no_such_role".to_string()));
    }

    #[test]
    fn test_role_without_requirements_completes_zero() {
        let catalog = fixtures::catalog();
        let user = skills(&["python", "sql"]);
        let result =
            analyze(&catalog, &request(&user, "placeholder", TransitionKind::SameRole)).unwrap();
        assert_eq!(result.completion_percentage, 0);
        assert!(result.missing_skills.is_empty());
        assert!(result.phases.is_empty());
        assert!(result.learning_resources.is_empty());
    }

    #[test]
    fn test_completion_rounds_to_nearest() {
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(4, 4), 100);
    }

    #[test]
    fn test_every_missing_skill_has_resources() {
        let catalog = fixtures::catalog();
        let result =
            analyze(&catalog, &request(&[], "data_scientist", TransitionKind::Upskill)).unwrap();
        for skill in &result.missing_skills {
            let resources = &result.learning_resources[skill];
            assert!(!resources.is_empty(), "{skill} has no resources");
        }
        assert_eq!(
            result.learning_resources[&Skill::parse("pandas").unwrap()],
            vec![LearningResource::unavailable()]
        );
    }

    #[test]
    fn test_resources_not_capped_for_gap_analysis() {
        let catalog = fixtures::catalog();
        let result =
            analyze(&catalog, &request(&[], "data_analyst", TransitionKind::Beginner)).unwrap();
        let python = &result.learning_resources[&Skill::parse("python").unwrap()];
        let levels: Vec<&str> = python.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["Beginner", "Intermediate", "Advanced"]);
    }

    #[test]
    fn test_matched_and_missing_partition_required() {
        let catalog = fixtures::catalog();
        let user = skills(&["tableau", "python", "docker"]);
        let result =
            analyze(&catalog, &request(&user, "data_scientist", TransitionKind::Upskill)).unwrap();
        let matched: HashSet<&str> = as_strs(&result.matched_skills).into_iter().collect();
        let missing: HashSet<&str> = as_strs(&result.missing_skills).into_iter().collect();
        let required: HashSet<&str> = as_strs(&result.target_role.skills).into_iter().collect();
        assert!(matched.is_disjoint(&missing));
        assert_eq!(matched.union(&missing).copied().collect::<HashSet<_>>(), required);
        assert_eq!(as_strs(&result.matched_skills), vec!["tableau", "python"]);
        assert_eq!(result.completion_percentage, 40);
    }

    #[test]
    fn test_current_role_resolves_or_defaults() {
        let catalog = fixtures::catalog();
        let known = GapRequest {
            current_role: Some("data_analyst"),
            ..request(&[], "data_scientist", TransitionKind::Upskill)
        };
        assert_eq!(analyze(&catalog, &known).unwrap().current_role, "data_analyst");

        let unknown = GapRequest {
            current_role: Some("astronaut"),
            ..request(&[], "data_scientist", TransitionKind::Upskill)
        };
        assert_eq!(analyze(&catalog, &unknown).unwrap().current_role, ENTRY_LEVEL);
    }

    #[test]
    fn test_serialized_keys_are_stable() {
        let catalog = fixtures::catalog();
        let user = skills(&["python"]);
        let result = analyze(&catalog, &request(&user, "data_analyst", TransitionKind::SameRole)).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["transition_type"], "same_role");
        assert_eq!(value["target_role"]["career"], "Data Analyst");
        assert_eq!(value["missing_skills"][0], "sql");
        assert_eq!(value["phases"][0]["skills"][0]["skill"], "sql");
        assert_eq!(value["learning_resources"]["sql"][0]["type"], "Interactive");
    }
}
