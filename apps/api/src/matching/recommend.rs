//! Recommendation Ranker: scores every role for a skill set and keeps the top K.
//!
//! Order: completion percentage desc, then similarity desc; remaining ties keep
//! catalog order (stable sort).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::resources::LearningResource;
use crate::catalog::vocabulary::Skill;
use crate::catalog::Catalog;
use crate::matching::scoring::score_role;
use crate::matching::vector::round_to;

pub const DEFAULT_TOP_K: usize = 3;
/// Resources shown per missing skill in a recommendation card.
const RESOURCES_PER_SKILL: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleScore {
    pub role_slug: String,
    pub career: String,
    pub score: f64,
    pub matched_skills: Vec<Skill>,
    pub missing_skills: Vec<Skill>,
    pub resources: BTreeMap<Skill, Vec<LearningResource>>,
    /// One decimal, 0 – 100
    pub completion_percentage: f64,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub recommendations: Vec<RoleScore>,
    pub user_skills_count: usize,
    pub analysis_summary: String,
}

/// Scores every catalog role against `user_skills`, in catalog order.
pub fn score_all_roles(catalog: &Catalog, user_skills: &[Skill]) -> Vec<RoleScore> {
    catalog
        .roles
        .iter()
        .map(|role| {
            let result = score_role(user_skills, role, &catalog.vocabulary);
            let required = role.required_skills().len();
            let completion = if required == 0 {
                0.0
            } else {
                round_to(result.matched.len() as f64 / required as f64 * 100.0, 1)
            };
            let resources = result
                .missing
                .iter()
                .map(|skill| {
                    (
                        skill.clone(),
                        catalog
                            .resources
                            .lookup_capped(skill.as_str(), RESOURCES_PER_SKILL),
                    )
                })
                .collect();
            RoleScore {
                role_slug: role.slug.clone(),
                career: role.title.clone(),
                score: result.score,
                analysis: format!(
                    "Matched {} of {} required skills",
                    result.matched.len(),
                    required
                ),
                matched_skills: result.matched,
                missing_skills: result.missing,
                resources,
                completion_percentage: completion,
            }
        })
        .collect()
}

fn rank(a: &RoleScore, b: &RoleScore) -> Ordering {
    b.completion_percentage
        .total_cmp(&a.completion_percentage)
        .then_with(|| b.score.total_cmp(&a.score))
}

/// Top `top_k` roles for `user_skills`. `top_k == 0` yields an empty list.
pub fn recommend(catalog: &Catalog, user_skills: &[Skill], top_k: usize) -> Recommendations {
    let mut scored = score_all_roles(catalog, user_skills);
    scored.sort_by(rank);
    scored.truncate(top_k);

    Recommendations {
        analysis_summary: format!(
            "Found {} recommended roles based on your {} skills",
            scored.len(),
            user_skills.len()
        ),
        recommendations: scored,
        user_skills_count: user_skills.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names.iter().filter_map(|n| Skill::parse(n)).collect()
    }

    fn slugs(recs: &Recommendations) -> Vec<&str> {
        recs.recommendations
            .iter()
            .map(|r| r.role_slug.as_str())
            .collect()
    }

    #[test]
    fn test_ranked_by_completion_then_score() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &skills(&["python", "sql"]), 3);
        // data_analyst 100%, data_scientist 40%, devops 25%
        assert_eq!(slugs(&recs), vec!["data_analyst", "data_scientist", "devops_engineer"]);
        assert_eq!(recs.recommendations[0].completion_percentage, 100.0);
        assert_eq!(recs.recommendations[1].completion_percentage, 40.0);
    }

    #[test]
    fn test_similarity_breaks_completion_ties() {
        let catalog = fixtures::catalog();
        // data_analyst: 1/2 = 50%, score 0.5; devops: 2/4 = 50%, score 2/sqrt(2*3) ≈ 0.816
        let recs = recommend(&catalog, &skills(&["python", "docker"]), 2);
        assert_eq!(slugs(&recs), vec!["devops_engineer", "data_analyst"]);
        assert!(recs.recommendations[0].score > recs.recommendations[1].score);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &skills(&["python"]), 0);
        assert!(recs.recommendations.is_empty());
        assert_eq!(recs.user_skills_count, 1);
    }

    #[test]
    fn test_top_k_larger_than_catalog() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &skills(&["python"]), 50);
        assert_eq!(recs.recommendations.len(), catalog.roles.len());
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let catalog = fixtures::catalog();
        let user = skills(&["pandas", "python", "kubernetes"]);
        let first = recommend(&catalog, &user, 3);
        for _ in 0..5 {
            assert_eq!(recommend(&catalog, &user, 3), first);
        }
    }

    #[test]
    fn test_empty_skills_keep_catalog_order() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &[], 10);
        assert_eq!(
            slugs(&recs),
            vec!["data_analyst", "devops_engineer", "data_scientist", "placeholder"]
        );
        assert!(recs.recommendations.iter().all(|r| r.matched_skills.is_empty()));
        assert!(recs.recommendations.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_resources_capped_at_two_lowest_levels() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &skills(&["sql"]), 10);
        let analyst = recs
            .recommendations
            .iter()
            .find(|r| r.role_slug == "data_analyst")
            .unwrap();
        let python = &analyst.resources[&Skill::parse("python").unwrap()];
        let levels: Vec<&str> = python.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["Beginner", "Intermediate"]);
    }

    #[test]
    fn test_completion_one_decimal() {
        let catalog = fixtures::catalog();
        let scored = score_all_roles(&catalog, &skills(&["python"]));
        let scientist = scored.iter().find(|r| r.role_slug == "data_scientist").unwrap();
        assert_eq!(scientist.completion_percentage, 20.0);
        let devops = scored.iter().find(|r| r.role_slug == "devops_engineer").unwrap();
        assert_eq!(devops.completion_percentage, 25.0);
        assert_eq!(devops.analysis, "Matched 1 of 4 required skills");
    }

    #[test]
    fn test_summary_text() {
        let catalog = fixtures::catalog();
        let recs = recommend(&catalog, &skills(&["python", "sql"]), 2);
        assert_eq!(
            recs.analysis_summary,
            "Found 2 recommended roles based on your 2 skills"
        );
    }
}
