//! Role scoring: vector similarity plus direct-membership matched/missing lists.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::roles::Role;
use crate::catalog::vocabulary::{Skill, Vocabulary};
use crate::matching::vector::{cosine_similarity, round_to, SkillVector};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMatch {
    /// Cosine similarity, rounded to 3 decimals.
    pub score: f64,
    /// User order, no duplicates.
    pub matched: Vec<Skill>,
    /// Role's declared order, no duplicates.
    pub missing: Vec<Skill>,
}

/// Splits `required` into (matched, missing) by set membership.
///
/// `matched` follows the user's order, `missing` the requirement order; both
/// are duplicate-free and together cover exactly the distinct required skills.
pub fn partition_skills(user_skills: &[Skill], required: &[Skill]) -> (Vec<Skill>, Vec<Skill>) {
    let required_set: HashSet<&str> = required.iter().map(Skill::as_str).collect();
    let user_set: HashSet<&str> = user_skills.iter().map(Skill::as_str).collect();

    let mut seen = HashSet::new();
    let matched = user_skills
        .iter()
        .filter(|s| required_set.contains(s.as_str()) && seen.insert(s.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let missing = required
        .iter()
        .filter(|s| !user_set.contains(s.as_str()) && seen.insert(s.as_str()))
        .cloned()
        .collect();

    (matched, missing)
}

pub fn score_role(user_skills: &[Skill], role: &Role, vocabulary: &Vocabulary) -> RoleMatch {
    let user_vector = SkillVector::from_skills(user_skills, vocabulary);
    let role_vector = SkillVector::from_skills(&role.skills, vocabulary);
    let (matched, missing) = partition_skills(user_skills, &role.skills);
    RoleMatch {
        score: round_to(cosine_similarity(&user_vector, &role_vector), 3),
        matched,
        missing,
    }
}
