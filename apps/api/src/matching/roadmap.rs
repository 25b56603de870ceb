//! Learning roadmap: splits the missing-skill list into ordered phases.
//!
//! Bucketing: `group = max(1, n / 3)`; phase 1 takes the first `group` skills,
//! phase 2 the next `group`, phase 3 everything left. Empty phases are omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::resources::LearningResource;
use crate::catalog::vocabulary::Skill;

const PHASES: [(&str, &str); 3] = [
    (
        "Foundation Skills",
        "Essential skills to build your base knowledge",
    ),
    ("Core Development", "Build your technical expertise"),
    ("Advanced Topics", "Master advanced concepts"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSkill {
    pub skill: Skill,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPhase {
    pub name: String,
    pub description: String,
    pub skills: Vec<PhaseSkill>,
}

/// Three contiguous slices of `items`; the last absorbs the remainder.
pub fn phase_groups<T>(items: &[T]) -> [&[T]; 3] {
    let n = items.len();
    let group = (n / 3).max(1);
    let first_end = group.min(n);
    let second_end = (2 * group).min(n);
    [
        &items[..first_end],
        &items[first_end..second_end],
        &items[second_end..],
    ]
}

/// Builds the non-empty phases for `missing`, attaching each skill's resources.
pub fn build_phases(
    missing: &[Skill],
    resources: &BTreeMap<Skill, Vec<LearningResource>>,
) -> Vec<LearningPhase> {
    PHASES
        .iter()
        .zip(phase_groups(missing))
        .filter(|(_, group)| !group.is_empty())
        .map(|((name, description), group)| LearningPhase {
            name: name.to_string(),
            description: description.to_string(),
            skills: group
                .iter()
                .map(|skill| PhaseSkill {
                    skill: skill.clone(),
                    resources: resources
                        .get(skill)
                        .cloned()
                        .unwrap_or_else(|| vec![LearningResource::unavailable()]),
                })
                .collect(),
        })
        .collect()
}
