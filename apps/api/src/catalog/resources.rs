//! Learning resources per skill, ordered Beginner → Intermediate → Advanced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(rename = "type", default = "not_available")]
    pub kind: String,
    #[serde(default = "placeholder_url")]
    pub url: String,
    #[serde(default = "not_available")]
    pub level: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

fn placeholder_url() -> String {
    "#".to_string()
}

/// Rank used for ordering; anything outside the three known levels sorts last.
const UNRANKED: u8 = 3;

impl LearningResource {
    /// Placeholder returned for skills with no curated resources.
    pub fn unavailable() -> Self {
        Self {
            name: "Resource not available yet".to_string(),
            kind: not_available(),
            url: placeholder_url(),
            level: not_available(),
        }
    }

    pub fn level_rank(&self) -> u8 {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "beginner" => 0,
            "intermediate" => 1,
            "advanced" => 2,
            _ => UNRANKED,
        }
    }
}

/// Per-skill document value: either a list or a single descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceEntry {
    Many(Vec<LearningResource>),
    One(LearningResource),
}

impl ResourceEntry {
    fn into_vec(self) -> Vec<LearningResource> {
        match self {
            ResourceEntry::Many(list) => list,
            ResourceEntry::One(single) => vec![single],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceLibrary {
    by_skill: HashMap<String, Vec<LearningResource>>,
}

impl ResourceLibrary {
    /// Keys are canonicalised to lowercase; each list is stably sorted by level
    /// so catalog order survives among equal levels.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ResourceEntry)>,
    {
        let mut by_skill: HashMap<String, Vec<LearningResource>> = HashMap::new();
        for (skill, entry) in entries {
            let key = skill.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            by_skill.entry(key).or_default().extend(entry.into_vec());
        }
        for list in by_skill.values_mut() {
            list.sort_by_key(LearningResource::level_rank);
        }
        Self { by_skill }
    }

    /// All resources for a skill, or a single `unavailable()` sentinel.
    pub fn lookup(&self, skill: &str) -> Vec<LearningResource> {
        self.lookup_capped(skill, usize::MAX)
    }

    /// Lowest difficulty first, at most `limit` entries (sentinel when none).
    pub fn lookup_capped(&self, skill: &str, limit: usize) -> Vec<LearningResource> {
        match self.by_skill.get(skill.trim().to_lowercase().as_str()) {
            Some(list) if !list.is_empty() => list.iter().take(limit).cloned().collect(),
            _ => vec![LearningResource::unavailable()],
        }
    }

    pub fn skill_count(&self) -> usize {
        self.by_skill.len()
    }
}
