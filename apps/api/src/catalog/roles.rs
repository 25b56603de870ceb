//! Role Catalog: role slug → display title + required skills.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::vocabulary::{Skill, Vocabulary};

/// Shape of one role entry in `roles.json`.
///
/// Older documents use `career` for the display title.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDocument {
    #[serde(default, alias = "career")]
    pub title: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub slug: String,
    pub title: String,
    /// Declared order, duplicates kept as written in the source document.
    pub skills: Vec<Skill>,
}

impl Role {
    pub fn from_document(slug: &str, doc: RoleDocument) -> Self {
        let title = doc
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| slug.to_string());
        Self {
            slug: slug.to_string(),
            title,
            skills: doc.skills.iter().filter_map(|s| Skill::parse(s)).collect(),
        }
    }

    /// Required skills as a set, keeping first-occurrence order.
    pub fn required_skills(&self) -> Vec<Skill> {
        let mut seen = HashSet::new();
        self.skills
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }

    /// Required skills that have no dimension in the vocabulary.
    pub fn out_of_vocabulary<'a>(&'a self, vocabulary: &Vocabulary) -> Vec<&'a Skill> {
        self.skills
            .iter()
            .filter(|s| !vocabulary.contains(s.as_str()))
            .collect()
    }
}

/// Immutable role catalog. Iteration follows document order.
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: Vec<Role>,
    index: HashMap<String, usize>,
}

impl RoleCatalog {
    pub fn new(roles: Vec<Role>) -> Self {
        let mut deduped: Vec<Role> = Vec::with_capacity(roles.len());
        let mut index = HashMap::new();
        for role in roles {
            match index.get(&role.slug) {
                // Last definition wins, first position kept.
                Some(&i) => deduped[i] = role,
                None => {
                    index.insert(role.slug.clone(), deduped.len());
                    deduped.push(role);
                }
            }
        }
        Self {
            roles: deduped,
            index,
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Role> {
        self.index.get(slug).map(|&i| &self.roles[i])
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
