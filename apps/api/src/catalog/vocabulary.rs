//! Skill Vocabulary: the ordered, index-stable universe of canonical skills.
//!
//! Position `i` of every skill vector refers to `Vocabulary::skills()[i]`, so the
//! vocabulary is built once, sorted, and never mutated afterwards.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical skill: trimmed, lowercased, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    /// Canonicalises raw text. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = raw.trim().to_lowercase();
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Multi-word skills ("machine learning") need phrase matching in resume text.
    pub fn is_multi_word(&self) -> bool {
        self.0.contains(' ')
    }
}

impl Borrow<str> for Skill {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Skill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw skill matrix document: category → skill names.
pub type SkillMatrix = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    skills: Vec<Skill>,
    index: HashMap<Skill, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary from any list of names. Duplicates collapse after
    /// canonicalisation and the result is sorted lexicographically.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<Skill> = names
            .into_iter()
            .filter_map(|name| Skill::parse(name.as_ref()))
            .collect();
        let skills: Vec<Skill> = unique.into_iter().collect();
        let index = skills
            .iter()
            .enumerate()
            .map(|(i, skill)| (skill.clone(), i))
            .collect();
        Self { skills, index }
    }

    /// Flattens every category of the matrix into one vocabulary.
    pub fn from_matrix(matrix: &SkillMatrix) -> Self {
        Self::new(matrix.values().flatten())
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Skill> {
        self.skills.get(position)
    }

    /// Vector dimension of a skill, if it is part of the vocabulary.
    pub fn position(&self, skill: &str) -> Option<usize> {
        self.index.get(skill).copied()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.index.contains_key(skill)
    }

    /// Returns the vocabulary's own copy of `skill`.
    pub fn lookup(&self, skill: &str) -> Option<&Skill> {
        self.position(skill).map(|i| &self.skills[i])
    }

    pub fn multi_word(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|s| s.is_multi_word())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_parse_trims_and_lowercases() {
        let skill = Skill::parse("  PyThon ").unwrap();
        assert_eq!(skill.as_str(), "python");
    }

    #[test]
    fn test_skill_parse_rejects_blank() {
        assert!(Skill::parse("   ").is_none());
        assert!(Skill::parse("").is_none());
    }

    #[test]
    fn test_vocabulary_collapses_duplicates_and_sorts() {
        let vocab = Vocabulary::new(["SQL", "python", "sql", "Docker"]);
        let names: Vec<&str> = vocab.skills().iter().map(Skill::as_str).collect();
        assert_eq!(names, vec!["docker", "python", "sql"]);
    }

    #[test]
    fn test_vocabulary_positions_are_index_stable() {
        let vocab = Vocabulary::new(["python", "sql", "docker"]);
        for (i, skill) in vocab.skills().iter().enumerate() {
            assert_eq!(vocab.position(skill.as_str()), Some(i));
        }
        assert_eq!(vocab.position("rust"), None);
    }

    #[test]
    fn test_from_matrix_flattens_categories() {
        let matrix: SkillMatrix = BTreeMap::from([
            ("data".to_string(), vec!["Python".to_string(), "SQL".to_string()]),
            ("ops".to_string(), vec!["docker".to_string(), "python".to_string()]),
        ]);
        let vocab = Vocabulary::from_matrix(&matrix);
        assert_eq!(vocab.len(), 3);
        assert!(vocab.contains("sql"));
    }

    #[test]
    fn test_multi_word_filter() {
        let vocab = Vocabulary::new(["machine learning", "python", "data visualization"]);
        let multi: Vec<&str> = vocab.multi_word().map(Skill::as_str).collect();
        assert_eq!(multi, vec!["data visualization", "machine learning"]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_empty());
        assert_eq!(vocab.lookup("python"), None);
    }
}
