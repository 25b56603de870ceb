//! Skill Extractor: turns free text or comma-separated input into a skill set.
//!
//! All extractors return a `BTreeSet`, so the output order is lexicographic
//! regardless of the order tokens were seen in. An empty set means "nothing
//! matched", never "not attempted".

use std::collections::BTreeSet;

use crate::catalog::vocabulary::Skill;
use crate::skills::normalizer::Normalizer;

/// Lowercased tokens split on every non-alphanumeric character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes every distinct token of `text` on its own.
pub fn extract_from_text(normalizer: &Normalizer, text: &str) -> BTreeSet<Skill> {
    let unique: BTreeSet<String> = tokenize(text).into_iter().collect();
    normalize_all(normalizer, unique.iter().map(String::as_str))
}

/// Normalizes each comma-delimited piece as a whole phrase, so multi-word
/// skills like "machine learning" can match directly.
pub fn extract_from_manual_list(normalizer: &Normalizer, csv: &str) -> BTreeSet<Skill> {
    let pieces: BTreeSet<String> = csv
        .split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .collect();
    normalize_all(normalizer, pieces.iter().map(String::as_str))
}

/// Resume mode: per-word normalization plus direct containment of every
/// multi-word vocabulary skill, which word-level tokens would split apart.
pub fn extract_from_resume(normalizer: &Normalizer, text: &str) -> BTreeSet<Skill> {
    let padded = format!(" {} ", text.to_lowercase());
    let mut found: BTreeSet<Skill> = normalizer
        .vocabulary()
        .multi_word()
        .filter(|skill| padded.contains(&format!(" {} ", skill.as_str())))
        .cloned()
        .collect();
    found.extend(extract_from_text(normalizer, text));
    found
}

fn normalize_all<'a>(
    normalizer: &Normalizer,
    tokens: impl Iterator<Item = &'a str>,
) -> BTreeSet<Skill> {
    let tokens: Vec<&str> = tokens.collect();
    if tokens.is_empty() {
        return BTreeSet::new();
    }
    normalizer.normalize_many(&tokens).into_iter().flatten().collect()
}
