//! Skill Normalizer: maps an arbitrary token to at most one vocabulary skill.
//!
//! Two interchangeable strategies sit behind `SkillMatcher`:
//! - `SemanticMatcher`: cosine similarity between sentence embeddings of the
//!   token and every vocabulary skill (vocabulary embedded once, in one batch).
//! - `FuzzyMatcher`: sequence-similarity ratio `2·M / T` (matched characters
//!   over total length) against every vocabulary skill, with a stricter cutoff.
//!
//! The strategy is chosen lazily on first use and memoized in a `OnceCell`, so
//! the model load runs exactly once even under concurrent first calls. If the
//! semantic backend cannot be built the normalizer logs it and stays on the
//! fuzzy matcher for the rest of the process.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use similar::TextDiff;
use tracing::{info, warn};

use crate::catalog::vocabulary::{Skill, Vocabulary};
use crate::skills::embedding::{
    cosine, default_factory, encode_checked, Embedder, EmbedderFactory, EmbeddingError,
};

/// Minimum cosine similarity for a semantic match.
pub const DEFAULT_THRESHOLD: f32 = 0.70;
/// Minimum string-similarity ratio for a fallback match.
pub const FALLBACK_CUTOFF: f32 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherBackend {
    Semantic,
    Fuzzy,
}

/// A resolved token with the similarity that admitted it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub skill: Skill,
    pub similarity: f32,
    pub backend: MatcherBackend,
}

/// Best vocabulary position and its similarity.
pub type Candidate = (usize, f32);

/// Scores tokens against the vocabulary. Tokens are already trimmed and lowercased.
pub trait SkillMatcher: Send + Sync {
    fn backend(&self) -> MatcherBackend;

    fn best_matches(
        &self,
        tokens: &[&str],
        threshold: f32,
    ) -> Result<Vec<Option<Candidate>>, EmbeddingError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Fuzzy (deterministic fallback)
// ────────────────────────────────────────────────────────────────────────────

pub struct FuzzyMatcher {
    vocabulary: Arc<Vocabulary>,
    cutoff: f32,
}

impl FuzzyMatcher {
    pub fn new(vocabulary: Arc<Vocabulary>, cutoff: f32) -> Self {
        Self { vocabulary, cutoff }
    }

    fn best_match(&self, token: &str, threshold: f32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (i, skill) in self.vocabulary.skills().iter().enumerate() {
            let ratio = sequence_ratio(token, skill.as_str());
            // Strictly greater: ties go to the earlier vocabulary entry.
            if best.map_or(true, |(_, score)| ratio > score) {
                best = Some((i, ratio));
            }
        }
        best.filter(|&(_, score)| score >= threshold.max(self.cutoff))
    }
}

/// `2·M / T` over characters, where `M` counts characters in matching blocks
/// and `T` is the combined length. 1.0 for two empty strings.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

impl SkillMatcher for FuzzyMatcher {
    fn backend(&self) -> MatcherBackend {
        MatcherBackend::Fuzzy
    }

    fn best_matches(
        &self,
        tokens: &[&str],
        threshold: f32,
    ) -> Result<Vec<Option<Candidate>>, EmbeddingError> {
        Ok(tokens
            .iter()
            .map(|token| self.best_match(token, threshold))
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Semantic (sentence embeddings)
// ────────────────────────────────────────────────────────────────────────────

pub struct SemanticMatcher {
    embedder: Box<dyn Embedder>,
    vocabulary_embeddings: Vec<Vec<f32>>,
}

impl SemanticMatcher {
    /// Embeds the whole vocabulary up front.
    pub fn new(embedder: Box<dyn Embedder>, vocabulary: &Vocabulary) -> Result<Self, EmbeddingError> {
        let names: Vec<&str> = vocabulary.skills().iter().map(Skill::as_str).collect();
        let vocabulary_embeddings = encode_checked(embedder.as_ref(), &names)?;
        Ok(Self {
            embedder,
            vocabulary_embeddings,
        })
    }
}

impl SkillMatcher for SemanticMatcher {
    fn backend(&self) -> MatcherBackend {
        MatcherBackend::Semantic
    }

    fn best_matches(
        &self,
        tokens: &[&str],
        threshold: f32,
    ) -> Result<Vec<Option<Candidate>>, EmbeddingError> {
        if self.vocabulary_embeddings.is_empty() {
            return Ok(vec![None; tokens.len()]);
        }
        let token_embeddings = encode_checked(self.embedder.as_ref(), tokens)?;
        Ok(token_embeddings
            .iter()
            .map(|query| {
                let mut best: Option<Candidate> = None;
                for (i, candidate) in self.vocabulary_embeddings.iter().enumerate() {
                    let score = cosine(query, candidate);
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((i, score));
                    }
                }
                best.filter(|&(_, score)| score >= threshold)
            })
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerSettings {
    pub threshold: f32,
    pub fallback_cutoff: f32,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_cutoff: FALLBACK_CUTOFF,
        }
    }
}

pub struct Normalizer {
    vocabulary: Arc<Vocabulary>,
    settings: NormalizerSettings,
    fallback: Arc<FuzzyMatcher>,
    factory: EmbedderFactory,
    matcher: OnceCell<Arc<dyn SkillMatcher>>,
}

impl Normalizer {
    /// Normalizer backed by the build's default embedder.
    pub fn new(vocabulary: Arc<Vocabulary>, settings: NormalizerSettings) -> Self {
        Self::with_embedder_factory(vocabulary, settings, default_factory())
    }

    pub fn with_embedder_factory(
        vocabulary: Arc<Vocabulary>,
        settings: NormalizerSettings,
        factory: EmbedderFactory,
    ) -> Self {
        let fallback = Arc::new(FuzzyMatcher::new(
            Arc::clone(&vocabulary),
            settings.fallback_cutoff,
        ));
        Self {
            vocabulary,
            settings,
            fallback,
            factory,
            matcher: OnceCell::new(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Active strategy; selects it on first call.
    pub fn backend(&self) -> MatcherBackend {
        self.matcher().backend()
    }

    /// Active strategy if already selected, without triggering selection.
    pub fn selected_backend(&self) -> Option<MatcherBackend> {
        self.matcher.get().map(|matcher| matcher.backend())
    }

    /// Forces backend selection (and the vocabulary embedding) now.
    pub fn warm_up(&self) -> MatcherBackend {
        self.backend()
    }

    fn matcher(&self) -> &Arc<dyn SkillMatcher> {
        self.matcher.get_or_init(|| self.select_matcher())
    }

    fn select_matcher(&self) -> Arc<dyn SkillMatcher> {
        let semantic = (self.factory)()
            .and_then(|embedder| SemanticMatcher::new(embedder, &self.vocabulary));
        match semantic {
            Ok(matcher) => {
                info!(
                    vocabulary = self.vocabulary.len(),
                    "semantic skill matching enabled"
                );
                Arc::new(matcher)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "embedding model unavailable, falling back to fuzzy string matching"
                );
                self.fallback.clone()
            }
        }
    }

    /// Canonical skill for `token` at the configured threshold.
    pub fn normalize(&self, token: &str) -> Option<Skill> {
        self.normalize_with_threshold(token, self.settings.threshold)
    }

    pub fn normalize_with_threshold(&self, token: &str, threshold: f32) -> Option<Skill> {
        self.resolve(token, threshold).map(|outcome| outcome.skill)
    }

    pub fn resolve(&self, token: &str, threshold: f32) -> Option<MatchOutcome> {
        self.resolve_many(&[token], threshold).pop().flatten()
    }

    /// Resolves a batch of tokens with one embedding call. Output is positional.
    pub fn resolve_many(&self, tokens: &[&str], threshold: f32) -> Vec<Option<MatchOutcome>> {
        let cleaned: Vec<String> = tokens.iter().map(|t| t.trim().to_lowercase()).collect();
        let backend = self.backend();
        let mut outcomes: Vec<Option<MatchOutcome>> = vec![None; tokens.len()];

        // Canonical skills resolve to themselves without scoring.
        let mut pending: Vec<(usize, &str)> = Vec::new();
        for (i, token) in cleaned.iter().enumerate() {
            if token.is_empty() {
                continue;
            }
            match self.vocabulary.lookup(token) {
                Some(skill) => {
                    outcomes[i] = Some(MatchOutcome {
                        skill: skill.clone(),
                        similarity: 1.0,
                        backend,
                    })
                }
                None => pending.push((i, token.as_str())),
            }
        }
        if pending.is_empty() {
            return outcomes;
        }

        let queries: Vec<&str> = pending.iter().map(|&(_, t)| t).collect();
        let (candidates, backend) = match self.matcher().best_matches(&queries, threshold) {
            Ok(found) => (found, backend),
            Err(e) => {
                warn!(error = %e, "semantic matching failed for this batch, using fuzzy matching");
                let found = self
                    .fallback
                    .best_matches(&queries, threshold)
                    .unwrap_or_else(|_| vec![None; queries.len()]);
                (found, MatcherBackend::Fuzzy)
            }
        };

        for ((slot, _), candidate) in pending.iter().zip(candidates) {
            if let Some((position, similarity)) = candidate {
                if let Some(skill) = self.vocabulary.get(position) {
                    outcomes[*slot] = Some(MatchOutcome {
                        skill: skill.clone(),
                        similarity,
                        backend,
                    });
                }
            }
        }
        outcomes
    }

    /// Batch form of `normalize`.
    pub fn normalize_many(&self, tokens: &[&str]) -> Vec<Option<Skill>> {
        self.resolve_many(tokens, self.settings.threshold)
            .into_iter()
            .map(|outcome| outcome.map(|o| o.skill))
            .collect()
    }
}
