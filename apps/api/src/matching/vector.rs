//! Binary skill vectors over the vocabulary and their cosine similarity.

use crate::catalog::vocabulary::{Skill, Vocabulary};

/// Position `i` is 1 iff `vocabulary[i]` is in the source set.
/// Skills outside the vocabulary have no dimension and are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVector(Vec<u8>);

impl SkillVector {
    pub fn from_skills<'a, I>(skills: I, vocabulary: &Vocabulary) -> Self
    where
        I: IntoIterator<Item = &'a Skill>,
    {
        let mut bits = vec![0u8; vocabulary.len()];
        for skill in skills {
            if let Some(i) = vocabulary.position(skill.as_str()) {
                bits[i] = 1;
            }
        }
        Self(bits)
    }

    /// Number of dimensions, equal to the vocabulary size.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    fn ones(&self) -> u32 {
        self.0.iter().map(|&b| u32::from(b)).sum()
    }

    fn dot(&self, other: &Self) -> u32 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| u32::from(a & b))
            .sum()
    }
}

/// Cosine similarity in `[0, 1]`. Zero-magnitude (or mismatched) vectors score 0.
pub fn cosine_similarity(a: &SkillVector, b: &SkillVector) -> f64 {
    if a.dimensions() != b.dimensions() {
        return 0.0;
    }
    let (mag_a, mag_b) = (a.ones(), b.ones());
    if mag_a == 0 || mag_b == 0 {
        return 0.0;
    }
    let similarity = f64::from(a.dot(b)) / (f64::from(mag_a).sqrt() * f64::from(mag_b).sqrt());
    similarity.clamp(0.0, 1.0)
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
