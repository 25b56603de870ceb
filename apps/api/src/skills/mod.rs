//! Skill Normalizer and Extractor: free text in, canonical vocabulary skills out.

pub mod embedding;
pub mod extractor;
pub mod handlers;
pub mod intake;
pub mod normalizer;
pub mod resume;
