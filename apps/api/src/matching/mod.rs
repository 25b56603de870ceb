//! Vector Matcher, Gap & Roadmap Engine and Recommendation Ranker.
//! Everything here is a pure function of the catalog and the user's skills.

pub mod gap;
pub mod handlers;
pub mod recommend;
pub mod roadmap;
pub mod scoring;
pub mod vector;
