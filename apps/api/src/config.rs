use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::recommend::DEFAULT_TOP_K;
use crate::skills::normalizer::{DEFAULT_THRESHOLD, FALLBACK_CUTOFF};

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed or out-of-range values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding skills_matrix.json, roles.json and learning_resources.json.
    pub resources_dir: PathBuf,
    pub skill_match_threshold: f32,
    pub fuzzy_match_cutoff: f32,
    pub recommend_top_k: usize,
    /// Narrative endpoint is disabled when unset.
    pub llm_server_url: Option<String>,
    pub llm_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            resources_dir: PathBuf::from("resources"),
            skill_match_threshold: DEFAULT_THRESHOLD,
            fuzzy_match_cutoff: FALLBACK_CUTOFF,
            recommend_top_k: DEFAULT_TOP_K,
            llm_server_url: None,
            llm_temperature: 0.7,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            port: parse_or("PORT", &lookup, defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            resources_dir: lookup("ELEVATR_RESOURCES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.resources_dir),
            skill_match_threshold: parse_or(
                "SKILL_MATCH_THRESHOLD",
                &lookup,
                defaults.skill_match_threshold,
            )?,
            fuzzy_match_cutoff: parse_or("FUZZY_MATCH_CUTOFF", &lookup, defaults.fuzzy_match_cutoff)?,
            recommend_top_k: parse_or("RECOMMEND_TOP_K", &lookup, defaults.recommend_top_k)?,
            llm_server_url: lookup("LLM_SERVER_URL").filter(|url| !url.trim().is_empty()),
            llm_temperature: parse_or("LLM_TEMPERATURE", &lookup, defaults.llm_temperature)?,
        };

        require_unit_interval("SKILL_MATCH_THRESHOLD", config.skill_match_threshold)?;
        require_unit_interval("FUZZY_MATCH_CUTOFF", config.fuzzy_match_cutoff)?;
        Ok(config)
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn require_unit_interval(key: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("Environment variable '{key}' must be between 0 and 1, got {value}");
    }
    Ok(())
}
