//! Loads the three static configuration documents.
//!
//! A missing or malformed document never aborts startup: the loader logs the
//! `ConfigError` and substitutes an empty collection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::error;

use crate::catalog::resources::{ResourceEntry, ResourceLibrary};
use crate::catalog::roles::{Role, RoleCatalog, RoleDocument};
use crate::catalog::vocabulary::{SkillMatrix, Vocabulary};

pub const SKILLS_MATRIX_FILE: &str = "skills_matrix.json";
pub const ROLES_FILE: &str = "roles.json";
pub const LEARNING_RESOURCES_FILE: &str = "learning_resources.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and deserializes one JSON document, enforcing its schema.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a roles document, keeping the document's key order.
pub fn read_roles(path: &Path) -> Result<RoleCatalog, ConfigError> {
    let raw: serde_json::Map<String, serde_json::Value> = read_document(path)?;
    let roles = raw
        .into_iter()
        .map(|(slug, value)| {
            serde_json::from_value::<RoleDocument>(value)
                .map(|doc| Role::from_document(&slug, doc))
                .map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RoleCatalog::new(roles))
}

pub fn load_vocabulary(dir: &Path) -> Vocabulary {
    let path = dir.join(SKILLS_MATRIX_FILE);
    match read_document::<SkillMatrix>(&path) {
        Ok(matrix) => Vocabulary::from_matrix(&matrix),
        Err(e) => {
            error!(error = %e, "skill vocabulary unavailable; continuing with an empty vocabulary");
            Vocabulary::default()
        }
    }
}

pub fn load_roles(dir: &Path) -> RoleCatalog {
    let path = dir.join(ROLES_FILE);
    read_roles(&path).unwrap_or_else(|e| {
        error!(error = %e, "role catalog unavailable; continuing with no roles");
        RoleCatalog::default()
    })
}

/// Parses a resources document in key order, so keys differing only in case
/// merge in the order they appear.
pub fn read_resources(path: &Path) -> Result<ResourceLibrary, ConfigError> {
    let raw: serde_json::Map<String, serde_json::Value> = read_document(path)?;
    let entries = raw
        .into_iter()
        .map(|(skill, value)| {
            serde_json::from_value::<ResourceEntry>(value)
                .map(|entry| (skill, entry))
                .map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResourceLibrary::new(entries))
}

pub fn load_resources(dir: &Path) -> ResourceLibrary {
    let path = dir.join(LEARNING_RESOURCES_FILE);
    read_resources(&path).unwrap_or_else(|e| {
        error!(error = %e, "learning resources unavailable; every skill will use the placeholder resource");
        ResourceLibrary::default()
    })
}
