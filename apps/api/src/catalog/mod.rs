//! Static catalogs: skill vocabulary, role catalog, learning resources.
//!
//! Built once at startup and shared read-only (`Arc<Catalog>`) by every request.

pub mod loader;
pub mod resources;
pub mod roles;
pub mod vocabulary;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::resources::ResourceLibrary;
use crate::catalog::roles::RoleCatalog;
use crate::catalog::vocabulary::Vocabulary;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub vocabulary: Arc<Vocabulary>,
    pub roles: RoleCatalog,
    pub resources: ResourceLibrary,
}

impl Catalog {
    /// Assembles a catalog and reports role skills that have no vector dimension.
    /// Those skills still count as required; they just never add to similarity.
    pub fn new(vocabulary: Vocabulary, roles: RoleCatalog, resources: ResourceLibrary) -> Self {
        for role in roles.iter() {
            let unknown = role.out_of_vocabulary(&vocabulary);
            if !unknown.is_empty() {
                let names: Vec<&str> = unknown.iter().map(|s| s.as_str()).collect();
                warn!(
                    role = %role.slug,
                    skills = ?names,
                    "role requires skills outside the vocabulary; they are ignored by vector similarity"
                );
            }
        }
        Self {
            vocabulary: Arc::new(vocabulary),
            roles,
            resources,
        }
    }

    /// Loads `skills_matrix.json`, `roles.json` and `learning_resources.json` from `dir`.
    pub fn load(dir: &Path) -> Self {
        let catalog = Self::new(
            loader::load_vocabulary(dir),
            loader::load_roles(dir),
            loader::load_resources(dir),
        );
        info!(
            vocabulary = catalog.vocabulary.len(),
            roles = catalog.roles.len(),
            resource_skills = catalog.resources.skill_count(),
            "catalog loaded from {}",
            dir.display()
        );
        debug!(roles = ?catalog.roles.slugs().collect::<Vec<_>>(), "roles available");
        if catalog.vocabulary.is_empty() || catalog.roles.is_empty() {
            warn!("catalog has no skills or no roles; every analysis will come back empty");
        }
        catalog
    }
}
