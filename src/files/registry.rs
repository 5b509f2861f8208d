/*!
 * Root Registry
 * Named filesystem mount points validated once at startup
 */

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::config::RootCandidate;
use crate::core::errors::{GatewayError, GatewayResult};

/// A logical named mount point for file browsing
///
/// `base_path` is canonical (symlinks resolved) so containment checks in the
/// resolver can compare components directly.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRoot {
    pub id: String,
    pub name: String,
    #[serde(rename = "path")]
    pub base_path: PathBuf,
    pub read_only: bool,
}

/// Registry of file roots, immutable after startup
///
/// The candidate list is filtered down to entries whose base path exists as
/// a directory at boot. Nothing mutates the set afterwards.
#[derive(Debug, Clone)]
pub struct RootRegistry {
    roots: Vec<FileRoot>,
}

impl RootRegistry {
    /// Build the registry from configured candidates
    ///
    /// Candidates whose path is missing or not a directory are skipped with
    /// a warning; the survivors keep their configured order.
    pub fn from_candidates(candidates: &[RootCandidate]) -> Self {
        let mut roots = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let canonical = match candidate.path.canonicalize() {
                Ok(p) if p.is_dir() => p,
                Ok(_) => {
                    warn!(id = %candidate.id, "root candidate is not a directory, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(id = %candidate.id, error = %e, "root candidate unavailable, skipping");
                    continue;
                }
            };
            info!(id = %candidate.id, "registered file root");
            roots.push(FileRoot {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                base_path: canonical,
                read_only: true,
            });
        }
        Self { roots }
    }

    /// All registered roots, in configured order
    pub fn roots(&self) -> &[FileRoot] {
        &self.roots
    }

    /// Look up a root by id; `None` selects the first configured root
    pub fn get(&self, id: Option<&str>) -> GatewayResult<&FileRoot> {
        if self.roots.is_empty() {
            return Err(GatewayError::NoRootsConfigured);
        }
        match id {
            None => Ok(&self.roots[0]),
            Some(id) => self
                .roots
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| GatewayError::RootNotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
