/*!
 * Sidecar API Types
 * Wire DTOs for the file endpoints
 */

use serde::{Deserialize, Serialize};

use crate::files::list::DirectoryListing;
use crate::files::read::FilePreview;
use crate::files::registry::FileRoot;

/// Common query parameters for the file endpoints
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileQuery {
    pub root: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "maxBytes")]
    pub max_bytes: Option<u64>,
}

/// Root identity echoed in listing and read responses
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RootRef {
    pub id: String,
    pub name: String,
}

impl From<&FileRoot> for RootRef {
    fn from(root: &FileRoot) -> Self {
        Self {
            id: root.id.clone(),
            name: root.name.clone(),
        }
    }
}

/// `GET /files/roots`
#[derive(Debug, Clone, Serialize)]
pub struct RootsResponse {
    pub roots: Vec<FileRoot>,
}

/// `GET /files/list`
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub root: RootRef,
    #[serde(flatten)]
    pub listing: DirectoryListing,
}

/// `GET /files/read`
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    pub root: RootRef,
    #[serde(flatten)]
    pub preview: FilePreview,
}
