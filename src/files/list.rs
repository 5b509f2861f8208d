/*!
 * Directory Lister
 * Best-effort enumeration of direct children under a sandbox root
 */

use std::cmp::Ordering;
use std::fs;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tracing::debug;

use crate::core::errors::{GatewayError, GatewayResult};
use crate::files::registry::FileRoot;
use crate::files::resolve::{relative_display, resolve, ResolveOptions};

/// Entry classification on the wire
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One directory child, relative to its root
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    pub relative_path: String,
    pub size: u64,
    pub modified_at: u64,
}

/// Listing of a directory under a root
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub current_path: String,
    pub parent_path: Option<String>,
    pub entries: Vec<DirectoryEntry>,
}

/// List the direct children of a directory under `root`
///
/// A stat failure on one child (broken symlink, permission denied) never
/// fails the whole listing: the entry is kept with zeroed metadata and the
/// kind the directory entry itself reports, or `other`.
pub fn list(root: &FileRoot, relative: &str, opts: &ResolveOptions) -> GatewayResult<DirectoryListing> {
    let resolved = resolve(root, relative, opts)?;
    let current_path = relative_display(root, &resolved);

    let md = fs::metadata(&resolved).map_err(|e| GatewayError::from_io(e, &current_path))?;
    if !md.is_dir() {
        return Err(GatewayError::NotADirectory(current_path));
    }

    let mut entries = Vec::new();
    let read_dir = fs::read_dir(&resolved).map_err(|e| GatewayError::from_io(e, &current_path))?;
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            // Non-UTF-8 names cannot be represented in the JSON contract
            Err(_) => continue,
        };
        if !opts.allow_hidden && name.starts_with('.') {
            continue;
        }

        // Follow symlinks for metadata like the stat the original performed;
        // on failure fall back to the raw directory-entry type.
        let (kind, size, modified_at) = match fs::metadata(dir_entry.path()) {
            Ok(md) => (EntryKind::from(md.file_type()), md.len(), modified_millis(&md)),
            Err(_) => {
                let kind = dir_entry
                    .file_type()
                    .map(EntryKind::from)
                    .unwrap_or(EntryKind::Other);
                (kind, 0, 0)
            }
        };

        let relative_path = if current_path == "." {
            name.clone()
        } else {
            format!("{current_path}/{name}")
        };
        entries.push(DirectoryEntry {
            name,
            kind,
            relative_path,
            size,
            modified_at,
        });
    }

    entries.sort_by(compare_entries);

    Ok(DirectoryListing {
        parent_path: parent_path(&current_path),
        current_path,
        entries,
    })
}

/// Directories first, then case-sensitive name order within each group
fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    let a_dir = a.kind == EntryKind::Directory;
    let b_dir = b.kind == EntryKind::Directory;
    b_dir.cmp(&a_dir).then_with(|| a.name.cmp(&b.name))
}

/// Relative path one level up, `None` when already at the root
fn parent_path(current: &str) -> Option<String> {
    if current == "." {
        return None;
    }
    match current.rsplit_once('/') {
        Some((parent, _)) => Some(parent.to_string()),
        None => Some(".".to_string()),
    }
}

fn modified_millis(md: &fs::Metadata) -> u64 {
    md.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_root(temp: &TempDir) -> FileRoot {
        FileRoot {
            id: "data".to_string(),
            name: "data".to_string(),
            base_path: temp.path().canonicalize().unwrap(),
            read_only: true,
        }
    }

    #[test]
    fn test_directories_sort_before_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("zeta")).unwrap();
        std::fs::create_dir(temp.path().join("alpha")).unwrap();
        std::fs::write(temp.path().join("a.txt"), b"a").unwrap();
        std::fs::write(temp.path().join("z.txt"), b"z").unwrap();
        let root = test_root(&temp);

        let listing = list(&root, "", &ResolveOptions::default()).unwrap();
        let names: Vec<&str> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "a.txt", "z.txt"]);
        assert_eq!(listing.current_path, ".");
        assert_eq!(listing.parent_path, None);
    }

    #[test]
    fn test_hidden_children_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), b"secret").unwrap();
        std::fs::write(temp.path().join("visible.txt"), b"ok").unwrap();
        let root = test_root(&temp);

        let listing = list(&root, "", &ResolveOptions::default()).unwrap();
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].name, "visible.txt");

        let listing = list(&root, "", &ResolveOptions { allow_hidden: true }).unwrap();
        assert_eq!(listing.entries.len(), 2);
    }

    #[test]
    fn test_entry_paths_are_root_relative() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("notes")).unwrap();
        std::fs::write(temp.path().join("notes/a.txt"), b"hello").unwrap();
        let root = test_root(&temp);

        let listing = list(&root, "notes", &ResolveOptions::default()).unwrap();
        assert_eq!(listing.current_path, "notes");
        assert_eq!(listing.parent_path, Some(".".to_string()));
        assert_eq!(listing.entries[0].relative_path, "notes/a.txt");
        assert_eq!(listing.entries[0].size, 5);
        assert!(listing.entries[0].modified_at > 0);
    }

    #[test]
    fn test_nested_parent_path() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
        let root = test_root(&temp);

        let listing = list(&root, "a/b/c", &ResolveOptions::default()).unwrap();
        assert_eq!(listing.parent_path, Some("a/b".to_string()));
    }

    #[test]
    fn test_not_a_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("plain.txt"), b"x").unwrap();
        let root = test_root(&temp);

        assert_eq!(
            list(&root, "plain.txt", &ResolveOptions::default()).unwrap_err(),
            GatewayError::NotADirectory("plain.txt".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_kept_with_zeroed_metadata() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("gone"),
            temp.path().join("dangling"),
        )
        .unwrap();
        std::fs::write(temp.path().join("ok.txt"), b"ok").unwrap();
        let root = test_root(&temp);

        let listing = list(&root, "", &ResolveOptions::default()).unwrap();
        let dangling = listing
            .entries
            .iter()
            .find(|e| e.name == "dangling")
            .expect("broken symlink must still be listed");
        assert_eq!(dangling.kind, EntryKind::Other);
        assert_eq!(dangling.size, 0);
        assert_eq!(dangling.modified_at, 0);
    }
}
