/*!
 * Path Sandbox Resolver
 * Resolves (root, relative path) pairs to contained absolute paths
 *
 * This is the single security-critical primitive: every filesystem access in
 * the crate goes through `resolve`. The containment check runs on the
 * canonical result, never on the literal input, so `..` chains, absolute
 * inputs, and symlinks pointing outside the root are all caught the same way.
 */

use std::path::{Component, Path, PathBuf};

use crate::core::errors::{GatewayError, GatewayResult};
use crate::files::registry::FileRoot;

/// Per-request resolution options
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Allow dot-prefixed segments in the requested path
    pub allow_hidden: bool,
}

/// Resolve a relative path against a root, enforcing containment
///
/// - Blank input normalizes to `"."` (the root itself).
/// - With `allow_hidden` off, any input segment starting with `.` fails with
///   `HiddenPathDenied`. `.` and `..` segments are exempt: an escape attempt
///   must report as an escape, not as a hidden path.
/// - The joined path is normalized lexically, canonicalized when it exists,
///   and must stay equal to or under `root.base_path`.
pub fn resolve(root: &FileRoot, relative: &str, opts: &ResolveOptions) -> GatewayResult<PathBuf> {
    let trimmed = relative.trim();
    let input = if trimmed.is_empty() { "." } else { trimmed };

    if !opts.allow_hidden {
        for segment in input.split(['/', '\\']) {
            if segment.starts_with('.') && segment != "." && segment != ".." {
                return Err(GatewayError::HiddenPathDenied(input.to_string()));
            }
        }
    }

    // An absolute input replaces the base on join and then has to survive
    // the same containment check as everything else.
    let joined = root.base_path.join(input);
    let normalized = normalize_lexical(&joined);

    // Canonicalize existing paths so symlinks cannot smuggle the result out
    // of the root. Non-existent paths keep the lexical form; later stat
    // calls report NotFound.
    let resolved = if normalized.exists() {
        normalized
            .canonicalize()
            .map_err(|e| GatewayError::from_io(e, input))?
    } else {
        normalized
    };

    if !resolved.starts_with(&root.base_path) {
        return Err(GatewayError::PathEscape(input.to_string()));
    }

    Ok(resolved)
}

/// Normalize `.` and `..` lexically without touching the filesystem
///
/// Popping past the filesystem root leaves the path at `/`; the containment
/// check in `resolve` turns that into a `PathEscape`.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Root-relative display form of a resolved path, `"."` for the root itself
///
/// Always uses `/` separators; never contains `..` segments because the
/// input is a resolver output.
pub fn relative_display(root: &FileRoot, resolved: &Path) -> String {
    let rel = resolved
        .strip_prefix(&root.base_path)
        .unwrap_or(Path::new(""));
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
