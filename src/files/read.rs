/*!
 * File Reader
 * Bounded preview reads with binary detection, plus download targets
 */

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::errors::{GatewayError, GatewayResult};
use crate::files::registry::FileRoot;
use crate::files::resolve::{relative_display, resolve, ResolveOptions};

/// Smallest preview cap a caller can request
pub const PREVIEW_MIN_BYTES: u64 = 1024;
/// Largest preview cap a caller can request (2 MiB)
pub const PREVIEW_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Bytes of the sample inspected by the binary heuristic
pub const BINARY_SAMPLE_BYTES: usize = 8192;
/// Control-byte fraction above which a sample classifies as binary
pub const CONTROL_RATIO_LIMIT: f64 = 0.12;

/// Result of a bounded preview read
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilePreview {
    pub name: String,
    pub relative_path: String,
    pub size: u64,
    pub modified_at: u64,
    pub binary: bool,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A resolved file ready for full-content streaming
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub path: PathBuf,
    pub relative_path: String,
    pub file_name: String,
    pub size: u64,
}

/// Clamp a caller-supplied preview cap into the supported range
pub fn clamp_preview_bytes(requested: u64) -> u64 {
    requested.clamp(PREVIEW_MIN_BYTES, PREVIEW_MAX_BYTES)
}

/// Read at most `min(clamped max_bytes, file size)` bytes from the start of
/// a file and classify the sample
pub fn read_preview(
    root: &FileRoot,
    relative: &str,
    max_bytes: u64,
    opts: &ResolveOptions,
) -> GatewayResult<FilePreview> {
    let resolved = resolve(root, relative, opts)?;
    let relative_path = relative_display(root, &resolved);

    let md = fs::metadata(&resolved).map_err(|e| GatewayError::from_io(e, &relative_path))?;
    if md.is_dir() {
        return Err(GatewayError::NotAFile(relative_path));
    }

    let cap = clamp_preview_bytes(max_bytes);
    let file = fs::File::open(&resolved).map_err(|e| GatewayError::from_io(e, &relative_path))?;
    let mut sampled = Vec::with_capacity(cap.min(md.len()) as usize);
    file.take(cap)
        .read_to_end(&mut sampled)
        .map_err(|e| GatewayError::from_io(e, &relative_path))?;

    let binary = looks_binary(&sampled);
    let truncated = md.len() > sampled.len() as u64;
    let content = if binary {
        None
    } else {
        Some(String::from_utf8_lossy(&sampled).into_owned())
    };

    Ok(FilePreview {
        name: file_name(&resolved, &relative_path),
        relative_path,
        size: md.len(),
        modified_at: modified_millis(&md),
        binary,
        truncated,
        content,
    })
}

/// Resolve a file for streaming download; the whole file is streamed later,
/// the preview cap does not apply
pub fn open_download(
    root: &FileRoot,
    relative: &str,
    opts: &ResolveOptions,
) -> GatewayResult<DownloadTarget> {
    let resolved = resolve(root, relative, opts)?;
    let relative_path = relative_display(root, &resolved);

    let md = fs::metadata(&resolved).map_err(|e| GatewayError::from_io(e, &relative_path))?;
    if md.is_dir() {
        return Err(GatewayError::NotAFile(relative_path));
    }

    Ok(DownloadTarget {
        file_name: file_name(&resolved, &relative_path),
        path: resolved,
        relative_path,
        size: md.len(),
    })
}

/// Binary heuristic over the first `BINARY_SAMPLE_BYTES` of a sample
///
/// Binary iff the sample contains a NUL byte, or the fraction of control
/// bytes (value < 7, or strictly between 14 and 32 - common whitespace
/// controls excluded) exceeds `CONTROL_RATIO_LIMIT`. Carried over from the
/// source system unchanged; known to misclassify some non-ASCII text
/// encodings (see tests).
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_BYTES)];
    if sample.is_empty() {
        return false;
    }
    let mut control = 0usize;
    for &b in sample {
        if b == 0 {
            return true;
        }
        if b < 7 || (b > 14 && b < 32) {
            control += 1;
        }
    }
    (control as f64) / (sample.len() as f64) > CONTROL_RATIO_LIMIT
}

fn file_name(resolved: &std::path::Path, relative_path: &str) -> String {
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| relative_path.to_string())
}

fn modified_millis(md: &fs::Metadata) -> u64 {
    md.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
