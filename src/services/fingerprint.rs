//! Workspace fingerprint used to detect source changes between polls.
//!
//! The fingerprint covers path, size, and modification time of every C/C++
//! source or header under the workspace root. File contents are not read.

use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::services::resolver::is_source_file;

/// Compute the fingerprint of all sources under `root`.
///
/// Unreadable entries are skipped. Hidden directories (`.git` and the like)
/// are not descended into.
pub fn compute_workspace(root: &Path) -> String {
    let mut entries: Vec<String> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            Some(format!(
                "{}:{}:{}",
                entry.path().display(),
                meta.len(),
                modified
            ))
        })
        .collect();
    entries.sort();
    hash(&entries.join("\n"))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// SHA-256 hash a string and return hex-encoded digest.
fn hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
