//! Map reported file paths onto files that exist on disk.

use std::path::{Path, PathBuf};

/// Extensions cppcheck analyzes or includes.
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++", "ipp", "tpp",
];

/// Resolve `reported` against the workspace.
///
/// An absolute path that exists is returned unchanged. A relative path is
/// taken relative to `workspace_root`, the directory cppcheck runs in, never
/// the current directory of this process. `None` means the diagnostic cannot
/// be attributed to a real document.
pub fn resolve(reported: &str, workspace_root: &Path) -> Option<PathBuf> {
    let direct = PathBuf::from(reported);
    if direct.is_absolute() {
        return direct.exists().then_some(direct);
    }
    let joined = workspace_root.join(reported);
    joined.exists().then_some(joined)
}

/// Whether `path` looks like a C/C++ source or header.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
