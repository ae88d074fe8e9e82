//! Text documents and the capability that opens them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::LintError;

/// Line-addressable snapshot of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub path: PathBuf,
    lines: Vec<String>,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Text of a 0-based line, without its terminator.
    pub fn line_at(&self, line: u32) -> Option<&str> {
        self.lines.get(line as usize).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Opens documents for the publisher. May fail per file.
#[async_trait]
pub trait DocumentOpener: Send + Sync {
    async fn open(&self, path: &Path) -> Result<TextDocument, LintError>;
}

/// Reads documents straight from disk.
#[derive(Debug, Default)]
pub struct FsDocumentOpener;

#[async_trait]
impl DocumentOpener for FsDocumentOpener {
    async fn open(&self, path: &Path) -> Result<TextDocument, LintError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LintError::DocumentOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(TextDocument::new(path, &text))
    }
}
