//! Turn parsed records into host diagnostics.
//!
//! Documents are opened concurrently, one task per file. Results are
//! applied to the registry and store as each open completes, so files land
//! in completion order. A file that cannot be opened is logged and skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::SeverityTable;
use crate::models::diagnostic::CppcheckDiagnostic;
use crate::models::published::{Position, PublishedDiagnostic, Range, DIAGNOSTIC_SOURCE};
use crate::parsers::FileDiagnostics;
use crate::services::documents::{DocumentOpener, TextDocument};
use crate::services::severity::{map_severity, SeverityMapping};
use crate::services::suppression::SuppressionRegistry;

/// The host's diagnostics store, keyed by document path.
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    entries: BTreeMap<PathBuf, Vec<PublishedDiagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace everything stored for `path`.
    pub fn set(&mut self, path: PathBuf, diagnostics: Vec<PublishedDiagnostic>) {
        self.entries.insert(path, diagnostics);
    }

    pub fn get(&self, path: &Path) -> Option<&[PublishedDiagnostic]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Vec<PublishedDiagnostic>)> {
        self.entries.iter()
    }

    /// Number of documents with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total diagnostics across all documents.
    pub fn diagnostic_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Counters for one publish cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub files: usize,
    pub published: usize,
    pub suppressed: usize,
    pub skipped_files: usize,
}

/// Publish grouped records into `store`, registering each published code.
///
/// Never fails: open errors and task panics only skip the affected file.
pub async fn publish(
    grouped: FileDiagnostics,
    table: &SeverityTable,
    opener: Arc<dyn DocumentOpener>,
    registry: &mut SuppressionRegistry,
    store: &mut DiagnosticCollection,
) -> PublishSummary {
    let mut summary = PublishSummary::default();
    let mut tasks = JoinSet::new();

    for (path, records) in grouped {
        let opener = Arc::clone(&opener);
        tasks.spawn(async move {
            let document = opener.open(&path).await;
            (path, records, document)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (path, records, document) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!(error = %e, "Document task failed");
                summary.skipped_files += 1;
                continue;
            }
        };

        let document = match document {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping diagnostics for unopenable document"
                );
                summary.skipped_files += 1;
                continue;
            }
        };

        let mut diagnostics = Vec::with_capacity(records.len());
        for record in records {
            let severity = match map_severity(&record.severity, table) {
                SeverityMapping::Show(severity) => severity,
                SeverityMapping::Suppressed => {
                    summary.suppressed += 1;
                    continue;
                }
            };
            let code = Uuid::now_v7().to_string();
            diagnostics.push(PublishedDiagnostic {
                range: line_range(&document, record.line),
                message: format!("({}) {}", record.severity, record.message),
                severity,
                source: DIAGNOSTIC_SOURCE,
                code: code.clone(),
            });
            registry.add(code, record);
        }

        summary.files += 1;
        summary.published += diagnostics.len();
        tracing::debug!(
            path = %path.display(),
            count = diagnostics.len(),
            "Publishing diagnostics"
        );
        store.set(path, diagnostics);
    }

    summary
}

/// Range from the first non-whitespace character to the end of the line.
///
/// `reported_line` is 1-based; 0 stays 0 and addresses the first line.
/// Blank lines highlight the whole (empty or whitespace) line and lines past
/// the end of the document collapse to an empty range.
pub fn line_range(document: &TextDocument, reported_line: u32) -> Range {
    let line = if reported_line > 0 {
        reported_line - 1
    } else {
        reported_line
    };

    let Some(text) = document.line_at(line) else {
        let at = Position::new(line, 0);
        return Range { start: at, end: at };
    };

    let end = char_len(text);
    let start = text
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(byte, _)| char_len(&text[..byte]))
        .unwrap_or(0);

    Range {
        start: Position::new(line, start),
        end: Position::new(line, end),
    }
}

fn char_len(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// Look up the record behind a published diagnostic.
pub fn source_record<'a>(
    registry: &'a SuppressionRegistry,
    diagnostic: &PublishedDiagnostic,
) -> Option<&'a CppcheckDiagnostic> {
    registry.lookup(&diagnostic.code)
}
