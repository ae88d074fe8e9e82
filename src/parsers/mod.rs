//! Analyzer output parsers.
//!
//! Each parser turns cppcheck output into `CppcheckDiagnostic` records
//! grouped by resolved file. Parsing is best-effort: a bad record is
//! dropped and noted in `errors`, and output that cannot be read at all
//! yields an empty result. Nothing here returns `Err`.

pub mod plain;
pub mod xml;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::diagnostic::CppcheckDiagnostic;
use crate::services::resolver;

/// Records grouped by resolved file, in encounter order within each file.
pub type FileDiagnostics = BTreeMap<PathBuf, Vec<CppcheckDiagnostic>>;

/// Result of parsing one analyzer run.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub files: FileDiagnostics,
    pub errors: Vec<ParseError>,
    pub duplicates: usize,
}

/// A record dropped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub record_index: usize,
    pub field: String,
    pub message: String,
}

impl ParseError {
    fn new(record_index: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            record_index,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Fields of one reported error before path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: String,
    pub severity: String,
    pub file: String,
    pub line: String,
    pub message: String,
}

/// Output formats cppcheck can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `--xml-version=2`, written to stderr.
    Xml,
    /// `[file:line]: (severity) message` lines.
    Plain,
}

/// Trait for analyzer output parsers.
pub trait Parser: Send + Sync {
    /// Parse raw analyzer output, resolving files against `workspace_root`.
    fn parse(&self, output: &str, workspace_root: &Path) -> ParseResult;

    /// The output format this parser reads.
    fn format(&self) -> OutputFormat;
}

impl ParseResult {
    /// Total accepted records across all files.
    pub fn record_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve, validate, and deduplicate one raw record.
    ///
    /// Returns `true` when the record was accepted.
    pub fn push_raw(&mut self, index: usize, raw: RawRecord, workspace_root: &Path) -> bool {
        let line = match raw.line.trim().parse::<u32>() {
            Ok(line) => line,
            Err(_) => {
                self.errors.push(ParseError::new(
                    index,
                    "line",
                    format!("Invalid line number '{}'", raw.line),
                ));
                return false;
            }
        };

        let Some(file) = resolver::resolve(&raw.file, workspace_root) else {
            self.errors.push(ParseError::new(
                index,
                "file",
                format!("Could not resolve '{}'", raw.file),
            ));
            return false;
        };

        let record = CppcheckDiagnostic {
            id: raw.id,
            severity: raw.severity,
            file: file.clone(),
            line,
            message: raw.message,
        };

        let group = self.files.entry(file).or_default();
        if group.iter().any(|existing| existing.is_same_as(&record)) {
            self.duplicates += 1;
            return false;
        }
        group.push(record);
        true
    }
}
