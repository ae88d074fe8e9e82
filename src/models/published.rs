//! Host-side diagnostic model: what ends up in the diagnostics store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::diagnostic::CppcheckDiagnostic;

/// Source tag attached to every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "cppcheck";

/// Diagnostic severities understood by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for HostSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

/// Zero-based line/character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A diagnostic ready to hand to the host's diagnostics store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedDiagnostic {
    pub range: Range,
    pub message: String,
    pub severity: HostSeverity,
    pub source: &'static str,
    /// Join key into the suppression registry; fresh on every publish.
    pub code: String,
}

/// A single text insertion. Applying it is the host's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub position: Position,
    pub text: String,
}

/// A quick-fix offered for a published diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeAction {
    pub title: String,
    pub code: String,
    pub diagnostic: CppcheckDiagnostic,
}
