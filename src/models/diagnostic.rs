//! Analyzer-side records: one `CppcheckDiagnostic` per reported error.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity categories reported by cppcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
    Style,
    Performance,
    Portability,
    Information,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Error,
        Self::Warning,
        Self::Style,
        Self::Performance,
        Self::Portability,
        Self::Information,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Style => "style",
            Self::Performance => "performance",
            Self::Portability => "portability",
            Self::Information => "information",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// A single diagnostic as reported by the analyzer.
///
/// `id` names the defect class and is not unique: the same check fires at
/// many locations. `severity` is kept verbatim so that levels outside the
/// six known categories still reach the severity mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppcheckDiagnostic {
    pub id: String,
    pub severity: String,
    pub file: PathBuf,
    /// 1-based; 0 marks a file-level diagnostic.
    pub line: u32,
    pub message: String,
}

impl CppcheckDiagnostic {
    /// Identity check used for deduplication. Message text does not take part.
    pub fn is_same_as(&self, other: &Self) -> bool {
        self.id == other.id && self.file == other.file && self.line == other.line
    }

    /// The known category for `severity`, if any.
    pub fn category(&self) -> Option<Category> {
        self.severity.parse().ok()
    }
}
