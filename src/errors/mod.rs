//! Unified error type for configuration, process, and document failures.
//!
//! None of these abort a lint run: the pipeline logs them and drops the
//! affected unit (one file group, one include path, one record).

use std::path::PathBuf;

/// Library error type.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Failed to read settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    SettingsJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not open document {path}: {source}")]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute {executable}: {message}")]
    Spawn { executable: String, message: String },

    #[error("Line {line} is outside of {path}")]
    LineOutOfRange { path: PathBuf, line: u32 },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// Check if this error came from loading the settings file.
    pub fn is_settings(&self) -> bool {
        matches!(self, Self::SettingsIo { .. } | Self::SettingsJson { .. })
    }

    /// Check if this error represents a document that could not be opened.
    pub fn is_document_open(&self) -> bool {
        matches!(self, Self::DocumentOpen { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_errors_are_classified() {
        let err = LintError::SettingsIo {
            path: PathBuf::from("/proj/.cppcheck-lint.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_settings());
        assert!(!err.is_document_open());
    }

    #[test]
    fn document_open_display() {
        let err = LintError::DocumentOpen {
            path: PathBuf::from("a.c"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_document_open());
        assert_eq!(err.to_string(), "Could not open document a.c: missing");
    }

    #[test]
    fn line_out_of_range_display() {
        let err = LintError::LineOutOfRange {
            path: PathBuf::from("main.cpp"),
            line: 42,
        };
        assert_eq!(err.to_string(), "Line 42 is outside of main.cpp");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: LintError = io.into();
        assert!(matches!(err, LintError::Io(_)));
    }
}
