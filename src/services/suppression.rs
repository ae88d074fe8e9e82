//! Inline suppression of published diagnostics.
//!
//! The registry maps the opaque code of each published diagnostic back to
//! the analyzer record it came from. It is cleared at the start of every
//! lint run and refilled by the publisher.

use std::collections::HashMap;

use crate::models::diagnostic::CppcheckDiagnostic;
use crate::models::published::{CodeAction, Position, TextEdit};
use crate::services::output::UserOutput;

pub const SUPPRESS_ACTION_TITLE: &str = "Suppress this message";

pub const INLINE_DISABLED_WARNING: &str =
    "Cppcheck: Inline suppressions are not currently enabled.";

#[derive(Debug)]
pub struct SuppressionRegistry {
    entries: HashMap<String, CppcheckDiagnostic>,
    allow_inline_suppressions: bool,
}

impl Default for SuppressionRegistry {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            allow_inline_suppressions: true,
        }
    }
}

impl SuppressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Register a published code. An existing entry for `code` is replaced.
    pub fn add(&mut self, code: impl Into<String>, diagnostic: CppcheckDiagnostic) {
        self.entries.insert(code.into(), diagnostic);
    }

    pub fn lookup(&self, code: &str) -> Option<&CppcheckDiagnostic> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_allow_inline_suppressions(&mut self, allow: bool) {
        self.allow_inline_suppressions = allow;
    }

    pub fn allows_inline_suppressions(&self) -> bool {
        self.allow_inline_suppressions
    }

    /// One suppression action per code this registry knows about.
    pub fn provide_code_actions<'a, I>(&self, codes: I) -> Vec<CodeAction>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .filter_map(|code| {
                self.lookup(code).map(|diagnostic| CodeAction {
                    title: SUPPRESS_ACTION_TITLE.to_string(),
                    code: code.to_string(),
                    diagnostic: diagnostic.clone(),
                })
            })
            .collect()
    }

    /// Compute the suppression edit, warning first when the policy is off.
    ///
    /// The warning is advisory; the edit is produced either way.
    pub fn suppress(&self, diagnostic: &CppcheckDiagnostic, output: &dyn UserOutput) -> TextEdit {
        if !self.allow_inline_suppressions {
            output.show_warning(INLINE_DISABLED_WARNING);
        }
        suppression_edit(diagnostic)
    }
}

/// Marker comment inserted above the offending line.
pub fn suppression_comment(id: &str) -> String {
    format!("// cppcheck-suppress {id}\n")
}

/// Insertion at column 0 of the reported line's 0-based index, which puts
/// the marker on the line directly above the finding.
pub fn suppression_edit(diagnostic: &CppcheckDiagnostic) -> TextEdit {
    TextEdit {
        position: Position::new(diagnostic.line.saturating_sub(1), 0),
        text: suppression_comment(&diagnostic.id),
    }
}
