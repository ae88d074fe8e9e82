//! Translate cppcheck severities into host severities.
//!
//! The table value `"None"` hides a whole category. Values the host does
//! not know, and categories missing from the table, map to information.

use crate::config::SeverityTable;
use crate::models::published::HostSeverity;

/// Table value that hides a category.
pub const SUPPRESS_LEVEL: &str = "None";

/// Outcome of mapping one analyzer severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityMapping {
    Show(HostSeverity),
    /// Drop the diagnostic entirely.
    Suppressed,
}

/// Map a cppcheck severity through the user's table.
pub fn map_severity(severity: &str, table: &SeverityTable) -> SeverityMapping {
    match table.get(severity) {
        Some(SUPPRESS_LEVEL) => SeverityMapping::Suppressed,
        Some(level) => {
            SeverityMapping::Show(host_severity(level).unwrap_or(HostSeverity::Information))
        }
        None => SeverityMapping::Show(HostSeverity::Information),
    }
}

fn host_severity(level: &str) -> Option<HostSeverity> {
    match level {
        "Error" => Some(HostSeverity::Error),
        "Warning" => Some(HostSeverity::Warning),
        "Information" => Some(HostSeverity::Information),
        "Hint" => Some(HostSeverity::Hint),
        _ => None,
    }
}
