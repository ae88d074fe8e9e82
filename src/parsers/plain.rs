//! Parser for cppcheck's human-readable report lines.
//!
//! Line shape: `[file:line]: (severity) message`, optionally followed by
//! ` [id]` when the analyzer was given an id-bearing template. Any other
//! line (progress output, the report banner) is ignored.

use std::path::Path;

use regex::Regex;

use crate::parsers::{OutputFormat, ParseResult, Parser, RawRecord};

const LINE_PATTERN: &str = r"^\[(?P<file>.+?):(?P<line>\d+)\]: \((?P<severity>[a-z]+)\) (?P<message>.*?)(?: \[(?P<id>[A-Za-z0-9_]+)\])?$";

#[derive(Debug)]
pub struct PlainParser {
    pattern: Regex,
}

impl PlainParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(LINE_PATTERN)?,
        })
    }
}

impl Parser for PlainParser {
    fn parse(&self, output: &str, workspace_root: &Path) -> ParseResult {
        let mut result = ParseResult::default();
        let records = output
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter_map(|line| self.pattern.captures(line));

        for (index, caps) in records.enumerate() {
            let field = |name: &str| {
                caps.name(name)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            let raw = RawRecord {
                id: field("id"),
                severity: field("severity"),
                file: field("file"),
                line: field("line"),
                message: field("message"),
            };
            result.push_raw(index, raw, workspace_root);
        }
        result
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Plain
    }
}
