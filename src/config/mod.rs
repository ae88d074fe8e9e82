//! Runtime and lint configuration.
//!
//! `AppConfig` comes from the process environment (a `.env` file is loaded
//! first by the binary). `LintConfig` is the extension settings object,
//! read from a JSON file using the editor's camelCase keys:
//!
//! ```json
//! {
//!   "enable": true,
//!   "includePaths": ["${workspaceRoot}/include"],
//!   "standard": ["c99"],
//!   "severityLevels": { "style": "None" }
//! }
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::LintError;
use crate::services::paramcheck;

/// Settings file looked up in the workspace root when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = ".cppcheck-lint.json";

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process-level configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub workspace_root: PathBuf,
    pub settings_path: PathBuf,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let workspace_root = match env::var("CPPCHECK_WORKSPACE") {
            Ok(dir) => PathBuf::from(dir),
            Err(env::VarError::NotPresent) => {
                env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
            Err(e) => return Err(e),
        };
        let settings_path = env::var("CPPCHECK_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| workspace_root.join(DEFAULT_SETTINGS_FILE));
        let log_format = match env::var("CPPCHECK_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Ok(Self {
            workspace_root,
            settings_path,
            log_format,
        })
    }
}

/// Mapping from analyzer severity to host severity name.
///
/// Values are kept as written by the user; `"None"` hides the category and
/// unrecognized names fall back to information when mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityTable(HashMap<String, String>);

impl SeverityTable {
    pub fn get(&self, severity: &str) -> Option<&str> {
        self.0.get(severity).map(String::as_str)
    }

    pub fn set(&mut self, severity: &str, level: &str) {
        self.0.insert(severity.to_string(), level.to_string());
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        let table = [
            ("error", "Error"),
            ("warning", "Warning"),
            ("style", "Information"),
            ("performance", "Information"),
            ("portability", "Information"),
            ("information", "Information"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self(table)
    }
}

/// Extension settings. Read-only to the lint pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintConfig {
    pub enable: bool,
    pub cppcheck_path: Option<PathBuf>,
    pub include_paths: Vec<String>,
    pub define: Vec<String>,
    pub undefine: Vec<String>,
    pub suppressions: Vec<String>,
    pub standard: Vec<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub verbose: bool,
    pub force: bool,
    pub inconclusive: bool,
    pub allow_inline_suppressions: bool,
    pub output_command_line: bool,
    pub linting_enabled: bool,
    pub severity_levels: SeverityTable,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enable: false,
            cppcheck_path: None,
            include_paths: Vec::new(),
            define: Vec::new(),
            undefine: Vec::new(),
            suppressions: Vec::new(),
            standard: Vec::new(),
            platform: Some("native".to_string()),
            language: None,
            verbose: false,
            force: false,
            inconclusive: false,
            allow_inline_suppressions: true,
            output_command_line: false,
            linting_enabled: false,
            severity_levels: SeverityTable::default(),
        }
    }
}

/// A configuration value rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl LintConfig {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LintError::SettingsIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| LintError::SettingsJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Report invalid standards, platform, and language.
    ///
    /// Argument construction drops these values on its own; this exists so
    /// the host can tell the user about them.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for standard in &self.standard {
            if !paramcheck::is_valid_standard(standard) {
                issues.push(ConfigIssue {
                    field: "standard",
                    message: format!("Invalid standard given: {standard}"),
                });
            }
        }
        if let Some(platform) = &self.platform {
            if !paramcheck::is_valid_platform(platform) {
                issues.push(ConfigIssue {
                    field: "platform",
                    message: format!("Invalid platform given: {platform}"),
                });
            }
        }
        if let Some(language) = &self.language {
            if !paramcheck::is_valid_language(language) {
                issues.push(ConfigIssue {
                    field: "language",
                    message: format!("Invalid language given: {language}"),
                });
            }
        }
        issues
    }

    /// Fill in `cppcheck_path` from well-known install locations when unset
    /// and disable the analyzer if no executable exists.
    ///
    /// Returns `false` when the executable could not be found.
    pub fn locate_analyzer(&mut self) -> bool {
        if self.cppcheck_path.is_none() {
            self.cppcheck_path = find_cppcheck_path();
        }
        let found = self.cppcheck_path.as_deref().is_some_and(Path::exists);
        if !found {
            self.enable = false;
        }
        found
    }

    /// The analyzer executable as passed to the process runner.
    pub fn executable(&self) -> String {
        self.cppcheck_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cppcheck".to_string())
    }
}

/// Probe the usual install locations for a cppcheck executable.
pub fn find_cppcheck_path() -> Option<PathBuf> {
    let candidates: Vec<PathBuf> = if cfg!(windows) {
        env::var_os("ProgramFiles")
            .map(|pf| vec![PathBuf::from(pf).join("Cppcheck").join("cppcheck.exe")])
            .unwrap_or_default()
    } else {
        ["/usr/bin/cppcheck", "/usr/sbin/cppcheck", "/usr/share/bin/cppcheck"]
            .into_iter()
            .map(PathBuf::from)
            .collect()
    };
    candidates.into_iter().find(|p| p.exists())
}
