//! Command-line construction for cppcheck.
//!
//! The argument order is fixed: enable flag, includes, standards, defines,
//! undefines, suppressions, language, platform, mode-dependent switches,
//! then the quoted target. Output compatibility depends on it.

use std::path::{Path, PathBuf};

use crate::config::LintConfig;
use crate::services::paramcheck;

const ENABLE: &str = "--enable=warning,style,performance,portability,information";
const ENABLE_WITH_UNUSED: &str =
    "--enable=warning,style,performance,portability,information,unusedFunction";

/// Variable name that expands to the workspace directory.
pub const WORKSPACE_ROOT_VAR: &str = "workspaceRoot";

/// What cppcheck is asked to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive run over one file.
    File(PathBuf),
    /// Interactive run over the whole workspace.
    Workspace,
    /// Workspace run producing XML for the linter.
    Lint,
}

/// Why an include path could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpansionError {
    #[error("unterminated variable reference")]
    Unterminated,
    #[error("empty variable name")]
    EmptyName,
    #[error("variable '{0}' is not set")]
    Undefined(String),
    #[error("expansion resulted in an empty string")]
    Empty,
}

/// An include path skipped during argument construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludePathError {
    pub path: String,
    pub error: ExpansionError,
}

impl std::fmt::Display for IncludePathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error expanding include path '{}': {}", self.path, self.error)
    }
}

/// Built argument list plus the include paths that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    pub args: Vec<String>,
    pub expansion_errors: Vec<IncludePathError>,
}

/// Build the argument list, resolving variables against the process environment.
pub fn build_params(config: &LintConfig, mode: &RunMode, workspace_root: &Path) -> ParamSet {
    build_params_with(config, mode, workspace_root, |name| std::env::var(name).ok())
}

/// Build the argument list with an explicit variable lookup.
///
/// Deterministic for identical inputs; never fails. Include paths that do
/// not expand are reported in `expansion_errors` and left out.
pub fn build_params_with<F>(
    config: &LintConfig,
    mode: &RunMode,
    workspace_root: &Path,
    lookup: F,
) -> ParamSet
where
    F: Fn(&str) -> Option<String>,
{
    let mut set = ParamSet::default();
    let args = &mut set.args;

    let enable = match mode {
        RunMode::File(_) => ENABLE,
        RunMode::Workspace | RunMode::Lint => ENABLE_WITH_UNUSED,
    };
    args.push(enable.to_string());

    for path in &config.include_paths {
        match expand_variables(path, workspace_root, &lookup) {
            Ok(expanded) => args.push(format!("-I\"{expanded}\"")),
            Err(error) => {
                tracing::warn!(include_path = %path, %error, "Skipping include path");
                set.expansion_errors.push(IncludePathError {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    if config.standard.is_empty() {
        args.push("--std=c++11".to_string());
        args.push("--std=c11".to_string());
    } else {
        args.extend(
            config
                .standard
                .iter()
                .filter(|s| paramcheck::is_valid_standard(s))
                .map(|s| format!("--std={s}")),
        );
    }

    args.extend(config.define.iter().map(|d| format!("-D{d}")));
    args.extend(config.undefine.iter().map(|u| format!("-U{u}")));
    args.extend(config.suppressions.iter().map(|s| format!("--suppress={s}")));

    if let Some(language) = config
        .language
        .as_deref()
        .filter(|l| paramcheck::is_valid_language(l))
    {
        args.push(format!("--language={language}"));
    }

    let platform = config
        .platform
        .as_deref()
        .filter(|p| paramcheck::is_valid_platform(p))
        .unwrap_or("native");
    args.push(format!("--platform={platform}"));

    if *mode != RunMode::Lint {
        if config.verbose {
            args.push("--verbose".to_string());
        }
        if config.inconclusive {
            args.push("--inconclusive".to_string());
        }
    }

    if config.force {
        args.push("--force".to_string());
    }

    if config.allow_inline_suppressions {
        args.push("--inline-suppr".to_string());
    }

    if *mode == RunMode::Lint {
        args.push("--xml-version=2".to_string());
    }

    let target = match mode {
        RunMode::File(file) => file.as_path(),
        RunMode::Workspace | RunMode::Lint => workspace_root,
    };
    args.push(format!("\"{}\"", target.display()));

    set
}

/// Expand `$NAME` and `${NAME}` references, then normalize to forward slashes.
///
/// `workspaceRoot` always resolves to `workspace_root`; other names go
/// through `lookup`. A `$` not followed by a name is kept literally.
pub fn expand_variables<F>(
    input: &str,
    workspace_root: &Path,
    lookup: F,
) -> Result<String, ExpansionError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').ok_or(ExpansionError::Unterminated)?;
            if end == 0 {
                return Err(ExpansionError::EmptyName);
            }
            (&braced[..end], end + 2)
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..len], len)
        };

        if name.is_empty() {
            out.push('$');
        } else if name == WORKSPACE_ROOT_VAR {
            out.push_str(&workspace_root.to_string_lossy());
        } else {
            let value = lookup(name).ok_or_else(|| ExpansionError::Undefined(name.to_string()))?;
            out.push_str(&value);
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);

    if out.is_empty() {
        return Err(ExpansionError::Empty);
    }
    Ok(to_forward_slashes(&out))
}

/// Convert Windows separators, leaving extended-length paths alone.
fn to_forward_slashes(path: &str) -> String {
    if path.starts_with(r"\\?\") {
        path.to_string()
    } else {
        path.replace('\\', "/")
    }
}
