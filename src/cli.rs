//! CLI argument parsing via `clap` and the command handlers behind it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::errors::LintError;
use crate::models::diagnostic::CppcheckDiagnostic;
use crate::models::published::TextEdit;
use crate::parsers::plain::PlainParser;
use crate::parsers::Parser as _;
use crate::services::linter::{self, LintOutcome};
use crate::services::watch;
use crate::LintContext;

/// Top-level CLI options and subcommands.
#[derive(Parser, Debug)]
#[command(
    name = "cppcheck-lint",
    version,
    about = "Run cppcheck over a C/C++ workspace and publish its diagnostics",
    long_about = "Run cppcheck over a C/C++ workspace.\n\nSettings are read from .cppcheck-lint.json in the workspace root unless --settings is given.",
    after_help = "Examples:\n  cppcheck-lint analyze-file src/main.c\n  cppcheck-lint lint --format json\n  cppcheck-lint lint --watch\n  cppcheck-lint suppress src/main.c 12 nullPointer",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Workspace root (default: $CPPCHECK_WORKSPACE or current dir)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Settings file (default: <workspace>/.cppcheck-lint.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one file and print the report
    AnalyzeFile {
        file: PathBuf,
    },
    /// Analyze the whole workspace and print the report
    AnalyzeWorkspace,
    /// Lint the workspace and print the published diagnostics
    #[command(
        after_help = "Examples:\n  cppcheck-lint lint\n  cppcheck-lint lint --format json --watch"
    )]
    Lint {
        #[arg(long, value_enum, default_value_t = OutputMode::Human)]
        format: OutputMode,
        /// Keep linting whenever sources change, until Ctrl-C
        #[arg(long, action = clap::ArgAction::SetTrue)]
        watch: bool,
    },
    /// Insert an inline suppression comment above a reported line
    Suppress {
        file: PathBuf,
        /// 1-based line as reported by cppcheck
        line: u32,
        /// Check id, e.g. nullPointer
        id: String,
    },
    /// Check the settings file and report invalid values
    Validate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

/// Dispatch a parsed command against `ctx`.
pub async fn run(cmd: Commands, ctx: &mut LintContext) -> Result<ExitCode, LintError> {
    match cmd {
        Commands::AnalyzeFile { file } => {
            let file = absolute(&ctx.workspace_root, &file);
            let report = linter::analyze_file(ctx, &file).await;
            Ok(summarize_report(ctx, report.as_deref()))
        }
        Commands::AnalyzeWorkspace => {
            let report = linter::analyze_workspace(ctx).await;
            Ok(summarize_report(ctx, report.as_deref()))
        }
        Commands::Lint { format, watch: false } => {
            let Some(outcome) = linter::execute(ctx).await else {
                return Ok(ExitCode::FAILURE);
            };
            print_diagnostics(ctx, &outcome, format);
            Ok(if ctx.store.diagnostic_count() == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Lint { format, watch: true } => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                }
            };
            watch::run_continuous(ctx, shutdown, |ctx, outcome| {
                print_diagnostics(ctx, outcome, format);
            })
            .await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Suppress { file, line, id } => {
            let file = absolute(&ctx.workspace_root, &file);
            let diagnostic = CppcheckDiagnostic {
                id,
                severity: String::new(),
                file: file.clone(),
                line,
                message: String::new(),
            };
            let edit = ctx.registry.suppress(&diagnostic, ctx.output.as_ref());
            apply_text_edit(&file, &edit).await?;
            tracing::info!(
                path = %file.display(),
                line = edit.position.line,
                "Inserted suppression"
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate => {
            let issues = ctx.config.validate();
            for issue in &issues {
                println!("{}: {}", issue.field, issue.message);
            }
            if issues.is_empty() {
                println!("Settings OK");
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
    }
}

fn absolute(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Count the findings in an interactive report.
fn summarize_report(ctx: &LintContext, report: Option<&str>) -> ExitCode {
    let Some(report) = report else {
        return ExitCode::FAILURE;
    };
    match PlainParser::new() {
        Ok(parser) => {
            let parsed = parser.parse(report, &ctx.workspace_root);
            println!(
                "{} finding(s) in {} file(s)",
                parsed.record_count(),
                parsed.files.len()
            );
        }
        Err(e) => tracing::error!(error = %e, "Report pattern failed to compile"),
    }
    ExitCode::SUCCESS
}

fn print_diagnostics(ctx: &LintContext, outcome: &LintOutcome, format: OutputMode) {
    match format {
        OutputMode::Human => {
            for (path, diagnostics) in ctx.store.iter() {
                for d in diagnostics {
                    println!(
                        "{}:{}:{}: {}: {} [{}]",
                        path.display(),
                        d.range.start.line + 1,
                        d.range.start.character + 1,
                        d.severity,
                        d.message,
                        d.code
                    );
                }
            }
            println!(
                "{} diagnostic(s) in {} file(s), {} hidden by severity settings",
                outcome.publish.published, outcome.publish.files, outcome.publish.suppressed
            );
        }
        OutputMode::Json => {
            let files: Vec<_> = ctx
                .store
                .iter()
                .map(|(path, diagnostics)| {
                    let actions = ctx
                        .registry
                        .provide_code_actions(diagnostics.iter().map(|d| d.code.as_str()));
                    json!({
                        "file": path,
                        "diagnostics": diagnostics,
                        "actions": actions,
                    })
                })
                .collect();
            println!("{}", json!({ "files": files, "summary": {
                "records": outcome.records,
                "dropped": outcome.dropped,
                "duplicates": outcome.duplicates,
                "published": outcome.publish.published,
                "suppressed": outcome.publish.suppressed,
                "skippedFiles": outcome.publish.skipped_files,
            }}));
        }
    }
}

/// Apply a single insertion to a file on disk.
///
/// `position.line` may equal the line count (append at end); beyond that
/// the edit is rejected. `character` counts chars and is clamped to the line.
pub async fn apply_text_edit(path: &Path, edit: &TextEdit) -> Result<(), LintError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LintError::DocumentOpen {
            path: path.to_path_buf(),
            source,
        })?;
    let updated = insert_at(&text, edit).ok_or_else(|| LintError::LineOutOfRange {
        path: path.to_path_buf(),
        line: edit.position.line,
    })?;
    tokio::fs::write(path, updated).await?;
    Ok(())
}

fn insert_at(text: &str, edit: &TextEdit) -> Option<String> {
    let line = edit.position.line as usize;
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n');
    for _ in 0..line {
        offset += lines.next()?.len();
    }
    let current = &text[offset..];
    let current = current.split('\n').next().unwrap_or_default();
    let column = current
        .char_indices()
        .nth(edit.position.character as usize)
        .map(|(byte, _)| byte)
        .unwrap_or(current.len());

    let mut updated = String::with_capacity(text.len() + edit.text.len());
    updated.push_str(&text[..offset + column]);
    updated.push_str(&edit.text);
    updated.push_str(&text[offset + column..]);
    Some(updated)
}
