//! The analyzer capability and its cppcheck-backed implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LintConfig;
use crate::errors::LintError;
use crate::services::output::{OutputChannel, UserOutput};
use crate::services::params::{self, RunMode};
use crate::services::process;

pub const NOT_ENABLED_MESSAGE: &str = "Cppcheck is not enabled.";

/// Runs the analyzer. Every method yields `None` when analysis is disabled.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Interactive run over one file; returns the combined report.
    async fn run_on_file(
        &self,
        config: &LintConfig,
        file: &Path,
        workspace_root: &Path,
    ) -> Option<String>;

    /// Interactive run over the workspace; returns the combined report.
    async fn run_on_workspace(&self, config: &LintConfig, workspace_root: &Path) -> Option<String>;

    /// XML run over the workspace; returns raw stderr.
    async fn run_lint_mode(&self, config: &LintConfig, workspace_root: &Path) -> Option<String>;
}

/// Invokes the cppcheck executable on a blocking worker thread.
pub struct CppcheckAnalyzer {
    output: Arc<dyn UserOutput>,
    channel: Arc<dyn OutputChannel>,
}

impl CppcheckAnalyzer {
    pub fn new(output: Arc<dyn UserOutput>, channel: Arc<dyn OutputChannel>) -> Self {
        Self { output, channel }
    }

    async fn run_mode(
        &self,
        config: &LintConfig,
        mode: RunMode,
        workspace_root: &Path,
    ) -> Option<String> {
        if !config.enable {
            self.output.show_info(NOT_ENABLED_MESSAGE);
            return None;
        }

        let param_set = params::build_params(config, &mode, workspace_root);
        for error in &param_set.expansion_errors {
            self.channel.append_line(&error.to_string());
        }

        let executable = config.executable();
        let echo_command = config.output_command_line;
        let lint = mode == RunMode::Lint;

        let working_dir = workspace_root.to_path_buf();
        match spawn_run(executable, param_set.args, working_dir, lint, echo_command).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!(error = %e, "Analyzer task failed");
                Some(String::new())
            }
        }
    }
}

async fn spawn_run(
    executable: String,
    args: Vec<String>,
    working_dir: PathBuf,
    lint: bool,
    echo_command: bool,
) -> Result<String, LintError> {
    let output = tokio::task::spawn_blocking(move || {
        if lint {
            process::run(&executable, &args, &working_dir).stderr
        } else {
            process::run_report(&executable, &args, &working_dir, echo_command)
        }
    })
    .await?;
    Ok(output)
}

#[async_trait]
impl Analyzer for CppcheckAnalyzer {
    async fn run_on_file(
        &self,
        config: &LintConfig,
        file: &Path,
        workspace_root: &Path,
    ) -> Option<String> {
        self.run_mode(config, RunMode::File(file.to_path_buf()), workspace_root)
            .await
    }

    async fn run_on_workspace(&self, config: &LintConfig, workspace_root: &Path) -> Option<String> {
        self.run_mode(config, RunMode::Workspace, workspace_root).await
    }

    async fn run_lint_mode(&self, config: &LintConfig, workspace_root: &Path) -> Option<String> {
        self.run_mode(config, RunMode::Lint, workspace_root).await
    }
}
