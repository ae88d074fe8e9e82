pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod services;

use std::path::PathBuf;
use std::sync::Arc;

use config::LintConfig;
use services::analyzer::{Analyzer, CppcheckAnalyzer};
use services::documents::{DocumentOpener, FsDocumentOpener};
use services::output::{ConsoleOutput, OutputChannel, UserOutput};
use services::publisher::DiagnosticCollection;
use services::suppression::SuppressionRegistry;

/// State owned by one activation of the linter.
///
/// Built by the host on startup and dropped on shutdown. Lint runs take
/// it by `&mut`, which keeps the registry and store consistent with each
/// other without locking.
pub struct LintContext {
    pub config: LintConfig,
    pub workspace_root: PathBuf,
    pub registry: SuppressionRegistry,
    pub store: DiagnosticCollection,
    pub analyzer: Arc<dyn Analyzer>,
    pub opener: Arc<dyn DocumentOpener>,
    pub output: Arc<dyn UserOutput>,
    pub channel: Arc<dyn OutputChannel>,
}

impl LintContext {
    pub fn new(
        config: LintConfig,
        workspace_root: impl Into<PathBuf>,
        analyzer: Arc<dyn Analyzer>,
        opener: Arc<dyn DocumentOpener>,
        output: Arc<dyn UserOutput>,
        channel: Arc<dyn OutputChannel>,
    ) -> Self {
        let mut registry = SuppressionRegistry::new();
        registry.set_allow_inline_suppressions(config.allow_inline_suppressions);
        Self {
            config,
            workspace_root: workspace_root.into(),
            registry,
            store: DiagnosticCollection::new(),
            analyzer,
            opener,
            output,
            channel,
        }
    }

    /// Context wired to the real executable, the filesystem, and the terminal.
    pub fn console(config: LintConfig, workspace_root: impl Into<PathBuf>) -> Self {
        let console = Arc::new(ConsoleOutput);
        let analyzer = Arc::new(CppcheckAnalyzer::new(console.clone(), console.clone()));
        Self::new(
            config,
            workspace_root,
            analyzer,
            Arc::new(FsDocumentOpener),
            console.clone(),
            console,
        )
    }

    /// Swap in new settings. Published state is left for the next run.
    pub fn reconfigure(&mut self, config: LintConfig) {
        self.registry
            .set_allow_inline_suppressions(config.allow_inline_suppressions);
        self.config = config;
    }
}
