//! End-to-end tests for lint runs: analyzer output through parsing,
//! publishing, code actions, and suppression edits.
//!
//! The analyzer is a test double serving a canned XML report; documents
//! are real files in a temporary workspace.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cppcheck_lint::cli::apply_text_edit;
use cppcheck_lint::config::LintConfig;
use cppcheck_lint::models::published::{HostSeverity, Position};
use cppcheck_lint::services::analyzer::{Analyzer, NOT_ENABLED_MESSAGE};
use cppcheck_lint::services::documents::FsDocumentOpener;
use cppcheck_lint::services::linter::{self, NOT_SOURCE_MESSAGE};
use cppcheck_lint::services::output::{BufferedChannel, UserOutput};
use cppcheck_lint::services::suppression::INLINE_DISABLED_WARNING;
use cppcheck_lint::services::watch;
use cppcheck_lint::LintContext;

const FIXTURE: &str = include_str!("fixtures/cppcheck_results.xml");

/// Analyzer double: returns `xml` in lint mode and `report` otherwise.
struct CannedAnalyzer {
    xml: Mutex<String>,
    report: String,
    output: Arc<RecordingOutput>,
    lint_runs: AtomicUsize,
}

impl CannedAnalyzer {
    fn new(xml: &str, output: Arc<RecordingOutput>) -> Self {
        Self {
            xml: Mutex::new(xml.to_string()),
            report: "Cppcheck started: now\n[main.c:12]: (error) Null pointer dereference: p\n\nCppcheck ended: now".to_string(),
            output,
            lint_runs: AtomicUsize::new(0),
        }
    }

    fn enabled(&self, config: &LintConfig) -> bool {
        if !config.enable {
            self.output.show_info(NOT_ENABLED_MESSAGE);
        }
        config.enable
    }
}

#[async_trait]
impl Analyzer for CannedAnalyzer {
    async fn run_on_file(&self, config: &LintConfig, _file: &Path, _root: &Path) -> Option<String> {
        self.enabled(config).then(|| self.report.clone())
    }

    async fn run_on_workspace(&self, config: &LintConfig, _root: &Path) -> Option<String> {
        self.enabled(config).then(|| self.report.clone())
    }

    async fn run_lint_mode(&self, config: &LintConfig, _root: &Path) -> Option<String> {
        if !self.enabled(config) {
            return None;
        }
        self.lint_runs.fetch_add(1, Ordering::SeqCst);
        Some(self.xml.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct RecordingOutput {
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl UserOutput for RecordingOutput {
    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
    fn show_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }
    fn show_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    root: PathBuf,
    ctx: LintContext,
    analyzer: Arc<CannedAnalyzer>,
    output: Arc<RecordingOutput>,
    channel: Arc<BufferedChannel>,
}

fn source(lines: usize) -> String {
    (1..=lines).map(|n| format!("    int v{n} = {n};\n")).collect()
}

fn harness(config: LintConfig, xml: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    std::fs::write(root.join("main.c"), source(25)).unwrap();
    std::fs::write(root.join("util.c"), source(10)).unwrap();

    let output = Arc::new(RecordingOutput::default());
    let channel = Arc::new(BufferedChannel::new());
    let analyzer = Arc::new(CannedAnalyzer::new(xml, output.clone()));
    let ctx = LintContext::new(
        config,
        root.clone(),
        analyzer.clone(),
        Arc::new(FsDocumentOpener),
        output.clone(),
        channel.clone(),
    );
    Harness {
        _dir: dir,
        root,
        ctx,
        analyzer,
        output,
        channel,
    }
}

fn enabled() -> LintConfig {
    LintConfig {
        enable: true,
        linting_enabled: true,
        ..LintConfig::default()
    }
}

#[tokio::test]
async fn lint_run_publishes_fixture_report() {
    let mut h = harness(enabled(), FIXTURE);

    let outcome = linter::execute(&mut h.ctx).await.unwrap();
    assert_eq!(outcome.records, 4);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.dropped, 2);
    assert_eq!(outcome.publish.files, 2);
    assert_eq!(outcome.publish.published, 4);

    let main = h.ctx.store.get(&h.root.join("main.c")).unwrap();
    assert_eq!(main.len(), 3);
    assert_eq!(main[0].message, "(error) Null pointer dereference: p");
    assert_eq!(main[0].severity, HostSeverity::Error);
    assert_eq!(main[0].range.start, Position::new(11, 4));
    assert_eq!(main[1].severity, HostSeverity::Information);

    let util = h.ctx.store.get(&h.root.join("util.c")).unwrap();
    assert_eq!(
        util[0].message,
        "(performance) Function parameter 'name' should be passed by const reference."
    );
    assert_eq!(h.ctx.registry.len(), 4);
}

#[tokio::test]
async fn every_published_code_has_a_suppress_action() {
    let mut h = harness(enabled(), FIXTURE);
    linter::execute(&mut h.ctx).await.unwrap();

    let codes: Vec<String> = h
        .ctx
        .store
        .iter()
        .flat_map(|(_, diagnostics)| diagnostics.iter().map(|d| d.code.clone()))
        .collect();
    let actions = linter::code_actions(&h.ctx, codes.iter().map(String::as_str));
    assert_eq!(actions.len(), 4);
    assert!(actions.iter().all(|a| a.title == "Suppress this message"));
}

#[tokio::test]
async fn suppression_edit_lands_above_finding() {
    let mut h = harness(enabled(), FIXTURE);
    linter::execute(&mut h.ctx).await.unwrap();

    let main_path = h.root.join("main.c");
    let code = h.ctx.store.get(&main_path).unwrap()[0].code.clone();
    let edit = linter::suppress(&h.ctx, &code).unwrap();
    assert_eq!(edit.position, Position::new(11, 0));
    assert_eq!(edit.text, "// cppcheck-suppress nullPointer\n");
    assert!(h.output.warnings.lock().unwrap().is_empty());

    apply_text_edit(&main_path, &edit).await.unwrap();
    let text = std::fs::read_to_string(&main_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[11], "// cppcheck-suppress nullPointer");
    assert_eq!(lines[12], "    int v12 = 12;");
}

#[tokio::test]
async fn suppress_warns_when_inline_suppressions_are_off() {
    let config = LintConfig {
        allow_inline_suppressions: false,
        ..enabled()
    };
    let mut h = harness(config, FIXTURE);
    linter::execute(&mut h.ctx).await.unwrap();

    let code = h.ctx.store.get(&h.root.join("util.c")).unwrap()[0].code.clone();
    let edit = linter::suppress(&h.ctx, &code).unwrap();
    assert_eq!(edit.text, "// cppcheck-suppress passedByValue\n");
    assert_eq!(
        h.output.warnings.lock().unwrap().as_slice(),
        [INLINE_DISABLED_WARNING.to_string()]
    );
}

#[tokio::test]
async fn new_run_replaces_codes_and_diagnostics() {
    let mut h = harness(enabled(), FIXTURE);
    linter::execute(&mut h.ctx).await.unwrap();
    let old_code = h.ctx.store.get(&h.root.join("util.c")).unwrap()[0].code.clone();

    *h.analyzer.xml.lock().unwrap() = r#"<results version="2"><errors>
        <error id="uninitvar" severity="error" msg="Uninitialized variable: x"><location file="util.c" line="2"/></error>
    </errors></results>"#
        .to_string();
    linter::execute(&mut h.ctx).await.unwrap();

    assert!(linter::suppress(&h.ctx, &old_code).is_none());
    assert!(h.ctx.store.get(&h.root.join("main.c")).is_none());
    assert_eq!(h.ctx.store.diagnostic_count(), 1);
    assert_eq!(h.ctx.registry.len(), 1);
}

#[tokio::test]
async fn hidden_category_is_not_published() {
    let mut config = enabled();
    config.severity_levels.set("style", "None");
    config.severity_levels.set("performance", "Hint");
    let mut h = harness(config, FIXTURE);

    let outcome = linter::execute(&mut h.ctx).await.unwrap();
    assert_eq!(outcome.publish.suppressed, 1);
    assert_eq!(h.ctx.store.get(&h.root.join("main.c")).unwrap().len(), 2);
    assert_eq!(
        h.ctx.store.get(&h.root.join("util.c")).unwrap()[0].severity,
        HostSeverity::Hint
    );
}

#[tokio::test]
async fn garbage_output_publishes_nothing() {
    let mut h = harness(enabled(), "Checking main.c ...\n<results><errors>");
    let outcome = linter::execute(&mut h.ctx).await.unwrap();
    assert_eq!(outcome.records, 0);
    assert!(h.ctx.store.is_empty());
    assert!(h.ctx.registry.is_empty());
}

#[tokio::test]
async fn disabled_analyzer_clears_and_informs() {
    let mut h = harness(enabled(), FIXTURE);
    linter::execute(&mut h.ctx).await.unwrap();

    h.ctx.reconfigure(LintConfig::default());
    assert!(linter::execute(&mut h.ctx).await.is_none());
    assert!(h.ctx.store.is_empty());
    assert!(h.ctx.registry.is_empty());
    assert_eq!(
        h.output.infos.lock().unwrap().as_slice(),
        [NOT_ENABLED_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn interactive_runs_fill_the_channel() {
    let h = harness(enabled(), FIXTURE);

    let report = linter::analyze_workspace(&h.ctx).await.unwrap();
    assert_eq!(h.channel.lines(), report.lines().collect::<Vec<_>>());

    let report = linter::analyze_file(&h.ctx, &h.root.join("main.c")).await;
    assert!(report.is_some());
    assert!(h.channel.lines()[0].starts_with("Cppcheck started"));
}

#[tokio::test]
async fn analyze_file_rejects_non_sources() {
    let h = harness(enabled(), FIXTURE);
    assert!(linter::analyze_file(&h.ctx, &h.root.join("notes.txt")).await.is_none());
    assert_eq!(
        h.output.errors.lock().unwrap().as_slice(),
        [NOT_SOURCE_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn continuous_linting_runs_once_for_unchanged_workspace() {
    let mut h = harness(enabled(), FIXTURE);
    let mut seen = 0;

    watch::run_continuous(
        &mut h.ctx,
        tokio::time::sleep(Duration::from_millis(300)),
        |ctx, outcome| {
            seen += 1;
            assert_eq!(outcome.publish.published, ctx.store.diagnostic_count());
        },
    )
    .await;

    assert_eq!(seen, 1);
    assert_eq!(h.analyzer.lint_runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn continuous_linting_off_returns_immediately() {
    let config = LintConfig {
        linting_enabled: false,
        ..enabled()
    };
    let mut h = harness(config, FIXTURE);

    watch::run_continuous(&mut h.ctx, std::future::pending(), |_, _| {}).await;
    assert_eq!(h.analyzer.lint_runs.load(Ordering::SeqCst), 0);
}
