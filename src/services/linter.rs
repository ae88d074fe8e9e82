//! Lint runs and the commands built on top of them.
//!
//! A run clears the store and registry, asks the analyzer for XML, parses
//! it, and publishes the result. All state lives in the `LintContext`
//! passed in; runs borrow it exclusively, so one finishes publishing
//! before the next one clears.

use std::path::Path;

use crate::models::published::{CodeAction, TextEdit};
use crate::parsers::xml::XmlParser;
use crate::parsers::Parser;
use crate::services::publisher::{self, PublishSummary};
use crate::services::resolver;
use crate::LintContext;

pub const NOT_SOURCE_MESSAGE: &str = "Cppcheck: Analysis can only be run on C or C++ files.";

/// What one lint run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintOutcome {
    pub records: usize,
    pub dropped: usize,
    pub duplicates: usize,
    pub publish: PublishSummary,
}

/// Run the analyzer in lint mode and republish every diagnostic.
///
/// Returns `None` when the analyzer is disabled; the store and registry
/// are still cleared in that case.
pub async fn execute(ctx: &mut LintContext) -> Option<LintOutcome> {
    ctx.store.clear();
    ctx.registry.clear();
    ctx.registry
        .set_allow_inline_suppressions(ctx.config.allow_inline_suppressions);

    let stderr = ctx
        .analyzer
        .run_lint_mode(&ctx.config, &ctx.workspace_root)
        .await?;

    let parsed = XmlParser::new().parse(&stderr, &ctx.workspace_root);
    for error in &parsed.errors {
        tracing::debug!(
            record = error.record_index,
            field = %error.field,
            message = %error.message,
            "Dropped analyzer record"
        );
    }

    let mut outcome = LintOutcome {
        records: parsed.record_count(),
        dropped: parsed.errors.len(),
        duplicates: parsed.duplicates,
        publish: PublishSummary::default(),
    };

    outcome.publish = publisher::publish(
        parsed.files,
        &ctx.config.severity_levels,
        ctx.opener.clone(),
        &mut ctx.registry,
        &mut ctx.store,
    )
    .await;

    tracing::info!(
        records = outcome.records,
        dropped = outcome.dropped,
        duplicates = outcome.duplicates,
        published = outcome.publish.published,
        suppressed = outcome.publish.suppressed,
        "Lint run complete"
    );
    Some(outcome)
}

/// Interactive analysis of one file. The report also goes to the channel.
pub async fn analyze_file(ctx: &LintContext, file: &Path) -> Option<String> {
    if ctx.config.enable && !resolver::is_source_file(file) {
        ctx.output.show_error(NOT_SOURCE_MESSAGE);
        return None;
    }
    let report = ctx
        .analyzer
        .run_on_file(&ctx.config, file, &ctx.workspace_root)
        .await?;
    show_report(ctx, &report);
    Some(report)
}

/// Interactive analysis of the whole workspace.
pub async fn analyze_workspace(ctx: &LintContext) -> Option<String> {
    let report = ctx
        .analyzer
        .run_on_workspace(&ctx.config, &ctx.workspace_root)
        .await?;
    show_report(ctx, &report);
    Some(report)
}

fn show_report(ctx: &LintContext, report: &str) {
    ctx.channel.clear();
    for line in report.lines() {
        ctx.channel.append_line(line);
    }
}

/// Suppression actions for the diagnostics under the cursor.
pub fn code_actions<'a, I>(ctx: &LintContext, codes: I) -> Vec<CodeAction>
where
    I: IntoIterator<Item = &'a str>,
{
    ctx.registry.provide_code_actions(codes)
}

/// Edit suppressing the published diagnostic with `code`.
///
/// `None` when the code is not from the latest run.
pub fn suppress(ctx: &LintContext, code: &str) -> Option<TextEdit> {
    let Some(diagnostic) = ctx.registry.lookup(code) else {
        tracing::debug!(code, "Unknown suppression code");
        return None;
    };
    Some(ctx.registry.suppress(diagnostic, ctx.output.as_ref()))
}
