//! Continuous linting: poll the workspace and re-lint on change.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::services::fingerprint;
use crate::services::linter::{self, LintOutcome};
use crate::LintContext;

/// How often the workspace is checked for changes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Tracks the workspace fingerprint between polls.
#[derive(Debug)]
pub struct WorkspaceWatcher {
    root: PathBuf,
    last: Option<String>,
}

impl WorkspaceWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last: None,
        }
    }

    /// Recompute the fingerprint. The first poll always reports a change.
    pub async fn poll(&mut self) -> bool {
        let root = self.root.clone();
        let task = tokio::task::spawn_blocking(move || fingerprint::compute_workspace(&root));
        let current = match task.await {
            Ok(fp) => fp,
            Err(e) => {
                tracing::error!(error = %e, "Fingerprint task failed");
                return false;
            }
        };
        let changed = self.last.as_deref() != Some(current.as_str());
        if changed {
            tracing::debug!(fingerprint = %current, "Workspace changed");
            self.last = Some(current);
        }
        changed
    }
}

/// Lint whenever the workspace changes until `shutdown` resolves.
///
/// Returns at once when continuous linting is turned off. `on_run` sees
/// the context after every completed run. The timer is dropped on return.
pub async fn run_continuous<S, F>(ctx: &mut LintContext, shutdown: S, mut on_run: F)
where
    S: Future<Output = ()>,
    F: FnMut(&LintContext, &LintOutcome),
{
    if !ctx.config.linting_enabled {
        tracing::info!("Continuous linting is disabled");
        return;
    }

    let mut watcher = WorkspaceWatcher::new(ctx.workspace_root.clone());
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    tracing::info!(root = %ctx.workspace_root.display(), "Watching workspace");
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if !watcher.poll().await {
                    continue;
                }
                match linter::execute(ctx).await {
                    Some(outcome) => on_run(&*ctx, &outcome),
                    None => break,
                }
            }
        }
    }
    tracing::info!("Stopped watching workspace");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_poll_reports_change_then_settles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c"), "int x;\n").unwrap();
        let mut watcher = WorkspaceWatcher::new(dir.path());
        assert!(watcher.poll().await);
        assert!(!watcher.poll().await);
        std::fs::write(dir.path().join("b.h"), "#pragma once\n").unwrap();
        assert!(watcher.poll().await);
        assert!(!watcher.poll().await);
    }
}
