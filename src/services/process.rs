//! Blocking invocation of the analyzer executable.
//!
//! Failures to start the process are folded into captured stderr with no
//! exit status; callers treat empty or garbled output as "no findings".

use std::borrow::Cow;
use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Local};

use crate::errors::LintError;

/// Captured result of one analyzer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process could not be started or was killed by a signal.
    pub status: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Run `executable` in `working_dir` and wait for it to exit. No timeout.
///
/// `args` are in command-line form; see [`exec_arg`] for what reaches the
/// process.
pub fn run(executable: &str, args: &[String], working_dir: &Path) -> ProcessOutput {
    tracing::debug!(executable, ?args, cwd = %working_dir.display(), "Running analyzer");
    match Command::new(executable)
        .args(args.iter().map(|arg| exec_arg(arg).into_owned()))
        .current_dir(working_dir)
        .output()
    {
        Ok(output) => ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        },
        Err(e) => {
            let err = LintError::Spawn {
                executable: executable.to_string(),
                message: e.to_string(),
            };
            tracing::warn!(error = %err, "Analyzer did not start");
            ProcessOutput {
                stdout: String::new(),
                stderr: err.to_string(),
                status: None,
            }
        }
    }
}

/// Undo the quoting the argument builder adds around paths.
///
/// Only a fully quoted argument (`"path"`) and a quoted include value
/// (`-I"path"`) lose their outer quotes. Quotes anywhere else, such as in
/// `-DVERSION="1.0"`, are part of the value and pass through untouched.
pub fn exec_arg(arg: &str) -> Cow<'_, str> {
    let (flag, value) = match arg.strip_prefix("-I") {
        Some(value) => ("-I", value),
        None => ("", arg),
    };
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => Cow::Owned(format!("{flag}{inner}")),
        None => Cow::Borrowed(arg),
    }
}

/// The command line as echoed in interactive reports.
pub fn command_line(executable: &str, args: &[String]) -> String {
    format!("{executable} {}", args.join(" "))
}

/// Join a run into the human-readable report shown for interactive commands.
pub fn format_report(
    started: DateTime<Local>,
    ended: DateTime<Local>,
    command_line: Option<&str>,
    output: &ProcessOutput,
) -> String {
    let mut lines = Vec::with_capacity(5);
    if let Some(cmd) = command_line {
        lines.push(cmd.to_string());
    }
    lines.push(format!("Cppcheck started: {}", started.to_rfc2822()));
    lines.push(output.stdout.clone());
    lines.push(output.stderr.clone());
    lines.push(format!("Cppcheck ended: {}", ended.to_rfc2822()));
    lines.join("\n")
}

/// Run the analyzer and return the combined report string.
pub fn run_report(
    executable: &str,
    args: &[String],
    working_dir: &Path,
    echo_command: bool,
) -> String {
    let started = Local::now();
    let output = run(executable, args, working_dir);
    let ended = Local::now();
    let cmd = echo_command.then(|| command_line(executable, args));
    format_report(started, ended, cmd.as_deref(), &output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use crate::services::params::{build_params, RunMode};

    #[test]
    fn missing_executable_reports_in_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let output = run("/definitely/not/cppcheck", &[], dir.path());
        assert!(!output.success());
        assert_eq!(output.status, None);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.contains("/definitely/not/cppcheck"));
    }

    #[test]
    fn report_layout_without_command_line() {
        let now = Local::now();
        let output = ProcessOutput {
            stdout: "Checking a.c ...".into(),
            stderr: "[a.c:3]: (error) Null pointer dereference".into(),
            status: Some(0),
        };
        let report = format_report(now, now, None, &output);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Cppcheck started: "));
        assert_eq!(lines[1], "Checking a.c ...");
        assert_eq!(lines[2], "[a.c:3]: (error) Null pointer dereference");
        assert!(lines[3].starts_with("Cppcheck ended: "));
    }

    #[test]
    fn report_echoes_command_line_first() {
        let now = Local::now();
        let args = vec!["--platform=native".to_string(), "\"/proj\"".to_string()];
        let cmd = command_line("/usr/bin/cppcheck", &args);
        let report = format_report(now, now, Some(&cmd), &ProcessOutput::default());
        assert!(report.starts_with("/usr/bin/cppcheck --platform=native \"/proj\"\n"));
    }

    #[test]
    fn exec_arg_strips_only_builder_quotes() {
        assert_eq!(exec_arg("\"/proj\""), "/proj");
        assert_eq!(exec_arg("-I\"/proj/inc dir\""), "-I/proj/inc dir");
        assert_eq!(exec_arg("-DVERSION=\"1.0\""), "-DVERSION=\"1.0\"");
        assert_eq!(exec_arg("--suppress=\"odd\"id"), "--suppress=\"odd\"id");
        assert_eq!(exec_arg("\""), "\"");
        assert_eq!(exec_arg("--force"), "--force");
    }

    #[cfg(unix)]
    #[test]
    fn quoted_define_reaches_process_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let config = LintConfig {
            define: vec!["VERSION=\"1.0\"".to_string()],
            ..LintConfig::default()
        };
        let built = build_params(&config, &RunMode::Lint, dir.path()).args;
        let define = built
            .iter()
            .find(|arg| arg.starts_with("-D"))
            .unwrap()
            .clone();
        assert_eq!(define, "-DVERSION=\"1.0\"");

        let output = run("printf", &["%s".to_string(), define.clone()], dir.path());
        assert_eq!(output.stdout, define);
    }

    #[cfg(unix)]
    #[test]
    fn quoted_target_reaches_process_unquoted() {
        let dir = tempfile::tempdir().unwrap();
        let built = build_params(&LintConfig::default(), &RunMode::Workspace, dir.path()).args;
        let target = built.last().unwrap().clone();
        assert!(target.starts_with('"'));

        let output = run("printf", &["%s".to_string(), target], dir.path());
        assert_eq!(output.stdout, dir.path().display().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let output = run("sh", &args, dir.path());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.status, Some(3));
    }
}
