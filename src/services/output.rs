//! User-facing output: pop-up style messages and the report channel.

use std::sync::Mutex;

/// Messages shown directly to the user.
pub trait UserOutput: Send + Sync {
    fn show_error(&self, message: &str);
    fn show_info(&self, message: &str);
    fn show_warning(&self, message: &str);
}

/// Append-only text surface for analyzer reports.
pub trait OutputChannel: Send + Sync {
    fn append_line(&self, line: &str);
    fn clear(&self);
}

/// Terminal implementation used by the CLI.
///
/// Messages go to stderr; channel lines go to stdout.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl UserOutput for ConsoleOutput {
    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

impl OutputChannel for ConsoleOutput {
    fn append_line(&self, line: &str) {
        println!("{line}");
    }

    fn clear(&self) {}
}

/// Channel that keeps lines in memory, for hosts that render them later.
#[derive(Debug, Default)]
pub struct BufferedChannel {
    lines: Mutex<Vec<String>>,
}

impl BufferedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl OutputChannel for BufferedChannel {
    fn append_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}
