// src/types.rs

//! Shared types passed between the runner, the launcher and the host.

use std::path::PathBuf;

/// Line consumer supplied by the host.
///
/// Called from the foreground path (for the `Executing:` line) and from the
/// output relay task, so implementations must be `Send + Sync`.
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// How a child process ended.
///
/// `Failed(-1)` is used when the process was terminated without an exit
/// code (e.g. by a signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failed(i32),
}

impl ExitOutcome {
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failed(status.code().unwrap_or(-1))
        }
    }
}

/// A fully resolved build tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub directory: PathBuf,
}

impl Invocation {
    /// Human-readable command line used in logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
