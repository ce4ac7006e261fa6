//! Git executor port for running git subcommands.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use tracing::Dispatch;

use crate::cancel::RunContext;
use crate::error::GitError;

/// Boxed future type alias used by [`GitExecutor`] to keep the trait dyn-compatible.
pub type GitFuture<'a> = Pin<Box<dyn Future<Output = Result<CommandResult, GitError>> + Send + 'a>>;

/// The captured outcome of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// The captured standard output.
    pub stdout: Vec<u8>,
    /// The captured standard error.
    pub stderr: Vec<u8>,
    /// The exit code of the process, or `-1` if it ended without one.
    pub exit_code: i32,
}

impl CommandResult {
    /// Whether the process reported success.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Standard error decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Runs git subcommands and captures their output.
///
/// Abstracting execution allows deterministic replay and testing
/// without spawning real processes.
pub trait GitExecutor: Send + Sync {
    /// Runs git with the given arguments, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Exit`] (carrying the result) when git exits
    /// non-zero, and [`GitError::Spawn`] when it cannot be started.
    fn run_git(&self, args: &[&str]) -> Result<CommandResult, GitError> {
        self.run_git_context(&RunContext::background(), args)
    }

    /// Runs git with the given arguments, stopping it if `ctx` fires first.
    ///
    /// # Errors
    ///
    /// As [`GitExecutor::run_git`], plus [`GitError::Cancelled`] or
    /// [`GitError::DeadlineExceeded`] when the context fires.
    fn run_git_context(&self, ctx: &RunContext, args: &[&str]) -> Result<CommandResult, GitError>;

    /// Async form of [`GitExecutor::run_git_context`] for use inside a runtime.
    fn run_git_async<'a>(&'a self, ctx: &'a RunContext, args: &[&str]) -> GitFuture<'a>;

    /// Returns a copy of this executor that logs to `logger`.
    ///
    /// The receiver keeps its current logger.
    fn with_logger(&self, logger: Option<Dispatch>) -> Box<dyn GitExecutor>;

    /// Returns the configured logger, if any.
    fn logger(&self) -> Option<&Dispatch>;
}

/// Joins a program name and its arguments the way they are traced and reported.
pub(crate) fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line
}

/// Emits the pre-execution `execute` event to `logger`, if one is set.
pub(crate) fn trace_execute(logger: Option<&Dispatch>, command: &str) {
    if let Some(logger) = logger {
        tracing::dispatcher::with_default(logger, || {
            tracing::debug!(command = %command, "execute");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_follows_exit_code() {
        assert!(CommandResult::default().success());
        let failed = CommandResult { exit_code: 128, ..CommandResult::default() };
        assert!(!failed.success());
    }

    #[test]
    fn lossy_output_replaces_invalid_bytes() {
        let result = CommandResult {
            stdout: b"On branch main\n".to_vec(),
            stderr: vec![0xff, b'x'],
            exit_code: 0,
        };
        assert_eq!(result.stdout_lossy(), "On branch main\n");
        assert_eq!(result.stderr_lossy(), "\u{fffd}x");
    }

    #[test]
    fn command_line_joins_with_spaces() {
        assert_eq!(command_line("git", &["var", "GIT_AUTHOR_IDENT"]), "git var GIT_AUTHOR_IDENT");
        assert_eq!(command_line::<&str>("git", &[]), "git");
    }
}
