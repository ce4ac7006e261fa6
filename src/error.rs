//! Error types for locating and running git.

use thiserror::Error;

use crate::cassette::CassetteError;
use crate::ports::git::CommandResult;

/// Errors produced while resolving or running the git executable.
///
/// [`GitError::Exit`] is the ordinary failure path: git ran to completion
/// and reported a non-zero status. Its [`CommandResult`] is still available
/// through [`GitError::result`]. Every other variant means git could not be
/// run (or was stopped) and carries no result.
#[derive(Debug, Error)]
pub enum GitError {
    /// The executable could not be found on the search path.
    #[error("failed to find {name}: {source}")]
    NotFound {
        /// Name that was looked up.
        name: String,
        /// Underlying lookup failure.
        #[source]
        source: which::Error,
    },

    /// The process could not be started or waited on.
    #[error("failed to execute command `{command}`: {source}")]
    Spawn {
        /// Assembled command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero status.
    #[error("command `{command}` exited with code {}", .result.exit_code)]
    Exit {
        /// Assembled command line.
        command: String,
        /// Captured output and exit code.
        result: CommandResult,
    },

    /// The run context was cancelled before the process finished.
    #[error("command `{command}` was cancelled")]
    Cancelled {
        /// Assembled command line.
        command: String,
    },

    /// The run context's deadline passed before the process finished.
    #[error("command `{command}` exceeded its deadline")]
    DeadlineExceeded {
        /// Assembled command line.
        command: String,
    },

    /// A cassette could not be loaded or written.
    #[error(transparent)]
    Cassette(#[from] CassetteError),
}

impl GitError {
    /// Returns the captured result when git exited non-zero.
    #[must_use]
    pub fn result(&self) -> Option<&CommandResult> {
        match self {
            Self::Exit { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Consumes the error, returning the captured result when git exited non-zero.
    #[must_use]
    pub fn into_result(self) -> Option<CommandResult> {
        match self {
            Self::Exit { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Returns the exit code when git ran to completion.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.result().map(|result| result.exit_code)
    }

    /// Whether git ran and reported failure.
    #[must_use]
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }

    /// Whether the run was stopped by cancellation or an expired deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}
