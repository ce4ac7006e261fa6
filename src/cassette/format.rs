//! Cassette data structures for recording and replaying git runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GitError;
use crate::ports::git::CommandResult;

/// Port name under which git runs are recorded.
pub const GIT_PORT: &str = "git";
/// Method name under which git runs are recorded.
pub const RUN_METHOD: &str = "run";

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (e.g. "git").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

/// Arguments of a recorded git run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunInput {
    /// Arguments passed after the executable.
    pub args: Vec<String>,
}

/// Captured streams of a run that reached completion.
///
/// Streams are stored as text; invalid UTF-8 is replaced on recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedOutput {
    /// Exit code of the process.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Outcome of a recorded git run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordedOutcome {
    /// Git exited with status zero.
    Success(RecordedOutput),
    /// Git exited with a non-zero status.
    Exited(RecordedOutput),
    /// Git could not be started.
    SpawnFailed {
        /// Rendered error message.
        message: String,
    },
    /// The run was cancelled.
    Cancelled,
    /// The run's deadline passed.
    DeadlineExceeded,
}

impl From<&CommandResult> for RecordedOutput {
    fn from(result: &CommandResult) -> Self {
        Self {
            exit_code: result.exit_code,
            stdout: result.stdout_lossy().into_owned(),
            stderr: result.stderr_lossy().into_owned(),
        }
    }
}

impl From<RecordedOutput> for CommandResult {
    fn from(output: RecordedOutput) -> Self {
        Self {
            stdout: output.stdout.into_bytes(),
            stderr: output.stderr.into_bytes(),
            exit_code: output.exit_code,
        }
    }
}

impl RecordedOutcome {
    /// Captures the outcome of a run for recording.
    ///
    /// Returns `None` for errors that are not run outcomes (cassette I/O, lookup).
    #[must_use]
    pub fn from_result(result: &Result<CommandResult, GitError>) -> Option<Self> {
        let outcome = match result {
            Ok(result) => Self::Success(result.into()),
            Err(GitError::Exit { result, .. }) => Self::Exited(result.into()),
            Err(GitError::Spawn { source, .. }) => {
                Self::SpawnFailed { message: source.to_string() }
            }
            Err(GitError::Cancelled { .. }) => Self::Cancelled,
            Err(GitError::DeadlineExceeded { .. }) => Self::DeadlineExceeded,
            Err(GitError::NotFound { .. } | GitError::Cassette(_)) => return None,
        };
        Some(outcome)
    }

    /// Rebuilds the run result this outcome was recorded from.
    ///
    /// # Errors
    ///
    /// Returns the recorded failure as a [`GitError`] for `command`.
    pub fn into_result(self, command: String) -> Result<CommandResult, GitError> {
        match self {
            Self::Success(output) => Ok(output.into()),
            Self::Exited(output) => Err(GitError::Exit { command, result: output.into() }),
            Self::SpawnFailed { message } => {
                Err(GitError::Spawn { command, source: std::io::Error::other(message) })
            }
            Self::Cancelled => Err(GitError::Cancelled { command }),
            Self::DeadlineExceeded => Err(GitError::DeadlineExceeded { command }),
        }
    }
}
