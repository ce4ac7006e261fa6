//! Selection of the executor adapter for a process.

use std::env;
use std::path::PathBuf;

use crate::adapters::live::LiveGitExecutor;
use crate::adapters::recording::RecordingGitExecutor;
use crate::adapters::replaying::ReplayingGitExecutor;
use crate::config::ExecutorConfig;
use crate::error::GitError;
use crate::ports::GitExecutor;

/// Environment variable naming a cassette to replay instead of running git.
pub const REPLAY_ENV: &str = "GITEXEC_REPLAY";
/// Environment variable naming a cassette to record live runs into.
pub const RECORD_ENV: &str = "GITEXEC_RECORD";

/// Which adapter backs the executor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutorMode {
    /// Run the real git executable.
    #[default]
    Live,
    /// Run the real git executable and record every run to a cassette.
    Recording(PathBuf),
    /// Serve runs from a previously recorded cassette.
    Replaying(PathBuf),
}

impl ExecutorMode {
    /// Reads the mode from `GITEXEC_REPLAY` / `GITEXEC_RECORD`.
    ///
    /// Replay wins when both are set; empty values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::var_os(REPLAY_ENV), env::var_os(RECORD_ENV))
    }

    fn from_vars(replay: Option<std::ffi::OsString>, record: Option<std::ffi::OsString>) -> Self {
        let non_empty = |value: Option<std::ffi::OsString>| value.filter(|v| !v.is_empty());
        if let Some(path) = non_empty(replay) {
            Self::Replaying(path.into())
        } else if let Some(path) = non_empty(record) {
            Self::Recording(path.into())
        } else {
            Self::Live
        }
    }

    /// Builds the executor for this mode.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotFound`] when a live executor cannot locate git,
    /// or a cassette error when the replay cassette cannot be loaded.
    pub fn build(self, config: ExecutorConfig) -> Result<Box<dyn GitExecutor>, GitError> {
        match self {
            Self::Live => Ok(Box::new(LiveGitExecutor::new(config)?)),
            Self::Recording(path) => {
                let live = LiveGitExecutor::new(config)?;
                Ok(Box::new(RecordingGitExecutor::create(Box::new(live), path)))
            }
            Self::Replaying(path) => {
                let logger = config.logger;
                let replaying = ReplayingGitExecutor::from_path(&path)?;
                Ok(replaying.with_logger(logger))
            }
        }
    }
}
