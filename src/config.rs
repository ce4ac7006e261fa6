//! Configuration consumed by the git executor constructors.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::Dispatch;

use crate::adapters::live::git::GIT_EXECUTABLE;

/// Parameters for constructing a git executor.
///
/// All fields are optional. Without a `git_path` the executable is looked
/// up on `PATH`; without `env` the child inherits the caller's environment.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Logger receiving a debug `execute` event before each run.
    pub logger: Option<Dispatch>,
    /// Path to the git executable.
    pub git_path: Option<PathBuf>,
    /// Environment of the child process as `KEY=VALUE` entries.
    ///
    /// Duplicate keys resolve to the last value in the list.
    pub env: Option<Vec<String>>,
    /// Executable name looked up on `PATH` when `git_path` is unset.
    ///
    /// Defaults to [`GIT_EXECUTABLE`], `git`.
    pub lookup_name: Option<String>,
}

impl ExecutorConfig {
    /// Set the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set an explicit git executable, skipping the `PATH` lookup.
    #[must_use]
    pub fn with_git_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.git_path = Some(path.into());
        self
    }

    /// Replace the child's environment with the given `KEY=VALUE` entries.
    #[must_use]
    pub fn with_env<I, S>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = Some(env.into_iter().map(Into::into).collect());
        self
    }

    /// Look up `name` on `PATH` instead of `git` when no path is set.
    #[must_use]
    pub fn with_lookup_name(mut self, name: impl Into<String>) -> Self {
        self.lookup_name = Some(name.into());
        self
    }

    /// Name resolved on `PATH`, treating an empty name as unset.
    pub(crate) fn lookup_name(&self) -> &str {
        self.lookup_name.as_deref().filter(|name| !name.is_empty()).unwrap_or(GIT_EXECUTABLE)
    }

    /// The explicit git path, treating an empty path as unset.
    pub(crate) fn explicit_git_path(&self) -> Option<&PathBuf> {
        self.git_path.as_ref().filter(|path| !path.as_os_str().is_empty())
    }
}

/// Splits `KEY=VALUE` entries, skipping entries without `=` or with an empty key.
///
/// Order is preserved so that applying the pairs in sequence leaves the
/// last value for a duplicated key in effect.
pub(crate) fn env_pairs(env: &[String]) -> impl Iterator<Item = (&OsStr, &OsStr)> {
    env.iter().filter_map(|entry| {
        let (key, value) = entry.split_once('=')?;
        (!key.is_empty()).then(|| (OsStr::new(key), OsStr::new(value)))
    })
}
