//! Recording adapter for the `GitExecutor` port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Dispatch;

use super::record_run;
use crate::cancel::RunContext;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::CassetteError;
use crate::error::GitError;
use crate::ports::git::{CommandResult, GitExecutor, GitFuture};

/// Records git runs while delegating to an inner implementation.
///
/// The cassette is rewritten on [`RecordingGitExecutor::flush`] and when
/// the executor is dropped. Copies made with `with_logger` share the
/// same recorder.
pub struct RecordingGitExecutor {
    inner: Box<dyn GitExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitExecutor {
    /// Creates a new recording executor wrapping the given implementation.
    pub fn new(inner: Box<dyn GitExecutor>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    /// Creates a recording executor writing a fresh cassette at `path`.
    pub fn create(inner: Box<dyn GitExecutor>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map_or_else(|| "gitexec".to_string(), |stem| stem.to_string_lossy().into_owned());
        Self::new(inner, Arc::new(Mutex::new(CassetteRecorder::new(path, name))))
    }

    /// Writes everything recorded so far to the cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn flush(&self) -> Result<PathBuf, CassetteError> {
        let guard = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        guard.write().map(Path::to_path_buf)
    }
}

impl GitExecutor for RecordingGitExecutor {
    fn run_git_context(&self, ctx: &RunContext, args: &[&str]) -> Result<CommandResult, GitError> {
        let result = self.inner.run_git_context(ctx, args);
        record_run(&self.recorder, args, &result);
        result
    }

    fn run_git_async<'a>(&'a self, ctx: &'a RunContext, args: &[&str]) -> GitFuture<'a> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        Box::pin(async move {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let result = self.inner.run_git_async(ctx, &args).await;
            record_run(&self.recorder, &args, &result);
            result
        })
    }

    fn with_logger(&self, logger: Option<Dispatch>) -> Box<dyn GitExecutor> {
        Box::new(Self {
            inner: self.inner.with_logger(logger),
            recorder: Arc::clone(&self.recorder),
        })
    }

    fn logger(&self) -> Option<&Dispatch> {
        self.inner.logger()
    }
}

impl Drop for RecordingGitExecutor {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to write cassette");
        }
    }
}
