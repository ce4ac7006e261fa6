//! Locate the `git` executable and run it with captured output.
//!
//! ```no_run
//! use gitexec::{ExecutorConfig, GitExecutor};
//!
//! let git = gitexec::new(ExecutorConfig::default())?;
//! match git.run_git(&["status"]) {
//!     Ok(result) => print!("{}", result.stdout_lossy()),
//!     Err(err) if err.is_exit() => eprintln!("git failed: {err}"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A run that reaches completion with a non-zero status is reported as
//! [`GitError::Exit`], which still carries the captured [`CommandResult`].

pub mod adapters;
pub mod cancel;
pub mod cassette;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;

pub use adapters::live::LiveGitExecutor;
pub use cancel::RunContext;
pub use config::ExecutorConfig;
pub use context::ExecutorMode;
pub use error::GitError;
pub use ports::{CommandResult, GitExecutor, GitFuture};
pub use tokio_util::sync::CancellationToken;

/// Build a live executor, resolving `git` on `PATH` unless a path is configured.
///
/// # Errors
///
/// Returns [`GitError::NotFound`] if no path is configured and `git` cannot
/// be found.
pub fn new(config: ExecutorConfig) -> Result<Box<dyn GitExecutor>, GitError> {
    ExecutorMode::Live.build(config)
}
