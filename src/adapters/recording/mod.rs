//! Recording adapters that capture interactions to cassettes.

pub mod git;

pub use git::RecordingGitExecutor;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::format::{RecordedOutcome, RunInput, GIT_PORT, RUN_METHOD};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GitError;
use crate::ports::git::CommandResult;

/// Record one git run using the tagged outcome convention.
///
/// Mirror of `replaying::replay_run`. Errors that are not run outcomes
/// (lookup or cassette failures) are not recorded.
pub(crate) fn record_run(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    args: &[&str],
    result: &Result<CommandResult, GitError>,
) {
    let Some(outcome) = RecordedOutcome::from_result(result) else {
        return;
    };
    let input = RunInput { args: args.iter().map(ToString::to_string).collect() };
    let (Ok(input), Ok(output)) = (serde_json::to_value(input), serde_json::to_value(outcome))
    else {
        tracing::warn!("failed to serialize git run for recording");
        return;
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(GIT_PORT, RUN_METHOD, input, output);
}
