//! Replaying adapters that replay recorded interactions.

pub mod git;

pub use git::ReplayingGitExecutor;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::format::{RecordedOutcome, GIT_PORT, RUN_METHOD};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GitError;
use crate::ports::git::CommandResult;

/// Take the next recorded git run and rebuild its result for `command`.
///
/// Mirror of `recording::record_run`.
///
/// # Panics
///
/// Panics if the cassette is exhausted or the recorded outcome is malformed.
pub(crate) fn replay_run(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    command: String,
) -> Result<CommandResult, GitError> {
    let interaction = {
        let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
        guard.next_interaction(GIT_PORT, RUN_METHOD)
    };
    let outcome: RecordedOutcome = serde_json::from_value(interaction.output).unwrap_or_else(|e| {
        panic!("git::run: malformed outcome at seq={}: {e}", interaction.seq)
    });
    outcome.into_result(command)
}
