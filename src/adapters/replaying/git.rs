//! Replaying adapter for the `GitExecutor` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Dispatch;

use super::replay_run;
use crate::adapters::live::git::GIT_EXECUTABLE;
use crate::cancel::RunContext;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GitError;
use crate::ports::git::{command_line, trace_execute, CommandResult, GitExecutor, GitFuture};

/// Replays recorded git runs from a cassette without spawning processes.
///
/// Runs are served in recording order regardless of the arguments passed.
/// Copies made with `with_logger` share the same position in the cassette.
#[derive(Clone)]
pub struct ReplayingGitExecutor {
    replayer: Arc<Mutex<CassetteReplayer>>,
    logger: Option<Dispatch>,
}

impl ReplayingGitExecutor {
    /// Creates a new replaying executor from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Arc::new(Mutex::new(replayer)), logger: None }
    }

    /// Loads the cassette at `path` and replays it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, GitError> {
        let cassette = crate::cassette::load(path)?;
        Ok(Self::new(CassetteReplayer::new(&cassette)))
    }

    fn replay(&self, ctx: &RunContext, args: &[&str]) -> Result<CommandResult, GitError> {
        let command = command_line(GIT_EXECUTABLE, args);
        trace_execute(self.logger.as_ref(), &command);
        if let Some(fired) = ctx.fired() {
            return Err(fired.into_error(command));
        }
        replay_run(&self.replayer, command)
    }
}

impl GitExecutor for ReplayingGitExecutor {
    fn run_git_context(&self, ctx: &RunContext, args: &[&str]) -> Result<CommandResult, GitError> {
        self.replay(ctx, args)
    }

    fn run_git_async<'a>(&'a self, ctx: &'a RunContext, args: &[&str]) -> GitFuture<'a> {
        let args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        Box::pin(async move {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            self.replay(ctx, &args)
        })
    }

    fn with_logger(&self, logger: Option<Dispatch>) -> Box<dyn GitExecutor> {
        Box::new(Self { logger, ..self.clone() })
    }

    fn logger(&self) -> Option<&Dispatch> {
        self.logger.as_ref()
    }
}
