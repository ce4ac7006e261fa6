//! Live git adapter that spawns the git executable.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::Dispatch;

use crate::cancel::RunContext;
use crate::config::{env_pairs, ExecutorConfig};
use crate::error::GitError;
use crate::ports::git::{command_line, trace_execute, CommandResult, GitExecutor, GitFuture};

/// Executable name looked up on `PATH` when no explicit path is configured.
pub const GIT_EXECUTABLE: &str = "git";

/// How often a blocking cancellable run checks its context.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Live git executor that shells out to the `git` CLI.
///
/// Holds no per-run state; one instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct LiveGitExecutor {
    logger: Option<Dispatch>,
    git_path: PathBuf,
    program: String,
    env: Option<Vec<String>>,
}

impl LiveGitExecutor {
    /// Resolves the git executable and builds an executor.
    ///
    /// An explicit `git_path` is used verbatim; a missing one is resolved
    /// through a `PATH` lookup for the configured lookup name, `git` by
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotFound`] if no explicit path is set and the
    /// executable is not on `PATH`.
    pub fn new(config: ExecutorConfig) -> Result<Self, GitError> {
        let git_path = match config.explicit_git_path() {
            Some(path) => path.clone(),
            None => resolve_executable(config.lookup_name())?,
        };
        Ok(Self {
            program: program_name(&git_path),
            logger: config.logger,
            git_path,
            env: config.env,
        })
    }

    /// Path of the resolved executable.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.git_path
    }

    /// Configured child environment, if any.
    #[must_use]
    pub fn env(&self) -> Option<&[String]> {
        self.env.as_deref()
    }

    fn std_command(&self, args: &[&str]) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.git_path);
        cmd.args(args);
        if let Some(env) = &self.env {
            cmd.env_clear();
            cmd.envs(env_pairs(env));
        }
        cmd
    }
}

impl GitExecutor for LiveGitExecutor {
    fn run_git_context(&self, ctx: &RunContext, args: &[&str]) -> Result<CommandResult, GitError> {
        let command = command_line(&self.program, args);
        trace_execute(self.logger.as_ref(), &command);
        if !ctx.is_cancellable() {
            let output = self
                .std_command(args)
                .output()
                .map_err(|source| GitError::Spawn { command: command.clone(), source })?;
            return into_result(command, output);
        }

        if let Some(fired) = ctx.fired() {
            return Err(fired.into_error(command));
        }
        let child = self
            .std_command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn { command: command.clone(), source })?;
        wait_or_kill(child, ctx, command)
    }

    fn run_git_async<'a>(&'a self, ctx: &'a RunContext, args: &[&str]) -> GitFuture<'a> {
        let mut cmd = tokio::process::Command::from(self.std_command(args));
        cmd.kill_on_drop(true);
        let command = command_line(&self.program, args);

        Box::pin(async move {
            trace_execute(self.logger.as_ref(), &command);
            if let Some(fired) = ctx.fired() {
                return Err(fired.into_error(command));
            }

            let output = tokio::select! {
                biased;
                output = cmd.output() => output,
                fired = ctx.done() => return Err(fired.into_error(command)),
            };
            let output =
                output.map_err(|source| GitError::Spawn { command: command.clone(), source })?;
            into_result(command, output)
        })
    }

    fn with_logger(&self, logger: Option<Dispatch>) -> Box<dyn GitExecutor> {
        Box::new(Self { logger, ..self.clone() })
    }

    fn logger(&self) -> Option<&Dispatch> {
        self.logger.as_ref()
    }
}

/// Polls `child` until it exits or `ctx` fires.
///
/// A fired context kills and reaps the child before returning. Both pipes
/// are drained on their own threads so a chatty child cannot block on a
/// full pipe while it is being polled.
fn wait_or_kill(
    mut child: Child,
    ctx: &RunContext,
    command: String,
) -> Result<CommandResult, GitError> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Spawn { command, source });
            }
        }
        if let Some(fired) = ctx.fired() {
            // The child may have exited since the last poll.
            let _ = child.kill();
            let _ = child.wait();
            return Err(fired.into_error(command));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let collect = |reader: Option<JoinHandle<io::Result<Vec<u8>>>>| match reader {
        Some(handle) => handle.join().unwrap_or_else(|_| Err(io::Error::other("reader panicked"))),
        None => Ok(Vec::new()),
    };
    let output = collect(stdout)
        .and_then(|stdout| Ok(Output { status, stdout, stderr: collect(stderr)? }))
        .map_err(|source| GitError::Spawn { command: command.clone(), source })?;
    into_result(command, output)
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Looks `name` up on the search path.
fn resolve_executable(name: &str) -> Result<PathBuf, GitError> {
    which::which(name).map_err(|source| GitError::NotFound { name: name.to_string(), source })
}

/// Name used for the program in traces and error messages.
fn program_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn into_result(command: String, output: Output) -> Result<CommandResult, GitError> {
    let result = CommandResult {
        stdout: output.stdout,
        stderr: output.stderr,
        exit_code: output.status.code().unwrap_or(-1),
    };
    if output.status.success() {
        Ok(result)
    } else {
        Err(GitError::Exit { command, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_used_verbatim() {
        let git = LiveGitExecutor::new(
            ExecutorConfig::default().with_git_path("/does/not/exist/git"),
        )
        .unwrap();
        assert_eq!(git.path(), Path::new("/does/not/exist/git"));
        assert_eq!(git.program, "git");
        assert!(git.env().is_none());
    }

    #[test]
    fn unknown_executable_is_not_found() {
        let err = resolve_executable("gitexec-no-such-binary-3f9c").unwrap_err();
        assert!(matches!(err, GitError::NotFound { .. }));
        assert!(err.to_string().starts_with("failed to find gitexec-no-such-binary-3f9c"));
    }

    #[test]
    fn public_constructor_reports_missing_executable() {
        const MISSING: &str = "gitexec-no-such-binary-3f9c";
        let config = ExecutorConfig::default().with_git_path("").with_lookup_name(MISSING);
        let err = crate::new(config).err().unwrap();
        assert!(matches!(err, GitError::NotFound { ref name, .. } if name == MISSING));
        assert!(err.result().is_none());
    }

    #[test]
    fn program_name_strips_extension() {
        assert_eq!(program_name(Path::new("/usr/bin/git")), "git");
        assert_eq!(program_name(Path::new("git.exe")), "git");
    }

    #[test]
    fn spawn_failure_returns_no_result() {
        let git = LiveGitExecutor::new(
            ExecutorConfig::default().with_git_path("/does/not/exist/git"),
        )
        .unwrap();
        let err = git.run_git(&["status"]).unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }));
        assert!(err.result().is_none());
    }

    #[test]
    fn already_cancelled_context_does_not_spawn() {
        let git = LiveGitExecutor::new(
            ExecutorConfig::default().with_git_path("/does/not/exist/git"),
        )
        .unwrap();
        let ctx = RunContext::with_timeout(std::time::Duration::ZERO);
        let err = git.run_git_context(&ctx, &["status"]).unwrap_err();
        assert!(matches!(err, GitError::DeadlineExceeded { .. }));
    }

    #[test]
    fn with_logger_leaves_original_untouched() {
        let git = LiveGitExecutor::new(ExecutorConfig::default().with_git_path("git")).unwrap();
        let logged = git.with_logger(Some(Dispatch::none()));
        assert!(logged.logger().is_some());
        assert!(git.logger().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_result() {
        let sh = LiveGitExecutor::new(ExecutorConfig::default().with_git_path("sh")).unwrap();
        let err = sh.run_git(&["-c", "echo out; echo err >&2; exit 3"]).unwrap_err();
        let result = err.result().unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout_lossy(), "out\n");
        assert_eq!(result.stderr_lossy(), "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn configured_env_replaces_inherited_env() {
        let sh = LiveGitExecutor::new(
            ExecutorConfig::default()
                .with_git_path("/bin/sh")
                .with_env(["GREETING=first", "GREETING=second"]),
        )
        .unwrap();
        let script = "printf '%s|%s' \"$GREETING\" \"${HOME:-unset}\"";
        let result = sh.run_git(&["-c", script]).unwrap();
        assert_eq!(result.stdout_lossy(), "second|unset");
    }
}
