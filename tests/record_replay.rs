//! Record-replay round trip.
//!
//! 1. Record live runs through `RecordingGitExecutor`.
//! 2. Replay the cassette via `ExecutorMode::Replaying`.
//! 3. Assert identical results, including the non-zero exit path.

#![cfg(unix)]

use gitexec::adapters::live::LiveGitExecutor;
use gitexec::adapters::recording::RecordingGitExecutor;
use gitexec::{CommandResult, ExecutorConfig, ExecutorMode, GitError, GitExecutor};

fn exercise(git: &dyn GitExecutor) -> (CommandResult, CommandResult, bool) {
    let ok = git.run_git(&["-c", "printf 'On branch main\\n'"]).unwrap();
    let exited = git
        .run_git(&["-c", "echo fatal: not a git repository >&2; exit 128"])
        .unwrap_err()
        .into_result()
        .unwrap();
    let trivial = git.run_git(&["-c", "exit 0"]).is_ok();
    (ok, exited, trivial)
}

#[test]
fn record_then_replay_produces_identical_results() {
    let dir = std::env::temp_dir().join("gitexec_record_replay_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("roundtrip.cassette.yaml");

    // --- Phase 1: record live runs ---
    let recorded = {
        let live = LiveGitExecutor::new(ExecutorConfig::default().with_git_path("sh")).unwrap();
        let git = RecordingGitExecutor::create(Box::new(live), &cassette_path);
        let outputs = exercise(&git);
        outputs
    };
    assert_eq!(recorded.0.stdout_lossy(), "On branch main\n");
    assert_eq!(recorded.1.exit_code, 128);

    // --- Phase 2: replay and compare ---
    let replaying = ExecutorMode::Replaying(cassette_path.clone())
        .build(ExecutorConfig::default())
        .unwrap();
    let replayed = exercise(replaying.as_ref());
    assert_eq!(recorded, replayed);

    // --- Phase 3: a second replay is deterministic ---
    let again = ExecutorMode::Replaying(cassette_path).build(ExecutorConfig::default()).unwrap();
    assert_eq!(replayed, exercise(again.as_ref()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replayed_exit_error_keeps_exit_code() {
    let dir = std::env::temp_dir().join("gitexec_record_replay_message_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("message.cassette.yaml");

    {
        let config = ExecutorConfig::default().with_git_path("/bin/sh");
        let live = LiveGitExecutor::new(config).unwrap();
        let git = RecordingGitExecutor::create(Box::new(live), &cassette_path);
        let _ = git.run_git(&["-c", "exit 2"]);
    }

    let replaying =
        ExecutorMode::Replaying(cassette_path).build(ExecutorConfig::default()).unwrap();
    let err = replaying.run_git(&["-c", "exit 2"]).unwrap_err();
    assert!(matches!(err, GitError::Exit { .. }));
    assert_eq!(err.exit_code(), Some(2));

    let _ = std::fs::remove_dir_all(&dir);
}
