//! Live adapters for real process execution.

pub mod git;

pub use git::LiveGitExecutor;
