//! Port traits defining external boundaries.
//!
//! Implementations live in `src/adapters/`.

pub mod git;

pub use git::{CommandResult, GitExecutor, GitFuture};
