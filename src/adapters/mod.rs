//! Adapters implementing the [`GitExecutor`](crate::ports::GitExecutor) port.
//!
//! - `live` spawns the real executable.
//! - `recording` wraps another executor and captures runs to a cassette.
//! - `replaying` serves runs from a cassette without spawning anything.

pub mod live;
pub mod recording;
pub mod replaying;
