//! Logger construction using tracing.
//!
//! Executors log to the [`Dispatch`] they are configured with rather than
//! the global subscriber, so these helpers return one instead of calling
//! `init()`.

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build a logger writing formatted events to stderr.
///
/// `verbose` forces the `debug` level (which includes the `execute` event);
/// otherwise `RUST_LOG` is honoured with `info` as the fallback.
#[must_use]
pub fn stderr_logger(verbose: bool, json: bool) -> Dispatch {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .into()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .into()
    }
}

/// Build a debug-level logger writing plain text to `writer`.
#[must_use]
pub fn writer_logger<W>(writer: W) -> Dispatch
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .into()
}
