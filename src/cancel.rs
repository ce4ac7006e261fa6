//! Cancellation and deadlines for a single git run.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::GitError;

/// Why a [`RunContext`] fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fired {
    Cancelled,
    DeadlineExceeded,
}

impl Fired {
    pub(crate) fn into_error(self, command: String) -> GitError {
        match self {
            Self::Cancelled => GitError::Cancelled { command },
            Self::DeadlineExceeded => GitError::DeadlineExceeded { command },
        }
    }
}

/// A cancellation token and/or deadline bounding one git run.
///
/// When the context fires while git is running, the process is killed and
/// the run returns [`GitError::Cancelled`] or [`GitError::DeadlineExceeded`].
/// Cloning shares the token.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RunContext {
    /// A context that never fires.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled through `token`.
    #[must_use]
    pub fn new(token: CancellationToken) -> Self {
        Self { token: Some(token), deadline: None }
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline(Instant::now() + timeout)
    }

    /// Sets (or tightens) the deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    /// Returns the token, creating one if the context had none.
    pub fn token(&mut self) -> CancellationToken {
        self.token.get_or_insert_with(CancellationToken::new).clone()
    }

    /// Cancels the context. No-op for a context without a token.
    pub fn cancel(&self) {
        if let Some(token) = &self.token {
            token.cancel();
        }
    }

    /// Whether this context can ever fire.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        self.token.is_some() || self.deadline.is_some()
    }

    /// Returns the configured deadline, if any.
    #[must_use]
    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports whether the context has already fired.
    pub(crate) fn fired(&self) -> Option<Fired> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(Fired::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(Fired::DeadlineExceeded);
        }
        None
    }

    /// Resolves once the context fires. Pending forever for [`RunContext::background`].
    pub(crate) async fn done(&self) -> Fired {
        let cancelled = async {
            match &self.token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                }
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            () = cancelled => Fired::Cancelled,
            () = expired => Fired::DeadlineExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_never_fires() {
        let ctx = RunContext::background();
        assert!(!ctx.is_cancellable());
        assert_eq!(ctx.fired(), None);
        ctx.cancel();
        assert_eq!(ctx.fired(), None);
    }

    #[test]
    fn cancel_fires_shared_token() {
        let token = CancellationToken::new();
        let ctx = RunContext::new(token.clone());
        assert!(ctx.is_cancellable());
        assert_eq!(ctx.fired(), None);
        token.cancel();
        assert_eq!(ctx.fired(), Some(Fired::Cancelled));
    }

    #[test]
    fn expired_deadline_fires() {
        let ctx = RunContext::with_timeout(Duration::ZERO);
        assert_eq!(ctx.fired(), Some(Fired::DeadlineExceeded));
    }

    #[test]
    fn deadline_keeps_the_earliest() {
        let now = Instant::now();
        let early = now + Duration::from_secs(1);
        let late = now + Duration::from_secs(60);
        let ctx = RunContext::background().deadline(early).deadline(late);
        assert_eq!(ctx.deadline_at(), Some(early));
    }

    #[test]
    fn token_is_created_on_demand() {
        let mut ctx = RunContext::with_timeout(Duration::from_secs(60));
        let token = ctx.token();
        token.cancel();
        assert_eq!(ctx.fired(), Some(Fired::Cancelled));
    }

    #[tokio::test]
    async fn done_resolves_on_timeout() {
        let ctx = RunContext::with_timeout(Duration::from_millis(20));
        assert_eq!(ctx.done().await, Fired::DeadlineExceeded);
    }

    #[tokio::test]
    async fn done_resolves_on_cancel() {
        let token = CancellationToken::new();
        let ctx = RunContext::new(token.clone());
        token.cancel();
        assert_eq!(ctx.done().await, Fired::Cancelled);
    }
}
