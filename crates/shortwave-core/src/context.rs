use crate::error::ContextError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline scope for a single operation.
///
/// Every repository and service operation takes a `Context` and checks it
/// before doing any work, so an already-cancelled or timed-out request
/// short-circuits without touching storage. Long-running awaits (the
/// relational backend) are additionally driven through [`Context::run`]
/// so they inherit the bounded timeout.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// A context driven by an externally owned cancellation token.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Returns the underlying cancellation token.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fails fast if the context is already cancelled or past its deadline.
    pub fn ensure_active(&self) -> std::result::Result<(), ContextError> {
        if self.cancel.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drives `fut` to completion under this context.
    ///
    /// Resolves to `Cancelled` as soon as the token fires and to
    /// `DeadlineExceeded` once the deadline passes, whichever comes first.
    pub async fn run<F: Future>(&self, fut: F) -> std::result::Result<F::Output, ContextError> {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
                out = tokio::time::timeout_at(deadline, fut) => {
                    out.map_err(|_| ContextError::DeadlineExceeded)
                }
            },
            None => tokio::select! {
                _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
                out = fut => Ok(out),
            },
        }
    }
}
