//! Per-call cancellation and deadlines.
//!
//! Every client operation takes a [`Context`]. The in-flight request is raced
//! against the context's cancel signal and deadline; whichever fires first
//! ends the call with [`ErrorKind::Cancelled`] or [`ErrorKind::DeadlineExceeded`].
//!
//! ```rust,ignore
//! let (ctx, cancel) = Context::background()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancel();
//! tokio::spawn(async move { shutdown.await; cancel.cancel(); });
//! let certs = client.certificates().list(&ctx, &Default::default()).await?;
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::error::ErrorKind;

/// Cancellation and deadline scope for one or more calls.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Option<watch::Receiver<bool>>,
}

/// Fires the cancel signal of the [`Context`] it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }
}

impl Context {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Add a deadline `timeout` from now. An earlier existing deadline is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a cancellable context. Cancelling it does not affect `self`.
    pub fn with_cancel(self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let parent = self.cancelled.clone();
        let ctx = Self {
            deadline: self.deadline,
            cancelled: Some(receiver),
        };

        if parent.as_ref().is_some_and(|p| *p.borrow()) {
            let _ = sender.send(true);
        }
        // Propagate a later parent cancel into the child. Needs a running runtime.
        if let (Some(mut parent), Ok(runtime)) = (parent, tokio::runtime::Handle::try_current()) {
            let child = sender.clone();
            runtime.spawn(async move {
                // Ends on parent cancel, or once every child receiver is gone.
                tokio::select! {
                    cancelled = async { parent.wait_for(|c| *c).await.is_ok() } => {
                        if cancelled {
                            let _ = child.send(true);
                        }
                    }
                    _ = child.closed() => {}
                }
            });
        }

        (ctx, CancelHandle { sender })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fail fast if the context is already done.
    pub fn check(&self) -> Result<(), ErrorKind> {
        if self.is_cancelled() {
            return Err(ErrorKind::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ErrorKind::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context fires first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ErrorKind>
    where
        F: Future<Output = Result<T, ErrorKind>>,
    {
        self.check()?;

        let cancelled = async {
            match self.cancelled.clone() {
                // A dropped handle can never cancel.
                Some(mut rx) => {
                    if rx.wait_for(|c| *c).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(d) => {
                    futures_timer::Delay::new(d.saturating_duration_since(Instant::now())).await
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(ErrorKind::Cancelled),
            _ = expired => Err(ErrorKind::DeadlineExceeded),
            out = fut => out,
        }
    }
}
