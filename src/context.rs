// src/context.rs
// =============================================================================
// Cancellation and deadlines for remote calls.
//
// A Context is handed to every operation that talks to the network. Each
// remote call is wrapped with `ctx.run(...)`, which races the call against:
// - an explicit cancellation (triggered through a CancelHandle)
// - an optional deadline (set with `with_timeout`)
//
// Contexts are cheap to clone, so every concurrent download gets its own
// copy of the same signal.
//
// Rust concepts:
// - tokio::sync::watch: A single-value channel many receivers can observe
// - tokio::select!: Wait on several futures, continue with the first to finish
// =============================================================================

use std::future::Future;
use std::time::Duration;

use futures::future;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

// Why a context stopped a call before it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A cancellation signal plus an optional deadline.
#[derive(Debug, Clone)]
pub struct Context {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every clone of the context it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace never fails, even when all receivers are gone
        self.sender.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Context {
            cancel: None,
            deadline: None,
        }
    }

    /// A context that stops once `CancelHandle::cancel` is called.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let mut ctx = Context::background();
        ctx.cancel = Some(receiver);
        (ctx, CancelHandle { sender })
    }

    /// Adds a deadline `timeout` from now. An earlier existing deadline wins.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Runs `fut` to completion unless the context is cancelled or its
    /// deadline passes first. The future is dropped when interrupted.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Interrupted>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let cancelled = wait_for_cancel(self.cancel.clone());
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

// Resolves once the flag flips to true. Never resolves for a background
// context or when the handle was dropped without cancelling.
async fn wait_for_cancel(receiver: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = receiver else {
        return future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return future::pending().await;
        }
    }
}
