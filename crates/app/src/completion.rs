//! Completion bridge: turns a completion-handler call into an awaitable
//! result.
//!
//! [`Completion::channel`] creates a pending slot. The [`Completion`] half
//! is handed to the hardware; the [`Pending`] half is awaited by the
//! caller. The slot resolves at most once: later `complete` calls, from any
//! clone, are ignored. If every clone is dropped unresolved, the caller
//! gets [`ErrorCode::CompletionDropped`] instead of waiting forever.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use locport_domain::error::{ErrorCode, LocationError};

type Slot = Arc<Mutex<Option<oneshot::Sender<Result<(), LocationError>>>>>;

/// Resolving side of a one-shot request.
#[derive(Clone)]
pub struct Completion {
    slot: Slot,
}

impl Completion {
    /// Create a linked completion / pending pair.
    #[must_use]
    pub fn channel() -> (Self, Pending) {
        let (sender, receiver) = oneshot::channel();
        let completion = Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (completion, Pending { receiver })
    }

    /// Resolve the request: `None` for success, `Some(error)` for failure.
    ///
    /// Returns `true` if this call resolved it, `false` if it was already
    /// resolved.
    pub fn complete(&self, error: Option<LocationError>) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(sender) = sender else {
            tracing::debug!("completion already resolved, ignoring");
            return false;
        };

        let result = error.map_or(Ok(()), Err);
        if sender.send(result).is_err() {
            tracing::debug!("completion resolved after the caller stopped waiting");
        }
        true
    }

    /// Whether the request has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Awaiting side of a one-shot request.
#[derive(Debug)]
pub struct Pending {
    receiver: oneshot::Receiver<Result<(), LocationError>>,
}

impl Future for Pending {
    type Output = Result<(), LocationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| Err(LocationError::new(ErrorCode::CompletionDropped)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_resolve_with_success() {
        let (completion, pending) = Completion::channel();
        assert!(completion.complete(None));
        assert_eq!(pending.await, Ok(()));
    }

    #[tokio::test]
    async fn should_resolve_with_error() {
        let (completion, pending) = Completion::channel();
        completion.complete(Some(LocationError::new(ErrorCode::PromptDeclined)));
        assert_eq!(
            pending.await,
            Err(LocationError::new(ErrorCode::PromptDeclined))
        );
    }

    #[tokio::test]
    async fn should_ignore_second_resolution() {
        let (completion, pending) = Completion::channel();
        let other_path = completion.clone();

        assert!(completion.complete(None));
        assert!(!other_path.complete(Some(LocationError::new(ErrorCode::Denied))));
        assert!(other_path.is_resolved());
        assert_eq!(pending.await, Ok(()));
    }

    #[tokio::test]
    async fn should_report_dropped_completion() {
        let (completion, pending) = Completion::channel();
        drop(completion);
        assert_eq!(
            pending.await,
            Err(LocationError::new(ErrorCode::CompletionDropped))
        );
    }

    #[tokio::test]
    async fn should_resolve_from_another_task() {
        let (completion, pending) = Completion::channel();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            completion.complete(None);
        });
        assert_eq!(pending.await, Ok(()));
    }

    #[test]
    fn should_accept_resolution_after_caller_gave_up() {
        let (completion, pending) = Completion::channel();
        drop(pending);
        assert!(completion.complete(None));
        assert!(!completion.complete(None));
    }
}
