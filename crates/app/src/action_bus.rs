//! In-process action bus: multicast fan-out of [`Action`]s.
//!
//! One producer (the delegate bridge) feeds any number of independent
//! subscribers. Each subscriber owns an unbounded queue so the producer
//! never blocks on, or skips, a slow consumer. Fan-out happens under the
//! registry lock: a subscriber attaching concurrently with a send either
//! gets that action or attached after it, never half of a broadcast, and a
//! subscriber detaching never affects what the others receive.

use std::any::Any;
use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use locport_domain::action::Action;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: BTreeMap<u64, mpsc::UnboundedSender<Action>>,
}

#[derive(Default)]
struct Registry {
    subscribers: Mutex<Subscribers>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn detach(&self, id: u64) {
        self.lock().senders.remove(&id);
    }
}

/// Hot, multicast source of actions.
///
/// Subscribers receive every action sent *after* they attached, in send
/// order; nothing is replayed. Cloning shares the same registry. When the
/// last handle is dropped, every stream completes once it has drained what
/// was already queued.
#[derive(Clone, Default)]
pub struct ActionBroadcaster {
    registry: Arc<Registry>,
}

impl ActionBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> ActionStream {
        self.attach(None)
    }

    /// Attach a new subscriber that keeps `owner` alive for as long as the
    /// stream exists.
    #[must_use]
    pub fn subscribe_with<T>(&self, owner: Arc<T>) -> ActionStream
    where
        T: Send + Sync + 'static,
    {
        self.attach(Some(owner))
    }

    fn attach(&self, keep_alive: Option<Arc<dyn Any + Send + Sync>>) -> ActionStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = {
            let mut subscribers = self.registry.lock();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.senders.insert(id, sender);
            id
        };
        tracing::trace!(subscriber = id, "action stream attached");

        ActionStream {
            id,
            receiver,
            registry: Arc::downgrade(&self.registry),
            _keep_alive: keep_alive,
        }
    }

    /// Deliver `action` to every current subscriber.
    ///
    /// Returns how many subscribers received it. Sending with no
    /// subscribers drops the action.
    pub fn send(&self, action: Action) -> usize {
        let mut subscribers = self.registry.lock();
        subscribers
            .senders
            .retain(|_, sender| sender.send(action.clone()).is_ok());
        subscribers.senders.len()
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().senders.len()
    }
}

/// One subscriber's view of the action bus.
///
/// Dropping the stream detaches it from the broadcaster.
pub struct ActionStream {
    id: u64,
    receiver: mpsc::UnboundedReceiver<Action>,
    registry: Weak<Registry>,
    _keep_alive: Option<Arc<dyn Any + Send + Sync>>,
}

impl ActionStream {
    /// A stream that is already complete.
    #[must_use]
    pub fn empty() -> Self {
        let (_, receiver) = mpsc::unbounded_channel();
        Self {
            id: 0,
            receiver,
            registry: Weak::new(),
            _keep_alive: None,
        }
    }

    /// Wait for the next action; `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<Action> {
        self.receiver.recv().await
    }

    /// Take an already queued action without waiting.
    pub fn try_recv(&mut self) -> Option<Action> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for ActionStream {
    type Item = Action;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Action>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for ActionStream {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
            tracing::trace!(subscriber = self.id, "action stream detached");
        }
    }
}

impl std::fmt::Debug for ActionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionStream")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
