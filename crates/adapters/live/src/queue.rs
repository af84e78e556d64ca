//! Serial command queue.
//!
//! Fire-and-forget commands are pushed onto an unbounded channel and run,
//! in push order, by one worker task per adapter. The caller never waits
//! on the hardware. The worker exits once the adapter is dropped.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use locport_app::ports::LocationHardware;

use crate::error::LiveError;

type Job<H> = Box<dyn FnOnce(&H) + Send>;

pub(crate) struct CommandQueue<H> {
    sender: mpsc::UnboundedSender<(&'static str, Job<H>)>,
}

impl<H: LocationHardware + 'static> CommandQueue<H> {
    /// Spawn the worker on the current tokio runtime.
    pub(crate) fn start(hardware: Arc<H>) -> Result<Self, LiveError> {
        let runtime = Handle::try_current()?;
        let (sender, mut receiver) = mpsc::unbounded_channel::<(&'static str, Job<H>)>();

        runtime.spawn(async move {
            while let Some((command, job)) = receiver.recv().await {
                tracing::trace!(command, "dispatching location command");
                job(&hardware);
            }
            tracing::debug!("location command queue closed");
        });

        Ok(Self { sender })
    }

    pub(crate) fn push(&self, command: &'static str, job: impl FnOnce(&H) + Send + 'static) {
        if self.sender.send((command, Box::new(job))).is_err() {
            tracing::warn!(command, "location command queue stopped, dropping command");
        }
    }

    /// Resolve once every job pushed before this call has run.
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.push("flush", move |_| {
            let _ = done.send(());
        });
        let _ = wait.await;
    }
}
