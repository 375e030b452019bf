//! Push channel handle and scoped subscriptions.

use super::event::PushFrame;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// The receiving end of a push channel, passed explicitly to the listener.
///
/// Produced by [`ws::connect`](super::ws::connect) in production, or by [`ChannelHandle::pair`]
/// for an in-memory channel.
#[derive(Debug)]
pub struct ChannelHandle {
    receiver: mpsc::Receiver<PushFrame>,
}

impl ChannelHandle {
    /// An in-memory channel. Frames sent on the returned sender reach the listener in order.
    pub fn pair(buffer: usize) -> (mpsc::Sender<PushFrame>, ChannelHandle) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, ChannelHandle { receiver })
    }

    pub fn from_receiver(receiver: mpsc::Receiver<PushFrame>) -> Self {
        Self { receiver }
    }

    pub(crate) async fn recv(&mut self) -> Option<PushFrame> {
        self.receiver.recv().await
    }
}

/// A running listener. Dropping it stops the listener task.
#[derive(Debug)]
pub struct Subscription {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(shutdown: oneshot::Sender<()>, handle: JoinHandle<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Whether the listener task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the listener after the event it is currently applying, and waits for it.
    pub async fn unsubscribe(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!(error = %e, "Listener task ended abnormally");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
