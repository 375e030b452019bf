//! # Event Listener
//!
//! The event-driven half of the reconciler. Frames from a [`ChannelHandle`] are decoded
//! into [`PushEvent`]s and applied to the board one at a time, in delivery order. Each event
//! is a single board message, so it is atomic with respect to concurrent fetches.
//!
//! | Event | Effect on the board |
//! |---|---|
//! | `order-created` | Prepended to live if its status is preparing, otherwise ignored. |
//! | `order-cancelled-notification` | Moved from whichever bucket holds it into cancelled. Unknown ids are a no-op. |
//! | `order-status-updated` | Removed from all buckets, then prepended into the bucket for its new status. |
//! | `delivery-assigned` | No change. Republished as [`BoardNotice::DeliveryAssigned`]. |
//!
//! A corrupt frame is logged and dropped; the listener keeps running.

pub mod channel;
pub mod event;
pub mod packet;
pub mod ws;

pub use channel::*;
pub use event::*;

use crate::framework::{BoardClient, FrameworkError};
use crate::model::{BoardNotice, BucketId, Order, OrderStatus};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct EventListener {
    board: BoardClient<Order>,
    notices: broadcast::Sender<BoardNotice>,
}

impl EventListener {
    pub fn new(board: BoardClient<Order>, notices: broadcast::Sender<BoardNotice>) -> Self {
        Self { board, notices }
    }

    /// Applies one decoded event to the board.
    pub async fn apply(&self, event: PushEvent) -> Result<(), FrameworkError> {
        match event {
            PushEvent::OrderCreated(order) => {
                if order.status == OrderStatus::Preparing {
                    info!(order_id = %order.id, "New order");
                    self.board.prepend(BucketId::Live, order).await?;
                } else {
                    debug!(order_id = %order.id, status = %order.status, "Ignoring new order outside live");
                }
            }
            PushEvent::OrderCancelled(id) => match self.board.cancel(id.clone()).await? {
                Some(from) => info!(order_id = %id, %from, "Order cancelled"),
                None => debug!(order_id = %id, "Cancelled order not on board"),
            },
            PushEvent::StatusUpdated(order) => {
                let id = order.id.clone();
                let status = order.status.clone();
                match self.board.reassign(order).await? {
                    Some(bucket) => info!(order_id = %id, %status, %bucket, "Order moved"),
                    None => info!(order_id = %id, %status, "Order left the board"),
                }
            }
            PushEvent::DeliveryAssigned(id) => {
                info!(order_id = %id, "Delivery assigned");
                let _ = self.notices.send(BoardNotice::DeliveryAssigned(id));
            }
        }
        Ok(())
    }

    /// Decodes and applies one frame. Malformed or unknown frames are logged and skipped.
    pub async fn handle_frame(&self, frame: PushFrame) -> Result<(), FrameworkError> {
        let name = frame.event.clone();
        match PushEvent::from_frame(frame) {
            Ok(Some(event)) => {
                debug!(event = %name, ?event, "Applying event");
                self.apply(event).await
            }
            Ok(None) => {
                debug!(event = %name, "Ignoring unknown event");
                Ok(())
            }
            Err(e) => {
                warn!(event = %name, error = %e, "Dropping malformed event");
                Ok(())
            }
        }
    }

    /// Starts listening on `channel`. The listener runs until the channel closes, the board
    /// shuts down, or the returned [`Subscription`] is released.
    pub fn subscribe(&self, channel: ChannelHandle) -> Subscription {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(self.clone().run(channel, shutdown_rx));
        Subscription::new(shutdown, handle)
    }

    async fn run(self, mut channel: ChannelHandle, mut shutdown: oneshot::Receiver<()>) {
        info!("Event listener started");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Event listener unsubscribed");
                    break;
                }
                frame = channel.recv() => {
                    let Some(frame) = frame else {
                        info!("Push channel closed");
                        break;
                    };
                    if let Err(e) = self.handle_frame(frame).await {
                        warn!(error = %e, "Board unavailable, stopping listener");
                        break;
                    }
                }
            }
        }
    }
}
