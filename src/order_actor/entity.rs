//! BoardEntity trait implementation for the Order domain type.
//!
//! This module contains the [`BoardEntity`] trait implementation
//! that enables [`Order`] to be held by the generic [`crate::framework::BoardActor`].

use crate::framework::BoardEntity;
use crate::model::{classify, BucketId, Order, OrderId, OrderStatus};

impl BoardEntity for Order {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Bucket membership is decided by [`classify`] alone.
    fn bucket(&self) -> Option<BucketId> {
        classify(&self.status)
    }

    fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Cancelled;
    }
}
