use super::bucket::BucketId;
use super::order::OrderId;

/// Transient, user-facing notices published by the board.
///
/// The view layer subscribes to these through
/// [`OrderBoard::notices`](crate::lifecycle::OrderBoard::notices).
#[derive(Debug, Clone, PartialEq)]
pub enum BoardNotice {
    /// A fetch failed; the bucket kept its last known-good contents.
    FetchFailed { bucket: BucketId, message: String },
    /// A delivery person was assigned to the order.
    DeliveryAssigned(OrderId),
}
