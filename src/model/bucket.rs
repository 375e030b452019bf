//! The three status buckets of the board and the single status-to-bucket policy.

use super::order::OrderStatus;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the three disjoint order collections shown on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketId {
    /// Orders awaiting shop action.
    Live,
    /// Orders out for delivery or finished.
    Completed,
    Cancelled,
}

impl BucketId {
    /// Search order used whenever an identifier has to be located on the board.
    pub const ALL: [BucketId; 3] = [BucketId::Live, BucketId::Completed, BucketId::Cancelled];

    /// Status filter sent to the listing endpoint when this bucket is fetched.
    pub fn fetch_status(self) -> OrderStatus {
        match self {
            BucketId::Live => OrderStatus::Preparing,
            BucketId::Completed => OrderStatus::InDelivery,
            BucketId::Cancelled => OrderStatus::Cancelled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketId::Live => "live",
            BucketId::Completed => "completed",
            BucketId::Cancelled => "cancelled",
        }
    }
}

impl Display for BucketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a status to the bucket that displays it.
///
/// Used by both the fetch path and the event path. `None` means the order is shown nowhere.
pub fn classify(status: &OrderStatus) -> Option<BucketId> {
    match status {
        OrderStatus::Preparing => Some(BucketId::Live),
        OrderStatus::InDelivery | OrderStatus::Completed => Some(BucketId::Completed),
        OrderStatus::Cancelled => Some(BucketId::Cancelled),
        OrderStatus::Other(_) => None,
    }
}
