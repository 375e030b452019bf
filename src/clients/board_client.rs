//! # Order Board Client
//!
//! The user-driven half of the reconciler. Every view trigger (`load_page`, `refresh`,
//! `load_more`) follows the same three steps:
//!
//! 1. `begin_fetch` on the board, which marks the bucket loading and hands out a generation.
//! 2. The request against the [`OrderApi`].
//! 3. `finish_fetch` or `fail_fetch` with that generation. The board discards the outcome
//!    if a newer fetch for the same bucket was started in the meantime.
//!
//! On failure the bucket keeps its last known-good contents and a
//! [`BoardNotice::FetchFailed`] is published. Nothing is retried automatically.

use crate::clients::order_api::{FetchError, OrderApi};
use crate::framework::{BoardClient, BoardSummary, BucketSnapshot, PageMode};
use crate::model::{BoardNotice, BucketId, Order, OrderId};
use crate::order_actor::BoardError;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// What a load trigger did to its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched page was applied.
    Applied { orders: usize },
    /// A newer fetch for the same bucket was started; this result was dropped.
    Superseded,
    /// `load_more` on a bucket with no further pages. Nothing was fetched.
    Exhausted,
}

/// Client for the view layer: read snapshots and trigger fetches.
#[derive(Clone)]
pub struct OrderBoardClient {
    board: BoardClient<Order>,
    api: Arc<dyn OrderApi>,
    notices: broadcast::Sender<BoardNotice>,
}

impl OrderBoardClient {
    pub fn new(
        board: BoardClient<Order>,
        api: Arc<dyn OrderApi>,
        notices: broadcast::Sender<BoardNotice>,
    ) -> Self {
        Self {
            board,
            api,
            notices,
        }
    }

    /// The underlying board handle.
    pub fn board(&self) -> &BoardClient<Order> {
        &self.board
    }

    /// Loads `page` of `bucket`, replacing its contents.
    #[instrument(skip(self))]
    pub async fn load_page(&self, bucket: BucketId, page: u32) -> Result<LoadOutcome, BoardError> {
        self.fetch_into(bucket, page, PageMode::Replace).await
    }

    /// Refetches `bucket` from page 1.
    #[instrument(skip(self))]
    pub async fn refresh(&self, bucket: BucketId) -> Result<LoadOutcome, BoardError> {
        self.fetch_into(bucket, 1, PageMode::Replace).await
    }

    /// Appends the next page of `bucket`.
    #[instrument(skip(self))]
    pub async fn load_more(&self, bucket: BucketId) -> Result<LoadOutcome, BoardError> {
        let snapshot = self.board.snapshot(bucket).await?;
        match snapshot.page_info.next_page() {
            Some(page) => self.fetch_into(bucket, page, PageMode::Append).await,
            None => {
                debug!(%bucket, "No further pages");
                Ok(LoadOutcome::Exhausted)
            }
        }
    }

    /// Loads page 1 of every bucket concurrently. Each bucket succeeds or fails on its own;
    /// the first error is returned once all three have settled.
    pub async fn load_all(&self) -> Result<(), BoardError> {
        let (live, completed, cancelled) = tokio::join!(
            self.refresh(BucketId::Live),
            self.refresh(BucketId::Completed),
            self.refresh(BucketId::Cancelled),
        );
        live.and(completed).and(cancelled).map(|_| ())
    }

    pub async fn snapshot(&self, bucket: BucketId) -> Result<BucketSnapshot<Order>, BoardError> {
        Ok(self.board.snapshot(bucket).await?)
    }

    pub async fn summary(&self) -> Result<BoardSummary, BoardError> {
        Ok(self.board.summary().await?)
    }

    /// Fetches one order for a detail view. Never touches the buckets.
    #[instrument(skip(self))]
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, BoardError> {
        Ok(self.api.fetch_order(id).await?)
    }

    async fn fetch_into(
        &self,
        bucket: BucketId,
        page: u32,
        mode: PageMode,
    ) -> Result<LoadOutcome, BoardError> {
        if page == 0 {
            return Err(FetchError::InvalidRequest("page must be at least 1".into()).into());
        }

        let ticket = self.board.begin_fetch(bucket).await?;
        let generation = ticket.generation;
        let status = bucket.fetch_status();

        match self.api.fetch_orders(&status, page, ticket.page_size).await {
            Ok(fetched) => {
                let count = fetched.orders.len();
                let applied = self
                    .board
                    .finish_fetch(ticket, mode, fetched.orders, fetched.page_info)
                    .await?;
                if applied {
                    info!(%bucket, page, count, "Loaded");
                    Ok(LoadOutcome::Applied { orders: count })
                } else {
                    debug!(%bucket, page, generation, "Superseded by a newer fetch");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(e) => {
                let message = e.to_string();
                let current = self.board.fail_fetch(ticket, message.clone()).await?;
                if current {
                    // No receivers is fine: nobody is watching notices.
                    let _ = self.notices.send(BoardNotice::FetchFailed { bucket, message });
                }
                Err(e.into())
            }
        }
    }
}
