//! # Core Board Framework
//!
//! This module defines the generic building blocks of the order board.
//!
//! ## Key Types
//!
//! - [`BoardEntity`]: The trait that entities shown on the board must implement.
//! - [`BoardActor`]: The task that exclusively owns the [`BucketStore`].
//! - [`BoardClient`]: The cloneable handle used by the fetch path and the event path.
//! - [`FrameworkError`]: Channel-level failures (actor closed, response dropped).

use super::bucket::{BucketStore, PageMode};
use crate::model::{BucketId, PageInfo};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any entity must implement to be kept in the buckets of a [`BoardActor`].
///
/// # Architecture Note
/// The actor only ever looks at two things: the identifier (for de-duplication and
/// membership) and the bucket the entity's current state maps to. Everything else is
/// payload it carries around untouched.
pub trait BoardEntity: Clone + Send + Sync + Debug + 'static {
    /// The unique, immutable identifier of the entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    fn id(&self) -> &Self::Id;

    /// The bucket that displays this entity, or `None` when its state is shown nowhere.
    fn bucket(&self) -> Option<BucketId>;

    /// Moves the entity into its cancelled state.
    fn mark_cancelled(&mut self);
}

// =============================================================================
// 2. THE MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the board framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Board actor closed")]
    ActorClosed,
    #[error("Board actor dropped response channel")]
    ActorDropped,
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Proof that a fetch was started, carrying the generation it must match to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub bucket: BucketId,
    pub generation: u64,
    pub page_size: u32,
    /// Event sequence at the moment the fetch started. Events after it win over the page.
    pub event_seq: u64,
}

/// Read-only copy of one bucket for the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSnapshot<T> {
    pub bucket: BucketId,
    pub orders: Vec<T>,
    pub page_info: PageInfo,
    pub page_size: u32,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// Per-bucket counts for dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSummary {
    pub live: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total: usize,
}

/// Messages understood by the [`BoardActor`].
///
/// Each message is one atomic step against the [`BucketStore`]: the actor handles them
/// strictly one after another, so a push event arriving mid-fetch can never observe or
/// produce a half-applied state.
#[derive(Debug)]
pub enum BoardRequest<T: BoardEntity> {
    Snapshot {
        bucket: BucketId,
        respond_to: Response<BucketSnapshot<T>>,
    },
    Summary {
        respond_to: Response<BoardSummary>,
    },
    BeginFetch {
        bucket: BucketId,
        respond_to: Response<FetchTicket>,
    },
    FinishFetch {
        ticket: FetchTicket,
        mode: PageMode,
        orders: Vec<T>,
        page_info: PageInfo,
        respond_to: Response<bool>,
    },
    FailFetch {
        ticket: FetchTicket,
        message: String,
        respond_to: Response<bool>,
    },
    Prepend {
        bucket: BucketId,
        entity: T,
        respond_to: Response<()>,
    },
    Cancel {
        id: T::Id,
        respond_to: Response<Option<BucketId>>,
    },
    Reassign {
        entity: T,
        respond_to: Response<Option<BucketId>>,
    },
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// The task that owns the board state.
///
/// **Concurrency Model**:
/// The store is never shared. The fetch path and the event path both talk to it through
/// a [`BoardClient`], and the actor applies their requests in arrival order. No locks.
pub struct BoardActor<T: BoardEntity> {
    receiver: mpsc::Receiver<BoardRequest<T>>,
    store: BucketStore<T>,
}

impl<T: BoardEntity> BoardActor<T> {
    pub fn new(buffer_size: usize, page_size: u32) -> (Self, BoardClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BucketStore::new(page_size),
        };
        (actor, BoardClient::new(sender))
    }

    /// Runs the actor's event loop until every [`BoardClient`] is dropped.
    pub async fn run(mut self) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Board started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }

        info!(entity_type, size = self.store.total(), "Shutdown");
    }

    fn handle(&mut self, msg: BoardRequest<T>) {
        match msg {
            BoardRequest::Snapshot { bucket, respond_to } => {
                let _ = respond_to.send(Ok(self.snapshot(bucket)));
            }
            BoardRequest::Summary { respond_to } => {
                let summary = BoardSummary {
                    live: self.store.bucket(BucketId::Live).len(),
                    completed: self.store.bucket(BucketId::Completed).len(),
                    cancelled: self.store.bucket(BucketId::Cancelled).len(),
                    total: self.store.total(),
                };
                let _ = respond_to.send(Ok(summary));
            }
            BoardRequest::BeginFetch { bucket, respond_to } => {
                let event_seq = self.store.event_seq();
                let target = self.store.bucket_mut(bucket);
                let generation = target.begin_fetch();
                debug!(%bucket, generation, event_seq, "Fetch started");
                let ticket = FetchTicket {
                    bucket,
                    generation,
                    page_size: target.page_size(),
                    event_seq,
                };
                let _ = respond_to.send(Ok(ticket));
            }
            BoardRequest::FinishFetch {
                ticket,
                mode,
                orders,
                page_info,
                respond_to,
            } => {
                let bucket = ticket.bucket;
                if !self.store.bucket(bucket).is_current(ticket.generation) {
                    debug!(%bucket, generation = ticket.generation, "Stale fetch discarded");
                    let _ = respond_to.send(Ok(false));
                    return;
                }
                let count = orders.len();
                self.store
                    .apply_page(bucket, mode, orders, page_info, ticket.event_seq);
                let target = self.store.bucket_mut(bucket);
                target.settle(None);
                info!(
                    %bucket,
                    ?mode,
                    count,
                    page = target.page_info().current_page,
                    size = target.len(),
                    "Page applied"
                );
                self.store.prune_event_writes();
                let _ = respond_to.send(Ok(true));
            }
            BoardRequest::FailFetch {
                ticket,
                message,
                respond_to,
            } => {
                let bucket = ticket.bucket;
                let target = self.store.bucket_mut(bucket);
                if !target.is_current(ticket.generation) {
                    debug!(%bucket, generation = ticket.generation, "Stale failure ignored");
                    let _ = respond_to.send(Ok(false));
                    return;
                }
                warn!(%bucket, error = %message, "Fetch failed, keeping last known-good page");
                target.settle(Some(message));
                self.store.prune_event_writes();
                let _ = respond_to.send(Ok(true));
            }
            BoardRequest::Prepend {
                bucket,
                entity,
                respond_to,
            } => {
                let id = entity.id().clone();
                for other in BucketId::ALL.into_iter().filter(|b| *b != bucket) {
                    self.store.bucket_mut(other).remove_by_id(&id);
                }
                self.store.bucket_mut(bucket).prepend(entity);
                self.store.record_event(&id);
                info!(%bucket, %id, "Prepended");
                let _ = respond_to.send(Ok(()));
            }
            BoardRequest::Cancel { id, respond_to } => {
                let moved = self.store.locate(&id).and_then(|source| {
                    let mut entity = self.store.bucket_mut(source).remove_by_id(&id)?;
                    entity.mark_cancelled();
                    self.store.bucket_mut(BucketId::Cancelled).prepend(entity);
                    Some(source)
                });
                self.store.record_event(&id);
                match moved {
                    Some(source) => info!(%id, from = %source, "Cancelled"),
                    None => debug!(%id, "Cancel for unknown order ignored"),
                }
                let _ = respond_to.send(Ok(moved));
            }
            BoardRequest::Reassign { entity, respond_to } => {
                let id = entity.id().clone();
                let removed = self.store.remove_everywhere(&id);
                self.store.record_event(&id);
                let target = entity.bucket();
                match target {
                    Some(bucket) => {
                        self.store.bucket_mut(bucket).prepend(entity);
                        info!(%id, to = %bucket, removed, "Reassigned");
                    }
                    None => info!(%id, removed, "Reassigned out of view"),
                }
                let _ = respond_to.send(Ok(target));
            }
        }
    }

    fn snapshot(&self, bucket: BucketId) -> BucketSnapshot<T> {
        let source = self.store.bucket(bucket);
        BucketSnapshot {
            bucket,
            orders: source.orders().to_vec(),
            page_info: source.page_info().clone(),
            page_size: source.page_size(),
            loading: source.loading(),
            last_error: source.last_error().map(str::to_string),
        }
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A type-safe handle for interacting with a [`BoardActor`].
#[derive(Clone)]
pub struct BoardClient<T: BoardEntity> {
    sender: mpsc::Sender<BoardRequest<T>>,
}

impl<T: BoardEntity> BoardClient<T> {
    pub fn new(sender: mpsc::Sender<BoardRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R>) -> BoardRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn snapshot(&self, bucket: BucketId) -> Result<BucketSnapshot<T>, FrameworkError> {
        self.call(|respond_to| BoardRequest::Snapshot { bucket, respond_to })
            .await
    }

    pub async fn summary(&self) -> Result<BoardSummary, FrameworkError> {
        self.call(|respond_to| BoardRequest::Summary { respond_to })
            .await
    }

    pub async fn begin_fetch(&self, bucket: BucketId) -> Result<FetchTicket, FrameworkError> {
        self.call(|respond_to| BoardRequest::BeginFetch { bucket, respond_to })
            .await
    }

    /// Applies a fetched page. Returns `false` when a newer fetch superseded this one.
    pub async fn finish_fetch(
        &self,
        ticket: FetchTicket,
        mode: PageMode,
        orders: Vec<T>,
        page_info: PageInfo,
    ) -> Result<bool, FrameworkError> {
        self.call(|respond_to| BoardRequest::FinishFetch {
            ticket,
            mode,
            orders,
            page_info,
            respond_to,
        })
        .await
    }

    /// Records a failed fetch. Returns `false` when a newer fetch superseded this one.
    pub async fn fail_fetch(
        &self,
        ticket: FetchTicket,
        message: String,
    ) -> Result<bool, FrameworkError> {
        self.call(|respond_to| BoardRequest::FailFetch {
            ticket,
            message,
            respond_to,
        })
        .await
    }

    pub async fn prepend(&self, bucket: BucketId, entity: T) -> Result<(), FrameworkError> {
        self.call(|respond_to| BoardRequest::Prepend {
            bucket,
            entity,
            respond_to,
        })
        .await
    }

    /// Moves `id` into the cancelled bucket. Returns the bucket it came from, or `None`
    /// when the board does not hold it.
    pub async fn cancel(&self, id: T::Id) -> Result<Option<BucketId>, FrameworkError> {
        self.call(|respond_to| BoardRequest::Cancel { id, respond_to })
            .await
    }

    /// Removes the entity's id from every bucket, then prepends it to the bucket its new
    /// state maps to. Returns that bucket.
    pub async fn reassign(&self, entity: T) -> Result<Option<BucketId>, FrameworkError> {
        self.call(|respond_to| BoardRequest::Reassign { entity, respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderId, OrderStatus};

    fn spawn_board() -> BoardClient<Order> {
        let (actor, client) = BoardActor::<Order>::new(16, 10);
        tokio::spawn(actor.run());
        client
    }

    fn ids(snapshot: &BucketSnapshot<Order>) -> Vec<&str> {
        snapshot.orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_reassign_moves_order_between_buckets() {
        let board = spawn_board();
        board
            .prepend(BucketId::Live, Order::new("A", OrderStatus::Preparing))
            .await
            .unwrap();

        let target = board
            .reassign(Order::new("A", OrderStatus::Completed))
            .await
            .unwrap();
        assert_eq!(target, Some(BucketId::Completed));

        let live = board.snapshot(BucketId::Live).await.unwrap();
        let completed = board.snapshot(BucketId::Completed).await.unwrap();
        assert!(live.orders.is_empty());
        assert_eq!(ids(&completed), vec!["A"]);
        assert_eq!(completed.orders[0].status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_reassign_to_hidden_status_drops_from_view() {
        let board = spawn_board();
        board
            .prepend(BucketId::Live, Order::new("A", OrderStatus::Preparing))
            .await
            .unwrap();

        let target = board
            .reassign(Order::new("A", OrderStatus::Other("ready".into())))
            .await
            .unwrap();

        assert_eq!(target, None);
        assert_eq!(board.summary().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_cancel_moves_and_marks_order() {
        let board = spawn_board();
        board
            .prepend(BucketId::Completed, Order::new("A", OrderStatus::InDelivery))
            .await
            .unwrap();

        let source = board.cancel(OrderId::from("A")).await.unwrap();
        assert_eq!(source, Some(BucketId::Completed));

        let cancelled = board.snapshot(BucketId::Cancelled).await.unwrap();
        assert_eq!(ids(&cancelled), vec!["A"]);
        assert_eq!(cancelled.orders[0].status, OrderStatus::Cancelled);
        assert!(board
            .snapshot(BucketId::Completed)
            .await
            .unwrap()
            .orders
            .is_empty());
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_is_noop() {
        let board = spawn_board();
        let source = board.cancel(OrderId::from("Z")).await.unwrap();
        assert_eq!(source, None);
        assert_eq!(board.summary().await.unwrap(), BoardSummary::default());
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let board = spawn_board();
        let first = board.begin_fetch(BucketId::Live).await.unwrap();
        let second = board.begin_fetch(BucketId::Live).await.unwrap();

        let page = PageInfo {
            current_page: 1,
            total_pages: 1,
            total_orders: 1,
            ..PageInfo::default()
        };
        let applied = board
            .finish_fetch(
                second,
                PageMode::Replace,
                vec![Order::new("new", OrderStatus::Preparing)],
                page.clone(),
            )
            .await
            .unwrap();
        assert!(applied);

        let applied = board
            .finish_fetch(
                first,
                PageMode::Replace,
                vec![Order::new("old", OrderStatus::Preparing)],
                page,
            )
            .await
            .unwrap();
        assert!(!applied);

        let live = board.snapshot(BucketId::Live).await.unwrap();
        assert_eq!(ids(&live), vec!["new"]);
        assert!(!live.loading);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_contents_and_clears_loading() {
        let board = spawn_board();
        board
            .prepend(BucketId::Live, Order::new("A", OrderStatus::Preparing))
            .await
            .unwrap();

        let ticket = board.begin_fetch(BucketId::Live).await.unwrap();
        assert!(board.snapshot(BucketId::Live).await.unwrap().loading);

        let recorded = board
            .fail_fetch(ticket, "HTTP 500".to_string())
            .await
            .unwrap();
        assert!(recorded);

        let live = board.snapshot(BucketId::Live).await.unwrap();
        assert_eq!(ids(&live), vec!["A"]);
        assert!(!live.loading);
        assert_eq!(live.last_error.as_deref(), Some("HTTP 500"));
    }

    #[tokio::test]
    async fn test_event_during_fetch_survives_page() {
        let board = spawn_board();
        board
            .prepend(BucketId::Live, Order::new("A", OrderStatus::Preparing))
            .await
            .unwrap();

        let ticket = board.begin_fetch(BucketId::Live).await.unwrap();
        let target = board
            .reassign(Order::new("X", OrderStatus::Completed))
            .await
            .unwrap();
        assert_eq!(target, Some(BucketId::Completed));

        let page = PageInfo {
            current_page: 2,
            total_pages: 2,
            total_orders: 2,
            has_next: false,
            has_prev: true,
        };
        let applied = board
            .finish_fetch(
                ticket,
                PageMode::Append,
                vec![Order::new("X", OrderStatus::Preparing)],
                page,
            )
            .await
            .unwrap();
        assert!(applied);

        let live = board.snapshot(BucketId::Live).await.unwrap();
        let completed = board.snapshot(BucketId::Completed).await.unwrap();
        assert_eq!(ids(&live), vec!["A"]);
        assert_eq!(ids(&completed), vec!["X"]);
        assert_eq!(completed.orders[0].status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_client_reports_closed_actor() {
        let (actor, client) = BoardActor::<Order>::new(4, 10);
        drop(actor);
        let result = client.summary().await;
        assert_eq!(result, Err(FrameworkError::ActorClosed));
    }
}
