//! # Mock Framework
//!
//! Utilities for testing code that talks to a [`BoardClient`] without spawning a
//! [`BoardActor`](crate::framework::BoardActor).
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests land on.
//! Then use helpers like [`expect_begin_fetch`] or [`expect_reassign`] to assert what the
//! code under test sent, and answer through the returned responder.
//!
//! ```ignore
//! let (board, mut receiver) = create_mock_client::<Order>(10);
//! let task = tokio::spawn(async move { board.cancel(OrderId::from("A")).await });
//!
//! let (id, responder) = expect_cancel(&mut receiver).await.expect("Expected Cancel request");
//! assert_eq!(id, OrderId::from("A"));
//! responder.send(Ok(Some(BucketId::Live))).unwrap();
//! ```

use crate::framework::{BoardClient, BoardEntity, BoardRequest, FetchTicket, PageMode, Response};
use crate::model::{BucketId, PageInfo};
use tokio::sync::mpsc;

/// Creates a client whose requests are delivered to the returned receiver.
pub fn create_mock_client<T: BoardEntity>(
    buffer_size: usize,
) -> (BoardClient<T>, mpsc::Receiver<BoardRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (BoardClient::new(sender), receiver)
}

/// Helper to verify that the next message is a BeginFetch request
pub async fn expect_begin_fetch<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(BucketId, Response<FetchTicket>)> {
    match receiver.recv().await {
        Some(BoardRequest::BeginFetch { bucket, respond_to }) => Some((bucket, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FinishFetch request
#[allow(clippy::type_complexity)]
pub async fn expect_finish_fetch<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(FetchTicket, PageMode, Vec<T>, PageInfo, Response<bool>)> {
    match receiver.recv().await {
        Some(BoardRequest::FinishFetch {
            ticket,
            mode,
            orders,
            page_info,
            respond_to,
        }) => Some((ticket, mode, orders, page_info, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FailFetch request
pub async fn expect_fail_fetch<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(FetchTicket, String, Response<bool>)> {
    match receiver.recv().await {
        Some(BoardRequest::FailFetch {
            ticket,
            message,
            respond_to,
        }) => Some((ticket, message, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(BucketId, Response<crate::framework::BucketSnapshot<T>>)> {
    match receiver.recv().await {
        Some(BoardRequest::Snapshot { bucket, respond_to }) => Some((bucket, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Prepend request
pub async fn expect_prepend<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(BucketId, T, Response<()>)> {
    match receiver.recv().await {
        Some(BoardRequest::Prepend {
            bucket,
            entity,
            respond_to,
        }) => Some((bucket, entity, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Cancel request
pub async fn expect_cancel<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(T::Id, Response<Option<BucketId>>)> {
    match receiver.recv().await {
        Some(BoardRequest::Cancel { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Reassign request
pub async fn expect_reassign<T: BoardEntity>(
    receiver: &mut mpsc::Receiver<BoardRequest<T>>,
) -> Option<(T, Response<Option<BucketId>>)> {
    match receiver.recv().await {
        Some(BoardRequest::Reassign { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}
