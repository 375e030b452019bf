//! # Order Board
//!
//! Runs the board against a live backend and logs what it sees:
//! 1. Loads page 1 of the live, completed and cancelled buckets.
//! 2. Connects to the push channel when `ORDER_BOARD_SOCKET_URL` is set.
//! 3. Logs notices until Ctrl-C, then prints the bucket sizes and shuts down.

use order_board::lifecycle::{setup_tracing, BoardConfig, OrderBoard};
use order_board::listener::ws;
use order_board::model::{BoardNotice, BucketId};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = BoardConfig::from_env().map_err(|e| e.to_string())?;
    info!(api_url = %config.api_url, page_size = config.page_size, "Starting order board");

    let mut board = OrderBoard::from_config(&config).map_err(|e| e.to_string())?;
    let mut notices = board.notices();

    let span = tracing::info_span!("initial_load");
    if let Err(e) = board.initialize().instrument(span).await {
        // Buckets that loaded stay usable.
        error!(error = %e, "Initial load incomplete");
    }

    let mut transport = None;
    if let Some(url) = config.socket_url.as_deref() {
        match ws::connect(url, config.channel_buffer).await {
            Ok((channel, handle)) => {
                board.attach(channel);
                transport = Some(handle);
            }
            Err(e) => warn!(error = %e, "Running without push updates"),
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            notice = notices.recv() => match notice {
                Ok(BoardNotice::FetchFailed { bucket, message }) => {
                    warn!(%bucket, %message, "Fetch failed");
                }
                Ok(BoardNotice::DeliveryAssigned(id)) => {
                    info!(order_id = %id, "Delivery person found");
                }
                Err(RecvError::Lagged(missed)) => warn!(missed, "Notices dropped"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    for bucket in BucketId::ALL {
        match board.client.snapshot(bucket).await {
            Ok(snapshot) => info!(
                %bucket,
                orders = snapshot.orders.len(),
                page = snapshot.page_info.current_page,
                total = snapshot.page_info.total_orders,
                "Final state"
            ),
            Err(e) => error!(%bucket, error = %e, "Snapshot failed"),
        }
    }

    board.shutdown().await?;
    if let Some(handle) = transport {
        handle.abort();
    }

    info!("Order board stopped");
    Ok(())
}
