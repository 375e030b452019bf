use crate::clients::{HttpOrderApi, OrderApi, OrderBoardClient, StaticToken};
use crate::framework::BoardClient;
use crate::lifecycle::BoardConfig;
use crate::listener::{ChannelHandle, EventListener, Subscription};
use crate::model::{BoardNotice, Order};
use crate::order_actor::BoardError;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Capacity of the notice broadcast. Slow subscribers lose the oldest notices.
const NOTICE_CAPACITY: usize = 32;

/// The running order board: one board actor, the fetch client in front of it and, once
/// [`attach`](OrderBoard::attach)ed, the push listener.
///
/// # Example
///
/// ```ignore
/// let board = OrderBoard::from_config(&config)?;
/// board.initialize().await?;
///
/// let (channel, _transport) = ws::connect(&socket_url, config.channel_buffer).await?;
/// board.attach(channel);
///
/// let live = board.client.snapshot(BucketId::Live).await?;
///
/// board.shutdown().await?;
/// ```
pub struct OrderBoard {
    /// Client for reading the board and triggering fetches
    pub client: OrderBoardClient,

    listener: EventListener,
    notices: broadcast::Sender<BoardNotice>,
    subscription: Option<Subscription>,

    /// Task handle of the board actor (used for graceful shutdown)
    handle: JoinHandle<()>,
}

impl OrderBoard {
    /// Spawns the board actor and wires the fetch client and listener to it.
    pub fn new(api: Arc<dyn OrderApi>, config: &BoardConfig) -> Self {
        let (actor, board) = crate::order_actor::new(config.channel_buffer, config.page_size);
        let handle = tokio::spawn(actor.run());

        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let client = OrderBoardClient::new(board.clone(), api, notices.clone());
        let listener = EventListener::new(board, notices.clone());

        Self {
            client,
            listener,
            notices,
            subscription: None,
            handle,
        }
    }

    /// Builds the board against the HTTP order API described by `config`.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let tokens = Arc::new(StaticToken(config.token.clone()));
        let api = HttpOrderApi::from_config(config, tokens)?;
        Ok(Self::new(Arc::new(api), config))
    }

    /// Loads page 1 of every bucket.
    pub async fn initialize(&self) -> Result<(), BoardError> {
        info!("Loading all buckets");
        self.client.load_all().await
    }

    /// Starts applying push events from `channel`. A previous subscription is released first.
    pub fn attach(&mut self, channel: ChannelHandle) {
        if self.subscription.take().is_some() {
            info!("Replacing push subscription");
        }
        self.subscription = Some(self.listener.subscribe(channel));
    }

    /// Stops applying push events.
    pub async fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe().await;
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Subscribes to fetch failures and delivery notices.
    pub fn notices(&self) -> broadcast::Receiver<BoardNotice> {
        self.notices.subscribe()
    }

    /// The raw board handle, shared by the fetch path and the event path.
    pub fn board(&self) -> &BoardClient<Order> {
        self.client.board()
    }

    /// Gracefully shuts down the board.
    ///
    /// Releases the push subscription, drops the clients so the actor's mailbox closes, and
    /// waits for the actor to exit. Clones of [`OrderBoardClient`] handed out earlier keep
    /// the actor alive and must be dropped first.
    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down board...");
        self.detach().await;

        drop(self.client);
        drop(self.listener);

        if let Err(e) = self.handle.await {
            error!("Board task failed: {:?}", e);
            return Err(format!("Board task failed: {:?}", e));
        }

        info!("Board shutdown complete.");
        Ok(())
    }
}
