//! Socket.IO transport for the push channel.

use super::channel::ChannelHandle;
use super::packet::{self, socket_url, Packet};
use crate::order_actor::BoardError;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Connects to the Socket.IO server at `url` and forwards every event as a
/// [`PushFrame`](super::PushFrame).
///
/// `url` may be the plain server address (`https://api.example.com`); the Engine.IO
/// handshake path is added. The task joins the default namespace once the server opens the
/// session and answers heartbeats. It ends when the server closes the socket, the
/// connection fails, or the [`ChannelHandle`] is dropped. There is no reconnection.
pub async fn connect(url: &str, buffer: usize) -> Result<(ChannelHandle, JoinHandle<()>), BoardError> {
    let endpoint = socket_url(url);
    let (mut socket, _) = connect_async(endpoint.as_str())
        .await
        .map_err(|e| BoardError::Channel(e.to_string()))?;
    info!(url = %endpoint, "Push channel connected");

    let (sender, receiver) = mpsc::channel(buffer);
    let handle = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                _ = sender.closed() => {
                    debug!("Listener gone, closing push channel");
                    break;
                }
                message = socket.next() => message,
            };

            let text = match message {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "Push channel closed by server");
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!(error = %e, "Push channel failed");
                    break;
                }
                None => break,
            };

            let reply = match Packet::decode(&text) {
                Ok(Packet::Open(handshake)) => {
                    debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "Session opened");
                    Some(packet::CONNECT)
                }
                Ok(Packet::Ping) => Some(packet::PONG),
                Ok(Packet::Connected) => {
                    info!("Joined push namespace");
                    None
                }
                Ok(Packet::Event(frame)) => {
                    if sender.send(frame).await.is_err() {
                        debug!("Listener gone, closing push channel");
                        break;
                    }
                    None
                }
                Ok(Packet::ConnectError(reason)) => {
                    warn!(%reason, "Push namespace refused the connection");
                    break;
                }
                Ok(Packet::Close) | Ok(Packet::Disconnected) => {
                    info!("Push session ended by server");
                    break;
                }
                Ok(Packet::Pong) | Ok(Packet::Ignored) => None,
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable packet");
                    None
                }
            };

            if let Some(reply) = reply {
                if let Err(e) = socket.send(Message::Text(reply.to_string())).await {
                    warn!(error = %e, "Push channel failed");
                    break;
                }
            }
        }
        let _ = socket.close(None).await;
    });

    Ok((ChannelHandle::from_receiver(receiver), handle))
}
