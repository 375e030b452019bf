//! Engine.IO v4 / Socket.IO v5 text packets, as spoken by the backend's push server.
//!
//! Only the subset the board needs is understood: the Engine.IO handshake and heartbeat,
//! namespace connect/disconnect, and `EVENT` packets (`42["name", data]`). Everything else
//! decodes to [`Packet::Ignored`].

use super::event::PushFrame;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Sent after the Engine.IO handshake to join the default namespace.
pub const CONNECT: &str = "40";
/// Reply to an Engine.IO ping.
pub const PONG: &str = "3";

const HANDSHAKE_PATH: &str = "socket.io/?EIO=4&transport=websocket";

/// Payload of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    /// The server accepted our namespace connect.
    Connected,
    /// The server left the namespace.
    Disconnected,
    ConnectError(String),
    Event(PushFrame),
    Ignored,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PacketError {
    #[error("empty packet")]
    Empty,

    #[error("unknown packet type {0:?}")]
    UnknownType(char),

    #[error("malformed packet: {0}")]
    Malformed(String),
}

impl Packet {
    pub fn decode(text: &str) -> Result<Packet, PacketError> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let rest = chars.as_str();
        match kind {
            '0' => serde_json::from_str(rest)
                .map(Packet::Open)
                .map_err(|e| PacketError::Malformed(e.to_string())),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '4' => decode_message(rest),
            '5' | '6' => Ok(Packet::Ignored),
            other => Err(PacketError::UnknownType(other)),
        }
    }
}

/// Decodes the Socket.IO packet carried by an Engine.IO `message`.
fn decode_message(text: &str) -> Result<Packet, PacketError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(PacketError::Empty)?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));
    match kind {
        '0' => Ok(Packet::Connected),
        '1' => Ok(Packet::Disconnected),
        '2' => decode_event(body).map(Packet::Event),
        '4' => Ok(Packet::ConnectError(connect_error_message(body))),
        '3' | '5' | '6' => Ok(Packet::Ignored),
        other => Err(PacketError::UnknownType(other)),
    }
}

/// `/orders,["x"]` becomes `["x"]`. The default namespace has no prefix.
fn strip_namespace(text: &str) -> &str {
    if text.starts_with('/') {
        match text.find(',') {
            Some(comma) => &text[comma + 1..],
            None => "",
        }
    } else {
        text
    }
}

fn strip_ack_id(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_event(body: &str) -> Result<PushFrame, PacketError> {
    let args: Vec<Value> =
        serde_json::from_str(body).map_err(|e| PacketError::Malformed(e.to_string()))?;
    let mut args = args.into_iter();
    match args.next() {
        Some(Value::String(name)) => Ok(PushFrame::new(name, args.next().unwrap_or(Value::Null))),
        Some(other) => Err(PacketError::Malformed(format!("event name is not a string: {other}"))),
        None => Err(PacketError::Malformed("event without a name".into())),
    }
}

fn connect_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => body.to_string(),
        },
        _ => body.to_string(),
    }
}

/// Turns a server base URL into its Socket.IO WebSocket endpoint.
///
/// `http` becomes `ws` and `https` becomes `wss`. The handshake path is appended unless
/// the URL already points at `/socket.io`.
pub fn socket_url(base: &str) -> String {
    let url = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    if url.contains("/socket.io") {
        url
    } else {
        format!("{}/{HANDSHAKE_PATH}", url.trim_end_matches('/'))
    }
}
