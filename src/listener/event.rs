//! Push frames and their decoding into board events.

use crate::model::{NormalizeError, Order, OrderId, RawOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One message from the push channel: `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl PushFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// A new order was placed.
    OrderCreated(Order),
    /// The customer cancelled an order. Only the id is carried.
    OrderCancelled(OrderId),
    /// An order changed status. Carries the full order.
    StatusUpdated(Order),
    /// A delivery person accepted the order.
    DeliveryAssigned(OrderId),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EventError {
    #[error("Payload carries no order id")]
    MissingOrderId,

    #[error("Malformed order: {0}")]
    Order(#[from] NormalizeError),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl PushEvent {
    /// Decodes a frame. `Ok(None)` means the event name is not one the board handles.
    pub fn from_frame(frame: PushFrame) -> Result<Option<PushEvent>, EventError> {
        let event = match frame.event.as_str() {
            "order-created" | "send-order" => {
                PushEvent::OrderCreated(RawOrder::normalize_value(frame.data)?)
            }
            "order-cancelled-notification" | "shop-notification" => {
                PushEvent::OrderCancelled(order_id_of(&frame.data)?)
            }
            "order-status-updated" | "order-status-update" => {
                PushEvent::StatusUpdated(RawOrder::normalize_value(frame.data)?)
            }
            "delivery-assigned" | "Assign-Delivery_boy" => {
                PushEvent::DeliveryAssigned(order_id_of(&frame.data)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Accepts `{"orderId": "..."}` or a bare id string.
fn order_id_of(data: &Value) -> Result<OrderId, EventError> {
    let id = match data {
        Value::String(s) => s.as_str(),
        Value::Object(map) => match map.get("orderId") {
            Some(Value::String(s)) => s.as_str(),
            Some(Value::Null) | None => return Err(EventError::MissingOrderId),
            Some(other) => {
                return Err(EventError::Payload(format!("orderId is not a string: {other}")))
            }
        },
        Value::Null => return Err(EventError::MissingOrderId),
        other => return Err(EventError::Payload(format!("unexpected payload: {other}"))),
    };
    if id.is_empty() {
        return Err(EventError::MissingOrderId);
    }
    Ok(OrderId::from(id))
}
