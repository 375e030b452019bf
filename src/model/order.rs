/// Represents a customer order as shown on the board.
///
/// # Board Framework
/// This struct implements the [`BoardEntity`](crate::framework::BoardEntity) trait,
/// allowing it to live in the buckets owned by a [`BoardActor`](crate::framework::BoardActor).
///
/// Only [`Order::id`] and [`Order::status`] matter for bucket membership. Every other
/// field is payload carried through for the view layer.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque, immutable order identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an order.
///
/// The backend speaks `prepare`, `current`, `completed` and `cancel`; the descriptive
/// names (`preparing`, `in_delivery`, `cancelled`) are accepted as well. Anything else is
/// kept verbatim in [`OrderStatus::Other`] and belongs to no bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Awaiting shop action.
    Preparing,
    /// Assigned to a delivery person and out for delivery.
    InDelivery,
    Completed,
    Cancelled,
    /// A state the board does not display (e.g. a transient backend state).
    Other(String),
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prepare" | "preparing" => OrderStatus::Preparing,
            "current" | "in_delivery" | "on_delivery" => OrderStatus::InDelivery,
            "completed" => OrderStatus::Completed,
            "cancel" | "cancelled" | "canceled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw.to_string()),
        }
    }

    /// The value the backend uses for this status in queries and payloads.
    pub fn as_wire(&self) -> &str {
        match self {
            OrderStatus::Preparing => "prepare",
            OrderStatus::InDelivery => "current",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancel",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        OrderStatus::parse(&raw)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_wire().to_string()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Delivery address, normalized from the string-or-object wire shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub formatted: Option<String>,
    /// `(latitude, longitude)`.
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPerson {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub customer: Option<Customer>,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    pub delivery_charge: Option<f64>,
    pub payment_method: Option<String>,
    pub delivery_person: Option<DeliveryPerson>,
    pub delivery_time: Option<String>,
    pub created_at: Option<String>,
    pub processed_at: Option<String>,
}

impl Order {
    /// Creates an Order with an empty payload.
    ///
    /// Real orders come from [`RawOrder`](crate::model::RawOrder) normalization; this
    /// constructor exists for tests and fixtures.
    pub fn new(id: impl Into<OrderId>, status: OrderStatus) -> Self {
        Self {
            id: id.into(),
            status,
            customer: None,
            items: Vec::new(),
            total_amount: 0.0,
            delivery_charge: None,
            payment_method: None,
            delivery_person: None,
            delivery_time: None,
            created_at: None,
            processed_at: None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
