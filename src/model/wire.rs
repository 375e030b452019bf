//! Backend wire shapes and their normalization into [`Order`].
//!
//! The backend is loose about payload shapes: an address can be a plain string or an
//! object, a phone number can be a string, a number or an object, and populated
//! references can arrive as bare ids. Every order coming off the network (fetch or push)
//! goes through [`RawOrder`] and `Order::try_from` exactly once, so nothing past this
//! module branches on payload shape.

use super::order::{Address, Customer, DeliveryPerson, LineItem, Order, OrderId, OrderStatus};
use serde::Deserialize;
use thiserror::Error;

/// Reasons a wire order cannot become an [`Order`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizeError {
    #[error("order payload has no identifier")]
    MissingId,

    #[error("order {0} has no status")]
    MissingStatus(String),

    #[error("order payload is not an object: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOrder {
    #[serde(rename = "_id", default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "status", default)]
    pub status_lower: Option<String>,
    #[serde(rename = "OrderBy", alias = "orderBy", default)]
    pub order_by: Option<RawCustomerRef>,
    #[serde(rename = "Product", alias = "products", default)]
    pub products: Option<Vec<RawLineItem>>,
    #[serde(rename = "totalAmount", default)]
    pub total_amount: Option<f64>,
    #[serde(rename = "DeliveryCharge", alias = "deliveryCharge", default)]
    pub delivery_charge: Option<f64>,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "DeliveryBy", alias = "deliveryBy", default)]
    pub delivery_by: Option<RawPersonRef>,
    #[serde(rename = "DeliveryTime", alias = "deliveryTime", default)]
    pub delivery_time: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "processedAt", alias = "updatedAt", default)]
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCustomerRef {
    Id(String),
    Populated(RawCustomer),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCustomer {
    #[serde(rename = "_id", default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "phone", default)]
    pub mobile: Option<RawPhone>,
    #[serde(default)]
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPhone {
    Text(String),
    Number(u64),
    Object {
        #[serde(default)]
        number: Option<String>,
        #[serde(default)]
        mobile: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAddress {
    Text(String),
    Structured {
        #[serde(default)]
        formatted: Option<String>,
        #[serde(default)]
        location: Option<RawLocation>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    Text(String),
    /// GeoJSON point, `coordinates` is `[longitude, latitude]`.
    Point {
        #[serde(default)]
        coordinates: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLineItem {
    #[serde(rename = "ProductId", alias = "productId", default)]
    pub product: Option<RawProductRef>,
    #[serde(alias = "quantity", default)]
    pub units: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawProductRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", default)]
        object_id: Option<String>,
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "ProductName", alias = "name", default)]
        name: Option<String>,
        #[serde(rename = "PricePerUnit", alias = "price", default)]
        price: Option<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPersonRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", default)]
        object_id: Option<String>,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Prefers the backend's `_id` over a plain `id`. Blank values count as missing.
fn either_id(object_id: Option<String>, id: Option<String>) -> Option<String> {
    object_id
        .filter(|s| !s.trim().is_empty())
        .or(id)
        .filter(|s| !s.trim().is_empty())
}

impl RawOrder {
    /// Decodes and normalizes a JSON value in one step.
    pub fn normalize_value(value: serde_json::Value) -> Result<Order, NormalizeError> {
        let raw: RawOrder = serde_json::from_value(value)
            .map_err(|e| NormalizeError::Malformed(e.to_string()))?;
        Order::try_from(raw)
    }
}

impl TryFrom<RawOrder> for Order {
    type Error = NormalizeError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        let id = either_id(raw.object_id, raw.id).ok_or(NormalizeError::MissingId)?;
        let status = raw
            .status
            .filter(|s| !s.trim().is_empty())
            .or(raw.status_lower)
            .filter(|s| !s.trim().is_empty())
            .map(|s| OrderStatus::parse(&s))
            .ok_or_else(|| NormalizeError::MissingStatus(id.clone()))?;

        Ok(Order {
            id: OrderId(id),
            status,
            customer: raw.order_by.map(Customer::from),
            items: raw
                .products
                .unwrap_or_default()
                .into_iter()
                .map(LineItem::from)
                .collect(),
            total_amount: raw.total_amount.unwrap_or_default(),
            delivery_charge: raw.delivery_charge,
            payment_method: raw.payment_method,
            delivery_person: raw.delivery_by.map(DeliveryPerson::from),
            delivery_time: raw.delivery_time,
            created_at: raw.created_at,
            processed_at: raw.processed_at,
        })
    }
}

impl From<RawCustomerRef> for Customer {
    fn from(raw: RawCustomerRef) -> Self {
        match raw {
            RawCustomerRef::Id(id) => Customer {
                id: Some(id),
                ..Customer::default()
            },
            RawCustomerRef::Populated(c) => Customer {
                id: either_id(c.object_id, c.id),
                name: c.name,
                phone: c.mobile.and_then(RawPhone::into_text),
                address: c.address.map(Address::from),
            },
        }
    }
}

impl RawPhone {
    fn into_text(self) -> Option<String> {
        match self {
            RawPhone::Text(s) => Some(s),
            RawPhone::Number(n) => Some(n.to_string()),
            RawPhone::Object { number, mobile } => number.or(mobile),
        }
    }
}

impl From<RawAddress> for Address {
    fn from(raw: RawAddress) -> Self {
        match raw {
            RawAddress::Text(text) => Address {
                formatted: Some(text),
                coordinates: None,
            },
            RawAddress::Structured {
                formatted,
                location,
            } => match location {
                Some(RawLocation::Text(text)) => Address {
                    formatted: formatted.or(Some(text)),
                    coordinates: None,
                },
                Some(RawLocation::Point { coordinates }) => Address {
                    formatted,
                    coordinates: match coordinates.as_slice() {
                        [lng, lat, ..] => Some((*lat, *lng)),
                        _ => None,
                    },
                },
                None => Address {
                    formatted,
                    coordinates: None,
                },
            },
        }
    }
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        let quantity = raw.units.unwrap_or_default();
        match raw.product {
            Some(RawProductRef::Id(id)) => LineItem {
                product_id: id,
                quantity,
                ..LineItem::default()
            },
            Some(RawProductRef::Populated {
                object_id,
                id,
                name,
                price,
            }) => LineItem {
                product_id: either_id(object_id, id).unwrap_or_default(),
                product_name: name,
                unit_price: price,
                quantity,
            },
            None => LineItem {
                quantity,
                ..LineItem::default()
            },
        }
    }
}

impl From<RawPersonRef> for DeliveryPerson {
    fn from(raw: RawPersonRef) -> Self {
        match raw {
            RawPersonRef::Id(id) => DeliveryPerson {
                id: Some(id),
                name: None,
            },
            RawPersonRef::Populated {
                object_id,
                id,
                name,
            } => DeliveryPerson {
                id: either_id(object_id, id),
                name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_populated_order() {
        let order = RawOrder::normalize_value(json!({
            "_id": "66a1",
            "Status": "prepare",
            "OrderBy": {
                "_id": "u1",
                "name": "Asha",
                "mobile": 9876543210u64,
                "address": {
                    "formatted": "12 MG Road",
                    "location": { "type": "Point", "coordinates": [77.59, 12.97] }
                }
            },
            "Product": [
                { "ProductId": { "_id": "p1", "ProductName": "Milk", "PricePerUnit": 30.0 }, "units": 2 },
                { "ProductId": "p2", "units": 1 }
            ],
            "totalAmount": 85.0,
            "DeliveryBy": { "_id": "d1", "name": "Ravi" },
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(order.id, OrderId::from("66a1"));
        assert_eq!(order.status, OrderStatus::Preparing);
        let customer = order.customer.unwrap();
        assert_eq!(customer.phone.as_deref(), Some("9876543210"));
        let address = customer.address.unwrap();
        assert_eq!(address.formatted.as_deref(), Some("12 MG Road"));
        assert_eq!(address.coordinates, Some((12.97, 77.59)));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_name.as_deref(), Some("Milk"));
        assert_eq!(order.items[1].product_id, "p2");
        assert_eq!(order.delivery_person.unwrap().name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_address_and_phone_shapes_collapse() {
        let text = RawOrder::normalize_value(json!({
            "_id": "a", "Status": "current",
            "OrderBy": { "name": "X", "address": "Plain street", "mobile": { "number": "111" } }
        }))
        .unwrap();
        let customer = text.customer.unwrap();
        assert_eq!(customer.address.unwrap().formatted.as_deref(), Some("Plain street"));
        assert_eq!(customer.phone.as_deref(), Some("111"));

        let location_only = RawOrder::normalize_value(json!({
            "_id": "b", "status": "completed",
            "OrderBy": { "address": { "location": "Near the lake" } }
        }))
        .unwrap();
        assert_eq!(
            location_only.customer.unwrap().address.unwrap().formatted.as_deref(),
            Some("Near the lake")
        );
    }

    #[test]
    fn test_payload_with_both_id_keys_prefers_underscore_id() {
        let order = RawOrder::normalize_value(json!({
            "_id": "66b2",
            "id": "legacy-7",
            "Status": "cancel",
            "status": "prepare",
            "OrderBy": { "_id": "u1", "id": "u-legacy", "name": "Asha" },
            "Product": [
                { "ProductId": { "_id": "p1", "id": "p-legacy", "ProductName": "Milk" }, "units": 1 }
            ],
            "DeliveryBy": { "_id": "d1", "id": "d-legacy", "name": "Ravi" }
        }))
        .unwrap();

        assert_eq!(order.id, OrderId::from("66b2"));
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.customer.unwrap().id.as_deref(), Some("u1"));
        assert_eq!(order.items[0].product_id, "p1");
        assert_eq!(order.items[0].product_name.as_deref(), Some("Milk"));
        assert_eq!(order.delivery_person.unwrap().id.as_deref(), Some("d1"));

        let plain = RawOrder::normalize_value(json!({ "id": "7", "status": "current" })).unwrap();
        assert_eq!(plain.id, OrderId::from("7"));
        assert_eq!(plain.status, OrderStatus::InDelivery);
    }

    #[test]
    fn test_missing_identifier_or_status_is_rejected() {
        assert_eq!(
            RawOrder::normalize_value(json!({ "Status": "prepare" })),
            Err(NormalizeError::MissingId)
        );
        assert_eq!(
            RawOrder::normalize_value(json!({ "_id": "", "Status": "prepare" })),
            Err(NormalizeError::MissingId)
        );
        assert_eq!(
            RawOrder::normalize_value(json!({ "_id": "z" })),
            Err(NormalizeError::MissingStatus("z".to_string()))
        );
        assert!(matches!(
            RawOrder::normalize_value(json!("not an order")),
            Err(NormalizeError::Malformed(_))
        ));
    }
}
