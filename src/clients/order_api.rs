//! # Order Fetch Client
//!
//! [`OrderApi`] is the seam between the board and the backend order API. It only issues
//! requests and normalizes what comes back; applying results to the board is the job of
//! [`OrderBoardClient`](crate::clients::OrderBoardClient).
//!
//! [`HttpOrderApi`] is the production implementation on top of `reqwest`. The bearer
//! token is supplied per request by a [`TokenProvider`], which is owned by whatever
//! handles login and token refresh.

use crate::lifecycle::BoardConfig;
use crate::model::{Order, OrderId, OrderPage, OrderStatus, PageInfo, RawOrder};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failures of a single fetch. Every variant carries a human-readable message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The request was rejected before reaching the network.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status (including 401/expired token).
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected envelope.
    #[error("Response parse failed: {0}")]
    Decode(String),

    /// The envelope reported `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Paginated, status-filtered access to the backend order API.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Fetches one page of orders with the given status.
    async fn fetch_orders(
        &self,
        status: &OrderStatus,
        page: u32,
        page_size: u32,
    ) -> Result<OrderPage, FetchError>;

    /// Fetches a single order by id.
    async fn fetch_order(&self, id: &OrderId) -> Result<Order, FetchError>;
}

/// Supplies the bearer token attached to every request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

pub(crate) fn validate_request(status: &OrderStatus, page: u32, page_size: u32) -> Result<(), FetchError> {
    if let OrderStatus::Other(raw) = status {
        return Err(FetchError::InvalidRequest(format!(
            "status {raw:?} cannot be listed"
        )));
    }
    if page == 0 {
        return Err(FetchError::InvalidRequest("page must be at least 1".into()));
    }
    if page_size == 0 {
        return Err(FetchError::InvalidRequest("page size must be at least 1".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<serde_json::Value>,
    #[serde(default)]
    pagination: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// [`OrderApi`] over HTTP.
#[derive(Clone)]
pub struct HttpOrderApi {
    http: reqwest::Client,
    base_url: String,
    orders_path: String,
    order_path: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpOrderApi {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            orders_path: "/orders".to_string(),
            order_path: "/order/get/one".to_string(),
            tokens,
        }
    }

    pub fn from_config(config: &BoardConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            ..Self::new(config.api_url.clone(), tokens)
        }
        .with_paths(config.orders_path.clone(), config.order_path.clone()))
    }

    /// Overrides the listing path and the single-order path prefix.
    pub fn with_paths(mut self, orders_path: impl Into<String>, order_path: impl Into<String>) -> Self {
        self.orders_path = orders_path.into();
        self.order_path = order_path.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let mut request = self.http.get(url).query(query);
        if let Some(token) = self.tokens.token().await {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    #[instrument(skip(self, status), fields(status = %status))]
    async fn fetch_orders(
        &self,
        status: &OrderStatus,
        page: u32,
        page_size: u32,
    ) -> Result<OrderPage, FetchError> {
        validate_request(status, page, page_size)?;

        let url = format!("{}{}", self.base_url, self.orders_path);
        let query = [
            ("status", status.as_wire().to_string()),
            ("page", page.to_string()),
            ("limit", page_size.to_string()),
        ];
        debug!(%url, "Sending request");
        let body = self.get_text(&url, &query).await?;

        let envelope: ListEnvelope =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(FetchError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "order listing was not successful".to_string()),
            ));
        }

        let mut orders = Vec::with_capacity(envelope.orders.len());
        for value in envelope.orders {
            match RawOrder::normalize_value(value) {
                Ok(order) => orders.push(order),
                Err(e) => warn!(error = %e, "Skipping malformed order in page"),
            }
        }
        let page_info = match envelope.pagination.filter(PageInfo::is_loaded) {
            Some(info) => info,
            None => {
                debug!(page, "Listing carries no pagination, treating it as the only page");
                PageInfo::single(page, orders.len())
            }
        };
        debug!(count = orders.len(), page = page_info.current_page, "Page received");
        Ok(OrderPage::new(orders, page_info))
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    async fn fetch_order(&self, id: &OrderId) -> Result<Order, FetchError> {
        if id.as_str().is_empty() {
            return Err(FetchError::InvalidRequest("order id is empty".into()));
        }
        let url = format!("{}{}/{}", self.base_url, self.order_path, id);
        debug!(%url, "Sending request");
        let body = self.get_text(&url, &[]).await?;

        let envelope: DetailEnvelope =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(FetchError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| format!("order {id} was not returned")),
            ));
        }
        let data = envelope
            .data
            .ok_or_else(|| FetchError::Decode("response has no order".into()))?;
        RawOrder::normalize_value(data).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
