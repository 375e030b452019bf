//! # Mock Order API
//!
//! A scripted [`OrderApi`] for exercising the fetch path without a server.
//!
//! Expectations are matched by `(status, page)` rather than strictly in order, since
//! `load_all` fetches the three buckets concurrently. An unexpected call panics.
//!
//! ```ignore
//! let api = MockOrderApi::new();
//! api.expect_fetch(OrderStatus::Preparing, 1).return_ok(page);
//!
//! // Hold a response back until the test releases it.
//! let release = api.expect_fetch(OrderStatus::Cancelled, 1).return_ok_gated(other_page);
//! // ...
//! release.send(()).unwrap();
//!
//! api.verify(); // Ensures all expectations were met
//! ```

use crate::clients::order_api::{validate_request, FetchError, OrderApi};
use crate::model::{Order, OrderId, OrderPage, OrderStatus};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchOrders {
        status: OrderStatus,
        page: u32,
        page_size: u32,
    },
    FetchOrder(OrderId),
}

enum Expectation {
    Fetch {
        status: OrderStatus,
        page: u32,
        gate: Option<oneshot::Receiver<()>>,
        response: Result<OrderPage, FetchError>,
    },
    FetchOrder {
        id: OrderId,
        response: Result<Order, FetchError>,
    },
}

#[derive(Clone, Default)]
pub struct MockOrderApi {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl MockOrderApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a listing request for `status` at `page`.
    pub fn expect_fetch(&self, status: OrderStatus, page: u32) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            status,
            page,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a single-order request.
    pub fn expect_fetch_order(&self, id: impl Into<OrderId>) -> FetchOrderExpectationBuilder {
        FetchOrderExpectationBuilder {
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl OrderApi for MockOrderApi {
    async fn fetch_orders(
        &self,
        status: &OrderStatus,
        page: u32,
        page_size: u32,
    ) -> Result<OrderPage, FetchError> {
        validate_request(status, page, page_size)?;
        self.record(ApiCall::FetchOrders {
            status: status.clone(),
            page,
            page_size,
        });

        let expectation = {
            let mut exps = self.expectations.lock().unwrap();
            let index = exps.iter().position(|e| {
                matches!(e, Expectation::Fetch { status: s, page: p, .. } if s == status && *p == page)
            });
            index.and_then(|i| exps.remove(i))
        };

        match expectation {
            Some(Expectation::Fetch { gate, response, .. }) => {
                if let Some(gate) = gate {
                    // A dropped sender releases the response as well.
                    let _ = gate.await;
                }
                response
            }
            _ => panic!("Unexpected fetch_orders(status={status}, page={page})"),
        }
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Order, FetchError> {
        self.record(ApiCall::FetchOrder(id.clone()));

        let expectation = {
            let mut exps = self.expectations.lock().unwrap();
            let index = exps
                .iter()
                .position(|e| matches!(e, Expectation::FetchOrder { id: i, .. } if i == id));
            index.and_then(|i| exps.remove(i))
        };

        match expectation {
            Some(Expectation::FetchOrder { response, .. }) => response,
            _ => panic!("Unexpected fetch_order({id})"),
        }
    }
}

/// Builder for listing expectations.
pub struct FetchExpectationBuilder {
    status: OrderStatus,
    page: u32,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl FetchExpectationBuilder {
    pub fn return_ok(self, page: OrderPage) {
        self.push(None, Ok(page));
    }

    pub fn return_err(self, error: FetchError) {
        self.push(None, Err(error));
    }

    /// Like [`return_ok`](Self::return_ok), but the call only completes once the returned
    /// sender fires (or is dropped).
    pub fn return_ok_gated(self, page: OrderPage) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.push(Some(gate), Ok(page));
        release
    }

    pub fn return_err_gated(self, error: FetchError) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.push(Some(gate), Err(error));
        release
    }

    fn push(self, gate: Option<oneshot::Receiver<()>>, response: Result<OrderPage, FetchError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Fetch {
            status: self.status,
            page: self.page,
            gate,
            response,
        });
    }
}

/// Builder for single-order expectations.
pub struct FetchOrderExpectationBuilder {
    id: OrderId,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl FetchOrderExpectationBuilder {
    pub fn return_ok(self, order: Order) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::FetchOrder {
            id: self.id,
            response: Ok(order),
        });
    }

    pub fn return_err(self, error: FetchError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::FetchOrder {
            id: self.id,
            response: Err(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageInfo;

    #[tokio::test]
    async fn test_mock_matches_by_status_and_page() {
        let api = MockOrderApi::new();
        api.expect_fetch(OrderStatus::Cancelled, 1)
            .return_ok(OrderPage::new(vec![], PageInfo::default()));
        api.expect_fetch(OrderStatus::Preparing, 1)
            .return_err(FetchError::Transport("offline".into()));

        let live = api.fetch_orders(&OrderStatus::Preparing, 1, 10).await;
        assert_eq!(live, Err(FetchError::Transport("offline".into())));
        assert!(api.fetch_orders(&OrderStatus::Cancelled, 1, 10).await.is_ok());

        api.verify();
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_gated_response_waits_for_release() {
        let api = MockOrderApi::new();
        let release = api
            .expect_fetch(OrderStatus::Preparing, 1)
            .return_ok_gated(OrderPage::new(vec![], PageInfo::default()));

        let task = {
            let api = api.clone();
            tokio::spawn(async move { api.fetch_orders(&OrderStatus::Preparing, 1, 10).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        release.send(()).unwrap();
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_order_returns_scripted_order() {
        let api = MockOrderApi::new();
        api.expect_fetch_order("A")
            .return_ok(Order::new("A", OrderStatus::Completed));

        let order = api.fetch_order(&OrderId::from("A")).await.unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(api.calls(), vec![ApiCall::FetchOrder(OrderId::from("A"))]);
    }
}
