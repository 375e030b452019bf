use order_board::clients::{FetchError, HttpOrderApi, OrderApi, StaticToken};
use order_board::lifecycle::BoardConfig;
use order_board::model::{OrderId, OrderStatus};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer, token: Option<&str>) -> HttpOrderApi {
    let mut config = BoardConfig::new(server.uri());
    config.request_timeout_secs = 5;
    HttpOrderApi::from_config(&config, Arc::new(StaticToken(token.map(str::to_string)))).unwrap()
}

#[tokio::test]
async fn test_listing_sends_filters_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("status", "current"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [{
                "_id": "66f1c2",
                "Status": "current",
                "OrderBy": {
                    "_id": "u1",
                    "name": "Ravi",
                    "mobile": 9876543210u64,
                    "address": {
                        "formatted": "12 Market Road",
                        "location": {"type": "Point", "coordinates": [77.59, 12.97]}
                    }
                },
                "Product": [
                    {"ProductId": {"_id": "p1", "ProductName": "Tea", "PricePerUnit": 20.0}, "units": 3}
                ],
                "totalAmount": 60.0,
                "DeliveryBy": {"_id": "d1", "name": "Asha"}
            }],
            "pagination": {
                "currentPage": 2,
                "totalPages": 3,
                "totalOrders": 25,
                "hasNext": true,
                "hasPrev": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = api(&server, Some("secret"))
        .fetch_orders(&OrderStatus::InDelivery, 2, 10)
        .await
        .unwrap();

    assert_eq!(page.page_info.current_page, 2);
    assert!(page.page_info.has_next);
    assert_eq!(page.orders.len(), 1);

    let order = &page.orders[0];
    assert_eq!(order.id, OrderId::from("66f1c2"));
    assert_eq!(order.status, OrderStatus::InDelivery);
    assert_eq!(order.item_count(), 1);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.items[0].product_name.as_deref(), Some("Tea"));
    let customer = order.customer.as_ref().unwrap();
    assert_eq!(customer.phone.as_deref(), Some("9876543210"));
    let address = customer.address.as_ref().unwrap();
    assert_eq!(address.formatted.as_deref(), Some("12 Market Road"));
    assert_eq!(address.coordinates, Some((12.97, 77.59)));
    assert_eq!(order.delivery_person.as_ref().and_then(|d| d.name.as_deref()), Some("Asha"));
}

#[tokio::test]
async fn test_malformed_order_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [
                {"_id": "A", "Status": "prepare"},
                {"Status": "prepare"},
                {"_id": "B", "Status": "prepare"}
            ],
            "pagination": {"currentPage": 1, "totalPages": 1, "totalOrders": 3}
        })))
        .mount(&server)
        .await;

    let page = api(&server, None)
        .fetch_orders(&OrderStatus::Preparing, 1, 10)
        .await
        .unwrap();

    let ids: Vec<_> = page.orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn test_listing_without_pagination_is_a_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [
                {"_id": "A", "Status": "prepare"},
                {"_id": "B", "Status": "prepare"}
            ]
        })))
        .mount(&server)
        .await;

    let page = api(&server, None)
        .fetch_orders(&OrderStatus::Preparing, 1, 10)
        .await
        .unwrap();

    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.page_info.current_page, 1);
    assert_eq!(page.page_info.total_orders, 2);
    assert!(!page.page_info.has_next);
    assert_eq!(page.page_info.next_page(), None);
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_string("jwt expired"))
        .mount(&server)
        .await;

    let result = api(&server, Some("stale"))
        .fetch_orders(&OrderStatus::Cancelled, 1, 10)
        .await;

    assert_eq!(
        result.unwrap_err(),
        FetchError::Status {
            status: 401,
            body: "jwt expired".into()
        }
    );
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Shop not found"
        })))
        .mount(&server)
        .await;

    let result = api(&server, None)
        .fetch_orders(&OrderStatus::Preparing, 1, 10)
        .await;

    assert_eq!(result.unwrap_err(), FetchError::Rejected("Shop not found".into()));
}

#[tokio::test]
async fn test_garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = api(&server, None)
        .fetch_orders(&OrderStatus::Preparing, 1, 10)
        .await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn test_single_order_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/order/get/one/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "A", "Status": "cancel", "paymentMethod": "COD"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = api(&server, None)
        .fetch_order(&OrderId::from("A"))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.payment_method.as_deref(), Some("COD"));
}
