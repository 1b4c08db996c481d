//! HTTP catalog client against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use serde_json::json;
use std::time::Duration;
use storefront_catalog::{
    CatalogClient, CatalogConfig, CatalogError, HttpCatalogClient, ProductId, SearchQuery,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product_json(id: u64, title: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "category": "smartphones",
        "price": price,
        "discountPercentage": 5.0,
        "rating": 4.5,
        "stock": 12,
        "tags": ["smartphones"],
        "thumbnail": format!("https://cdn.example.com/{id}/thumb.png"),
        "images": []
    })
}

fn client_for(server: &MockServer) -> HttpCatalogClient {
    HttpCatalogClient::new(CatalogConfig::new(server.uri())).expect("valid config")
}

#[tokio::test]
async fn test_fetch_page_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "0"))
        .and(header("version", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "products": [
                    product_json(1, "iPhone 9", 549.0),
                    product_json(2, "iPhone X", 899.0),
                ],
                "total": 25,
                "skip": 0,
                "limit": 10
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .fetch_page(SearchQuery::first_page("phone"))
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.skip, 0);
    assert_eq!(page.limit, 10);
    let ids: Vec<_> = page.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
}

#[tokio::test]
async fn test_empty_search_sends_empty_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", ""))
        .and(query_param("skip", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "products": [], "total": 20, "skip": 20, "limit": 10 }
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search(&SearchQuery::new("", 20))
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_success_false_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Search is temporarily disabled"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .search(&SearchQuery::first_page("phone"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        CatalogError::Api {
            status: 200,
            message: "Search is temporarily disabled".to_string(),
        }
    );
    assert_eq!(error.normalize().message, "Search is temporarily disabled");
}

#[tokio::test]
async fn test_error_description_used_when_message_not_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": { "code": "E_AUTH" },
            "error_description": "Session expired"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .search(&SearchQuery::first_page(""))
        .await
        .unwrap_err();

    assert_eq!(error.message(), "Session expired");
}

#[tokio::test]
async fn test_non_2xx_is_api_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Maintenance window" })),
        )
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .search(&SearchQuery::first_page("phone"))
        .await
        .unwrap_err()
        .normalize();

    assert_eq!(payload.status_code, 503);
    assert_eq!(payload.message, "Maintenance window");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .search(&SearchQuery::first_page("phone"))
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::Decode { status: 200, .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 9 of the loopback interface
    let client = HttpCatalogClient::new(CatalogConfig::new("http://127.0.0.1:9")).unwrap();

    let error = client
        .search(&SearchQuery::first_page("phone"))
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::Network { .. }));
    assert_eq!(error.normalize().status_code, 500);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({
                    "success": true,
                    "data": { "products": [], "total": 0, "skip": 0, "limit": 10 },
                })),
        )
        .mount(&server)
        .await;

    let config =
        CatalogConfig::new(server.uri()).with_request_timeout(Duration::from_millis(50));
    let client = HttpCatalogClient::new(config).unwrap();

    let error = client
        .search(&SearchQuery::first_page("phone"))
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::Network { timed_out: true, .. }));
}
