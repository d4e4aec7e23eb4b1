//! `SanityClient` tests against a mock query API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use foxsports_core::ProductStatus;
use foxsports_integration_tests::TestApp;
use foxsports_storefront::cms::{CmsError, ContentSource, SanityClient};
use foxsports_storefront::config::CmsConfig;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/v2024-10-01/data/query/production";

fn cms_config(server: &MockServer, token: Option<&str>) -> CmsConfig {
    CmsConfig {
        project_id: "abc123".to_string(),
        dataset: "production".to_string(),
        api_version: "2024-10-01".to_string(),
        read_token: token.map(|t| SecretString::from(t.to_string())),
        use_cdn: true,
        api_host: Some(server.uri()),
    }
}

fn client(server: &MockServer) -> SanityClient {
    SanityClient::new(&cms_config(server, None), Duration::from_secs(60))
}

fn product_doc(slug: &str, title: &str) -> serde_json::Value {
    json!({
        "_id": format!("product-{slug}"),
        "_createdAt": "2025-09-01T00:00:00Z",
        "slug": slug,
        "title": title,
        "price": 4500,
        "currency": "DOP",
        "status": "available",
        "gallery": [
            { "_key": "k1", "alt": "Frente", "asset": { "_ref": "image-abc123-800x1000-jpg" } }
        ]
    })
}

#[tokio::test]
async fn test_all_products_sends_query_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("perspective", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                product_doc("luka-prizm", "Luka Prizm"),
                { "title": "Sin id" },
                {
                    "_id": "product-mistyped",
                    "slug": "mistyped",
                    "title": "Mistyped",
                    "price": "not a number",
                    "tags": ["nba", null]
                },
                product_doc("wemby-select", "Wemby Select")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server).all_products().await.unwrap();

    assert_eq!(products.len(), 3);
    let mistyped = products.iter().find(|p| p.slug == "mistyped").unwrap();
    assert!(mistyped.price.abs() < f64::EPSILON);
    assert_eq!(mistyped.tags, vec!["nba".to_string()]);
    let first = products.first().unwrap();
    assert_eq!(first.slug, "luka-prizm");
    assert_eq!(first.status, ProductStatus::Available);
    assert_eq!(
        first.cover_url(),
        "https://cdn.sanity.io/images/abc123/production/abc123-800x1000.jpg?auto=format&fit=max"
    );
}

#[tokio::test]
async fn test_results_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.all_products().await.unwrap();
    client.all_products().await.unwrap();
}

#[tokio::test]
async fn test_product_by_slug_sends_json_encoded_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"luka-prizm\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": product_doc("luka-prizm", "Luka Prizm") })),
        )
        .mount(&server)
        .await;

    let product = client(&server).product_by_slug("luka-prizm").await.unwrap();
    assert_eq!(product.title, "Luka Prizm");
}

#[tokio::test]
async fn test_product_by_slug_tolerates_mistyped_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "_id": "product-luka-prizm",
                "slug": "luka-prizm",
                "title": "Luka Prizm",
                "price": "500",
                "year": 2018.0,
                "tags": ["nba", null]
            }
        })))
        .mount(&server)
        .await;

    let mut app = TestApp::with_content(ContentSource::Sanity(client(&server))).await;
    let response = app.get("/producto/luka-prizm").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Luka Prizm"));
}

#[tokio::test]
async fn test_product_by_slug_null_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    let result = client(&server).product_by_slug("no-existe").await;
    assert!(matches!(result, Err(CmsError::NotFound(slug)) if slug == "no-existe"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client(&server).all_products().await;
    assert!(matches!(result, Err(CmsError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer sk-read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SanityClient::new(&cms_config(&server, Some("sk-read")), Duration::from_secs(60));
    client.testimonials().await.unwrap();
}

#[tokio::test]
async fn test_cms_outage_maps_to_bad_gateway_except_home() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = TestApp::with_content(ContentSource::Sanity(client(&server))).await;

    let catalog = app.get("/catalogo").await;
    assert_eq!(catalog.status, StatusCode::BAD_GATEWAY);
    assert!(!catalog.body.contains("503"));

    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
}
