//! Payment link and email draft tests

use assert_matches::assert_matches;
use partytrailer::backend::booqable::{BooqableError, Trace};
use partytrailer::shared::booking::{PaylinkEmailRequest, PaymentLinkRequest};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{booqable_for, empty_orders, TEST_BUSINESS};

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_orders()))
        .mount(server)
        .await;
}

fn link_request(order_id: &str) -> PaymentLinkRequest {
    PaymentLinkRequest {
        order_id: order_id.to_string(),
    }
}

#[tokio::test]
async fn test_link_found_by_deep_scan_on_creation() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders/o-1/invoices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": "inv-1",
                "attributes": { "status": "open", "links": [{ "rel": "pay", "href": "https://pay.example.com/o-1" }] }
            }
        })))
        .mount(&server)
        .await;

    let response = booqable_for(&server).payment_link(&link_request("o-1")).await.unwrap();

    assert!(response.ok);
    assert!(response.invoice_created);
    assert_eq!(response.payment_link, "https://pay.example.com/o-1");
    assert_eq!(response.tried.create.len(), 1);
    assert!(response.tried.fetch.is_empty());
}

#[tokio::test]
async fn test_link_read_back_after_linkless_creation() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders/o-2/invoices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "invoice": { "id": "inv-2" } })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("order_id", "o-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invoices": [{ "id": "inv-2", "public_url": "https://pay.example.com/inv-2" }]
        })))
        .mount(&server)
        .await;

    let response = booqable_for(&server).payment_link(&link_request("o-2")).await.unwrap();

    assert!(response.invoice_created);
    assert_eq!(response.created, Some(json!({ "invoice": { "id": "inv-2" } })));
    assert_eq!(response.payment_link, "https://pay.example.com/inv-2");
    // Three nested invoice paths come before the filtered list
    assert_eq!(response.tried.fetch.len(), 4);
}

#[tokio::test]
async fn test_created_without_link_is_reported() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "invoice": { "id": "inv-3" } })))
        .mount(&server)
        .await;

    let result = booqable_for(&server).payment_link(&link_request("o-3")).await;
    assert_matches!(
        result,
        Err(BooqableError::Rejected { ref message, trace: Trace::Split(ref tried) })
            if message == "Invoice created but no payment link could be found."
                && tried.create.len() == 6
                && tried.fetch.len() == 6
    );
}

#[tokio::test]
async fn test_nothing_accepted() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    let result = booqable_for(&server).payment_link(&link_request("o-4")).await;
    assert_matches!(
        result,
        Err(BooqableError::Rejected { ref message, .. }) if message == "No invoice/checkout endpoint accepted."
    );
}

#[tokio::test]
async fn test_missing_order_id_is_invalid() {
    let server = MockServer::start().await;
    let result = booqable_for(&server).payment_link(&link_request("")).await;
    assert_matches!(result, Err(BooqableError::Invalid(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_paylink_email_reads_order_summary() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders/o-5/invoices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "payment_url": "https://pay.example.com/o-5" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/o-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": { "id": "o-5", "number": 1005, "grand_total_with_tax_in_cents": 4999, "customer": { "name": "Jo" } }
        })))
        .mount(&server)
        .await;

    let response = booqable_for(&server)
        .paylink_email(
            &PaylinkEmailRequest {
                order_id: "o-5".to_string(),
                customer_name: None,
            },
            TEST_BUSINESS,
        )
        .await
        .unwrap();

    assert!(response.ok);
    assert!(response.created);
    assert_eq!(response.payment_link, "https://pay.example.com/o-5");
    assert_eq!(response.email.subject, "Party Trailer - Invoice & Payment Link (#1005)");
    assert!(response.email.body.starts_with("Hi Jo,\n"));
    crate::assert_contains!(response.email.body, "Invoice total: $49.99");
    assert!(response.email.body.ends_with("-- The Party Trailer"));
}

#[tokio::test]
async fn test_paylink_email_without_link_fails() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    let result = booqable_for(&server)
        .paylink_email(
            &PaylinkEmailRequest {
                order_id: "o-6".to_string(),
                customer_name: Some("Jo".to_string()),
            },
            TEST_BUSINESS,
        )
        .await;
    assert_matches!(
        result,
        Err(BooqableError::Rejected { ref message, .. }) if message == "Could not obtain payment link."
    );
}
