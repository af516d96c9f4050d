//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that validate
//! an invoice store and sequence generator through full REST round-trips:
//! JSON → HTTP request → handler → store → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$store_factory` must produce an empty `impl InvoiceStore + 'static`,
/// `$sequence_factory` a fresh `impl SequenceGenerator + 'static`.
///
/// # Generated Tests
///
/// - `test_rest_create`: POST 201 + saved message
/// - `test_rest_list_after_create`: GET returns the body plus `_id`
/// - `test_rest_next_number`: 2 then 3 on a fresh counter
/// - `test_rest_delete`: DELETE 200, record gone
/// - `test_rest_delete_absent`: DELETE of an unknown id still 200
/// - `test_rest_malformed_body`: 500 + `error`, nothing stored
/// - `test_rest_health`: both health routes answer
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr, $sequence_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let invoices = $store_factory;
                let sequences = $sequence_factory;
                let router = storage_harness::integration::build_test_router(invoices, sequences);
                storage_harness::integration::test_server(router)
            }

            fn reference_body() -> Value {
                json!({
                    "invoiceNumber": 7,
                    "date": "2024-01-01",
                    "items": [{ "name": "A", "quantity": 2, "price": 5 }],
                    "totalAmount": 10
                })
            }

            async fn list(server: &TestServer) -> Vec<Value> {
                let response = server.get("/api/invoices").await;
                response.assert_status_ok();
                response.json::<Vec<Value>>()
            }

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server.post("/api/invoices").json(&reference_body()).await;

                response.assert_status(StatusCode::CREATED);
                response.assert_json(&json!({ "message": "Invoice saved successfully!" }));
            }

            #[tokio::test]
            async fn test_rest_list_after_create() {
                let server = make_server().await;
                server
                    .post("/api/invoices")
                    .json(&reference_body())
                    .await
                    .assert_status(StatusCode::CREATED);

                let invoices = list(&server).await;
                assert_eq!(invoices.len(), 1);

                let invoice = &invoices[0];
                let id = invoice["_id"].as_str().expect("_id should be a string");
                assert!(!id.is_empty());
                assert_eq!(invoice["invoiceNumber"], 7);
                assert_eq!(invoice["date"], "2024-01-01");
                assert_eq!(invoice["totalAmount"].as_f64(), Some(10.0));

                let items = invoice["items"].as_array().unwrap();
                assert_eq!(items.len(), 1);
                assert_eq!(items[0]["name"], "A");
                assert_eq!(items[0]["quantity"].as_f64(), Some(2.0));
                assert_eq!(items[0]["price"].as_f64(), Some(5.0));
            }

            #[tokio::test]
            async fn test_rest_next_number() {
                let server = make_server().await;

                let first = server.get("/api/invoices/nextInvoiceNumber").await;
                first.assert_status_ok();
                first.assert_json(&json!({ "invoiceNumber": 2 }));

                let second = server.get("/api/invoices/nextInvoiceNumber").await;
                second.assert_json(&json!({ "invoiceNumber": 3 }));
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                for n in [1, 2] {
                    server
                        .post("/api/invoices")
                        .json(&json!({ "invoiceNumber": n }))
                        .await
                        .assert_status(StatusCode::CREATED);
                }

                let before = list(&server).await;
                let target = before
                    .iter()
                    .find(|inv| inv["invoiceNumber"] == 1)
                    .and_then(|inv| inv["_id"].as_str())
                    .unwrap()
                    .to_string();

                let response = server.delete(&format!("/api/invoices/{}", target)).await;
                response.assert_status_ok();
                response.assert_json(&json!({ "message": "Invoice deleted successfully!" }));

                let after = list(&server).await;
                assert_eq!(after.len(), 1);
                assert_eq!(after[0]["invoiceNumber"], 2);
            }

            #[tokio::test]
            async fn test_rest_delete_absent() {
                let server = make_server().await;
                server
                    .post("/api/invoices")
                    .json(&reference_body())
                    .await
                    .assert_status(StatusCode::CREATED);
                let id = list(&server).await[0]["_id"].as_str().unwrap().to_string();

                server
                    .delete(&format!("/api/invoices/{}", id))
                    .await
                    .assert_status_ok();
                let again = server.delete(&format!("/api/invoices/{}", id)).await;

                again.assert_status_ok();
                again.assert_json(&json!({ "message": "Invoice deleted successfully!" }));
                assert!(list(&server).await.is_empty());
            }

            #[tokio::test]
            async fn test_rest_malformed_body() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .json(&json!({ "invoiceNumber": "not-a-number" }))
                    .await;

                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                let body: Value = response.json();
                assert!(!body["error"].as_str().unwrap_or_default().is_empty());
                assert!(list(&server).await.is_empty());
            }

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;

                for path in ["/health", "/healthz"] {
                    let response = server.get(path).await;
                    response.assert_status_ok();
                    let body: Value = response.json();
                    assert_eq!(body["status"], "ok");
                }
            }
        }
    };
}
