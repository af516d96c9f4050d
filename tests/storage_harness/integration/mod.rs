//! Integration test infrastructure for storage backends.
//!
//! Drives a storage backend through the full REST layer
//! (HTTP → handler → InvoiceStore / SequenceGenerator → response).
//!
//! # Architecture
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by build_test_router via ServerBuilder)
//!         ├─ POST   /api/invoices                    → create_invoice
//!         ├─ GET    /api/invoices                    → list_invoices
//!         ├─ GET    /api/invoices/nextInvoiceNumber  → next_invoice_number
//!         ├─ DELETE /api/invoices/{id}               → delete_invoice
//!         └─ GET    /health, /healthz                → health_check
//! ```

#[macro_use]
pub mod rest_tests;

use axum::Router;
use axum_test::TestServer;
use invoice_ledger::core::{InvoiceStore, SequenceGenerator};
use invoice_ledger::server::ServerBuilder;

/// Build the production router around the given backend pair.
pub fn build_test_router(
    invoices: impl InvoiceStore + 'static,
    sequences: impl SequenceGenerator + 'static,
) -> Router {
    ServerBuilder::new()
        .with_invoice_store(invoices)
        .with_sequence_generator(sequences)
        .build()
        .unwrap()
}

/// Wrap a router in an in-process test server.
pub fn test_server(router: Router) -> TestServer {
    TestServer::new(router)
}
