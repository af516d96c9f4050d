//! Route table

use super::handlers::{
    create_invoice, delete_invoice, health_check, list_invoices, next_invoice_number,
};
use super::host::ServerHost;
use axum::Router;
use axum::routing::{delete, get};

/// Build the invoice routes:
/// - POST   /api/invoices                    - Save an invoice
/// - GET    /api/invoices                    - List all invoices
/// - GET    /api/invoices/nextInvoiceNumber  - Reserve the next invoice number
/// - DELETE /api/invoices/{id}               - Delete an invoice
pub fn build_invoice_routes(host: ServerHost) -> Router {
    Router::new()
        .route("/api/invoices", get(list_invoices).post(create_invoice))
        .route("/api/invoices/nextInvoiceNumber", get(next_invoice_number))
        .route("/api/invoices/{id}", delete(delete_invoice))
        .with_state(host)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}
