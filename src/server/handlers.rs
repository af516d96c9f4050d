//! Invoice HTTP handlers
//!
//! Every failure is returned as an [`ApiError`], which renders as
//! `500 { "error": ... }` and logs the underlying error kind.

use super::host::ServerHost;
use crate::core::{ApiError, Invoice, InvoiceId, StoredInvoice};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const INVOICE_SAVED: &str = "Invoice saved successfully!";
pub const INVOICE_DELETED: &str = "Invoice deleted successfully!";

/// `{ "message": ... }` success body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "invoiceNumber": n }` body of the next-number endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextInvoiceNumber {
    pub invoice_number: i64,
}

/// POST /api/invoices
///
/// Body rejections (malformed JSON, wrong field types) go through the same
/// `500 { error }` path as store failures.
pub async fn create_invoice(
    State(host): State<ServerHost>,
    payload: Result<Json<Invoice>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(invoice) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    tracing::debug!(?invoice, "Received invoice");

    let id = host.invoices.insert(invoice).await?;
    tracing::info!(%id, "Invoice saved");

    Ok((StatusCode::CREATED, Json(MessageResponse::new(INVOICE_SAVED))))
}

/// GET /api/invoices/nextInvoiceNumber
pub async fn next_invoice_number(
    State(host): State<ServerHost>,
) -> Result<Json<NextInvoiceNumber>, ApiError> {
    let invoice_number = host
        .sequences
        .next(&host.sequence_name)
        .await
        .map_err(ApiError::NextNumber)?;

    Ok(Json(NextInvoiceNumber { invoice_number }))
}

/// GET /api/invoices
pub async fn list_invoices(
    State(host): State<ServerHost>,
) -> Result<Json<Vec<StoredInvoice>>, ApiError> {
    let invoices = host.invoices.list_all().await?;
    Ok(Json(invoices))
}

/// DELETE /api/invoices/{id}
///
/// Reports success whether or not a record was removed.
pub async fn delete_invoice(
    State(host): State<ServerHost>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = InvoiceId::from(id);
    host.invoices.delete_by_id(&id).await?;
    tracing::info!(%id, "Invoice deleted");

    Ok(Json(MessageResponse::new(INVOICE_DELETED)))
}

/// GET /health, /healthz
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-ledger"
    }))
}
