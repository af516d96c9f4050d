//! Service traits for invoice storage and number sequences

use crate::core::error::StoreResult;
use crate::core::invoice::{Invoice, InvoiceId, StoredInvoice};
use async_trait::async_trait;

/// Name of the sequence that hands out invoice numbers
pub const INVOICE_NUMBER_SEQUENCE: &str = "invoiceNumber";

/// Value a counter holds before its first increment
pub const DEFAULT_SEQUENCE_START: i64 = 1;

/// Service trait for persisting invoices
///
/// Implementations store records as-is: no validation, no transformation.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Persist an invoice and return the identifier assigned to it
    async fn insert(&self, invoice: Invoice) -> StoreResult<InvoiceId>;

    /// List every stored invoice, in store-defined order
    async fn list_all(&self) -> StoreResult<Vec<StoredInvoice>>;

    /// Delete an invoice by identifier
    ///
    /// Succeeds whether or not a record was actually removed.
    async fn delete_by_id(&self, id: &InvoiceId) -> StoreResult<()>;
}

/// Service trait for named, durable counters
#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    /// Atomically fetch-and-increment the counter called `name`
    ///
    /// A missing counter is created at its initial value and incremented in the
    /// same step. Returns the post-increment value, so concurrent callers never
    /// observe the same number twice and no number is skipped.
    async fn next(&self, name: &str) -> StoreResult<i64>;
}
