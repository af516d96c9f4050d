//! Core module containing the invoice model, service traits and error types

pub mod error;
pub mod invoice;
pub mod service;

pub use error::{ApiError, ConfigError, ErrorResponse, StoreError, StoreResult};
pub use invoice::{Invoice, InvoiceId, LineItem, Party, StoredInvoice};
pub use service::{
    DEFAULT_SEQUENCE_START, INVOICE_NUMBER_SEQUENCE, InvoiceStore, SequenceGenerator,
};
