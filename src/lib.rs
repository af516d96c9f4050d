//! # Invoice Ledger
//!
//! A small backend that persists invoice records and hands out sequential
//! invoice numbers over a JSON REST API.
//!
//! ## Features
//!
//! - **Invoice Store**: insert, list-all and delete-by-id, records stored as-is
//! - **Sequence Generator**: atomic fetch-and-increment per named counter,
//!   never repeating or skipping a number under concurrent callers
//! - **Pluggable Storage**: MongoDB (feature `mongodb_backend`) or in-memory
//! - **Degraded Start**: without a connection string the server still starts
//!   and every store call answers `500`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_ledger::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_invoice_store(InMemoryInvoiceStore::new())
//!     .with_sequence_generator(InMemorySequenceGenerator::new())
//!     .build()?;
//! ```

pub mod config;
pub mod core;
pub mod observability;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ErrorResponse, INVOICE_NUMBER_SEQUENCE, Invoice, InvoiceId, InvoiceStore,
        LineItem, Party, SequenceGenerator, StoreError, StoreResult, StoredInvoice,
    };

    // === Storage ===
    pub use crate::storage::{
        Backend, InMemoryInvoiceStore, InMemorySequenceGenerator, UnavailableBackend,
    };
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::{MongoBackend, MongoInvoiceStore, MongoSequenceGenerator};

    // === Config ===
    pub use crate::config::{AppConfig, StoreBackend};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
