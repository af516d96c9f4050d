//! Backend used when no store could be configured
//!
//! The process still starts and serves HTTP; every store-dependent call fails
//! with `StoreError::Unavailable` carrying the reason.

use crate::core::{
    Invoice, InvoiceId, InvoiceStore, SequenceGenerator, StoreError, StoreResult, StoredInvoice,
};
use async_trait::async_trait;
use std::sync::Arc;

const BACKEND: &str = "unconfigured";

#[derive(Clone, Debug)]
pub struct UnavailableBackend {
    reason: Arc<str>,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Arc::from(reason.into()),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn error(&self) -> StoreError {
        StoreError::unavailable(BACKEND, self.reason.to_string())
    }
}

#[async_trait]
impl InvoiceStore for UnavailableBackend {
    async fn insert(&self, _invoice: Invoice) -> StoreResult<InvoiceId> {
        Err(self.error())
    }

    async fn list_all(&self) -> StoreResult<Vec<StoredInvoice>> {
        Err(self.error())
    }

    async fn delete_by_id(&self, _id: &InvoiceId) -> StoreResult<()> {
        Err(self.error())
    }
}

#[async_trait]
impl SequenceGenerator for UnavailableBackend {
    async fn next(&self, _name: &str) -> StoreResult<i64> {
        Err(self.error())
    }
}
