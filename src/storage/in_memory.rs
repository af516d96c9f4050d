//! In-memory implementations of InvoiceStore and SequenceGenerator for testing and development

use crate::core::{
    DEFAULT_SEQUENCE_START, Invoice, InvoiceId, InvoiceStore, SequenceGenerator, StoreError,
    StoreResult, StoredInvoice,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "memory";

/// In-memory invoice store
///
/// Identifiers are UUID v4 strings. `list_all` returns records in insertion
/// order. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<Vec<StoredInvoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: Invoice) -> StoreResult<InvoiceId> {
        let mut invoices = self.invoices.write().map_err(|e| {
            StoreError::persistence(BACKEND, format!("Failed to acquire write lock: {}", e))
        })?;

        let id = InvoiceId::new(Uuid::new_v4().to_string());
        invoices.push(StoredInvoice::new(id.clone(), invoice));

        Ok(id)
    }

    async fn list_all(&self) -> StoreResult<Vec<StoredInvoice>> {
        let invoices = self.invoices.read().map_err(|e| {
            StoreError::persistence(BACKEND, format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(invoices.clone())
    }

    async fn delete_by_id(&self, id: &InvoiceId) -> StoreResult<()> {
        if Uuid::parse_str(id.as_str()).is_err() {
            return Err(StoreError::persistence(
                BACKEND,
                format!("Cast to UUID failed for value \"{}\"", id),
            ));
        }

        let mut invoices = self.invoices.write().map_err(|e| {
            StoreError::persistence(BACKEND, format!("Failed to acquire write lock: {}", e))
        })?;

        invoices.retain(|stored| &stored.id != id);

        Ok(())
    }
}

/// In-memory named counters
///
/// The whole read-modify-write of `next` happens under one write lock, which
/// is what makes it atomic for concurrent callers.
#[derive(Clone)]
pub struct InMemorySequenceGenerator {
    counters: Arc<RwLock<HashMap<String, i64>>>,
    initial_value: i64,
}

impl InMemorySequenceGenerator {
    pub fn new() -> Self {
        Self::with_initial_value(DEFAULT_SEQUENCE_START)
    }

    /// Counters created by this generator start at `initial_value`
    pub fn with_initial_value(initial_value: i64) -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
            initial_value,
        }
    }

    /// Current value of a counter without incrementing it
    pub fn current(&self, name: &str) -> StoreResult<Option<i64>> {
        let counters = self.counters.read().map_err(|e| {
            StoreError::persistence(BACKEND, format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(counters.get(name).copied())
    }
}

impl Default for InMemorySequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SequenceGenerator for InMemorySequenceGenerator {
    async fn next(&self, name: &str) -> StoreResult<i64> {
        if name.is_empty() {
            return Err(StoreError::persistence(BACKEND, "Sequence name must not be empty"));
        }

        let mut counters = self.counters.write().map_err(|e| {
            StoreError::persistence(BACKEND, format!("Failed to acquire write lock: {}", e))
        })?;

        let value = counters
            .entry(name.to_string())
            .or_insert(self.initial_value);
        *value = value.checked_add(1).ok_or_else(|| {
            StoreError::persistence(BACKEND, format!("Sequence \"{}\" is exhausted", name))
        })?;

        Ok(*value)
    }
}
