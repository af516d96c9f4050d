//! Shared state handed to every handler
//!
//! `ServerHost` is created once at startup and passed to handlers as axum
//! `State`; cloning it only bumps reference counts.

use crate::core::{INVOICE_NUMBER_SEQUENCE, InvoiceStore, SequenceGenerator};
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerHost {
    /// Invoice persistence
    pub invoices: Arc<dyn InvoiceStore>,

    /// Counter behind the next-invoice-number endpoint
    pub sequences: Arc<dyn SequenceGenerator>,

    /// Name of the counter used for invoice numbers
    pub sequence_name: Arc<str>,
}

impl ServerHost {
    pub fn new(invoices: Arc<dyn InvoiceStore>, sequences: Arc<dyn SequenceGenerator>) -> Self {
        Self {
            invoices,
            sequences,
            sequence_name: Arc::from(INVOICE_NUMBER_SEQUENCE),
        }
    }

    pub fn with_sequence_name(mut self, name: impl Into<String>) -> Self {
        self.sequence_name = Arc::from(name.into());
        self
    }
}
