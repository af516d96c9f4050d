//! Invoice data model
//!
//! Every field is optional: missing fields stay absent and are listed back as
//! absent, unknown fields are dropped on input. A field of the wrong JSON type
//! fails deserialization. The server never recomputes or checks `totalAmount`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by an invoice store on insert
///
/// The format depends on the backend (an ObjectId hex string for MongoDB,
/// a UUID for the in-memory store). Handlers never inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InvoiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for InvoiceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Contact block used for both the customer and the issuer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A single invoice line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Invoice record as submitted by the client and stored as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Expected to come from the sequence generator; not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Party>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_from: Option<Party>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,

    /// Always present on output; an omitted list is stored empty
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

/// An invoice together with the identifier its store assigned
///
/// Serialized flat, with the identifier under `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInvoice {
    #[serde(rename = "_id")]
    pub id: InvoiceId,

    #[serde(flatten)]
    pub invoice: Invoice,
}

impl StoredInvoice {
    pub fn new(id: InvoiceId, invoice: Invoice) -> Self {
        Self { id, invoice }
    }
}
