//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoInvoiceStore` and `MongoSequenceGenerator`, both backed by a
//! `mongodb::Database`, plus `MongoBackend` which owns the client and its
//! lifecycle.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! - Invoices live in the `invoices` collection, one document per invoice,
//!   with the store-assigned `ObjectId` as `_id`. The identifier handed to
//!   clients is its hex string.
//! - Counters live in the `counters` collection as `{ name, value }`
//!   documents, with a unique index on `name`.
//!
//! # Atomic counters
//!
//! `next` is a single `findOneAndUpdate` with `upsert` and an update pipeline
//! computing `value = ifNull(value, initial) + 1`. Creation and increment of a
//! missing counter therefore happen in one server-side step, and the returned
//! document is the post-update one.
//!
//! Two first callers racing on a missing counter would both insert unless the
//! unique index on `name` exists. `next` builds that index before its first
//! increment and retries the build on every call until it succeeds, so a
//! server that was unreachable at startup still gets it.

use crate::core::{
    DEFAULT_SEQUENCE_START, Invoice, InvoiceId, InvoiceStore, SequenceGenerator, StoreError,
    StoreResult, StoredInvoice,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::sync::Arc;
use tokio::sync::OnceCell;

const BACKEND: &str = "MongoDB";
const INVOICES_COLLECTION: &str = "invoices";
const COUNTERS_COLLECTION: &str = "counters";

/// Database used when the connection string does not name one
pub const DEFAULT_DATABASE: &str = "invoices";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Map a driver error onto the store taxonomy.
///
/// Anything that means "could not talk to the server" is `Unavailable`;
/// everything else was rejected by a reachable server.
fn classify(err: MongoError, context: &str) -> StoreError {
    let message = format!("{}: {}", context, err);
    match *err.kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::unavailable(BACKEND, message),
        _ => StoreError::persistence(BACKEND, message),
    }
}

/// Convert an invoice into a BSON document ready for insertion.
fn invoice_to_document(invoice: &Invoice) -> StoreResult<Document> {
    mongodb::bson::to_document(invoice).map_err(|e| {
        StoreError::persistence(BACKEND, format!("Failed to serialize invoice: {}", e))
    })
}

/// Convert a stored document back into a serde_json::Value,
/// rendering the `ObjectId` under `_id` as its hex string.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    let hex_id = match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        _ => None,
    };
    if let Some(hex) = hex_id {
        doc.insert("_id", Bson::String(hex));
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a stored document into a `StoredInvoice`.
fn document_to_invoice(doc: Document) -> StoreResult<StoredInvoice> {
    serde_json::from_value(document_to_json(doc)).map_err(|e| {
        StoreError::persistence(
            BACKEND,
            format!("Failed to deserialize invoice from document: {}", e),
        )
    })
}

/// Parse a client-supplied identifier as an `ObjectId`.
fn parse_object_id(id: &InvoiceId) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|_| {
        StoreError::persistence(
            BACKEND,
            format!("Cast to ObjectId failed for value \"{}\"", id),
        )
    })
}

/// Read the numeric `value` of a counter document, whatever BSON number type
/// it was stored with.
fn counter_value(doc: &Document) -> StoreResult<i64> {
    match doc.get("value") {
        Some(Bson::Int64(v)) => Ok(*v),
        Some(Bson::Int32(v)) => Ok(i64::from(*v)),
        Some(Bson::Double(v)) if v.fract() == 0.0 => Ok(*v as i64),
        other => Err(StoreError::persistence(
            BACKEND,
            format!("Counter document has no integer value: {:?}", other),
        )),
    }
}

// ---------------------------------------------------------------------------
// MongoInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by the `invoices` collection.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use invoice_ledger::storage::MongoInvoiceStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoInvoiceStore::new(client.database("ledger"));
/// let id = store.insert(invoice).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoInvoiceStore {
    database: Database,
}

impl MongoInvoiceStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(INVOICES_COLLECTION)
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    /// Insert the invoice; the server assigns the `ObjectId`.
    async fn insert(&self, invoice: Invoice) -> StoreResult<InvoiceId> {
        let doc = invoice_to_document(&invoice)?;

        let result = self
            .collection()
            .insert_one(doc)
            .await
            .map_err(|e| classify(e, "Failed to save invoice"))?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(InvoiceId::new(oid.to_hex())),
            other => Err(StoreError::persistence(
                BACKEND,
                format!("Unexpected inserted id: {}", other),
            )),
        }
    }

    /// List every invoice in natural order.
    async fn list_all(&self) -> StoreResult<Vec<StoredInvoice>> {
        let cursor = self
            .collection()
            .find(doc! {})
            .await
            .map_err(|e| classify(e, "Failed to list invoices"))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| classify(e, "Failed to collect invoices"))?;

        docs.into_iter().map(document_to_invoice).collect()
    }

    /// Delete by `ObjectId`.
    ///
    /// Silently succeeds if no document matches; fails if the identifier is
    /// not a valid `ObjectId`.
    async fn delete_by_id(&self, id: &InvoiceId) -> StoreResult<()> {
        let oid = parse_object_id(id)?;

        self.collection()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| classify(e, "Failed to delete invoice"))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MongoSequenceGenerator
// ---------------------------------------------------------------------------

/// Named counters backed by the `counters` collection.
#[derive(Clone, Debug)]
pub struct MongoSequenceGenerator {
    database: Database,
    initial_value: i64,
    indexed: Arc<OnceCell<()>>,
}

impl MongoSequenceGenerator {
    pub fn new(database: Database) -> Self {
        Self::with_initial_value(database, DEFAULT_SEQUENCE_START)
    }

    pub fn with_initial_value(database: Database, initial_value: i64) -> Self {
        Self {
            database,
            initial_value,
            indexed: Arc::new(OnceCell::new()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(COUNTERS_COLLECTION)
    }

    /// Create the unique index on `counters.name`.
    ///
    /// Runs once per generator (and its clones) after the first success; a
    /// failed attempt is retried on the next call. With the index in place the
    /// server retries an upsert that loses a race on a missing counter.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        self.indexed
            .get_or_try_init(|| self.create_indexes())
            .await
            .map(|_| ())
    }

    /// Whether the counter index is known to exist
    pub fn is_indexed(&self) -> bool {
        self.indexed.initialized()
    }

    async fn create_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection()
            .create_index(index)
            .await
            .map_err(|e| classify(e, "Failed to create index on counters collection"))?;

        Ok(())
    }

    fn increment_pipeline(&self) -> Vec<Document> {
        vec![doc! {
            "$set": {
                "value": { "$add": [ { "$ifNull": ["$value", self.initial_value] }, 1_i64 ] }
            }
        }]
    }
}

#[async_trait]
impl SequenceGenerator for MongoSequenceGenerator {
    async fn next(&self, name: &str) -> StoreResult<i64> {
        if name.is_empty() {
            return Err(StoreError::persistence(
                BACKEND,
                "Sequence name must not be empty",
            ));
        }

        self.ensure_indexes().await?;

        let counter = self
            .collection()
            .find_one_and_update(doc! { "name": name }, self.increment_pipeline())
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| classify(e, "Failed to increment counter"))?
            .ok_or_else(|| StoreError::persistence(BACKEND, "Counter not found after upsert"))?;

        counter_value(&counter)
    }
}

// ---------------------------------------------------------------------------
// MongoBackend
// ---------------------------------------------------------------------------

/// Owns the driver client shared by the invoice store and the counters.
///
/// Created once at startup, closed once at shutdown.
#[derive(Clone, Debug)]
pub struct MongoBackend {
    client: Client,
    database: Database,
}

impl MongoBackend {
    /// Build a client from a connection string.
    ///
    /// Parsing the string does not contact the server; reachability problems
    /// surface on the first operation. `database` overrides the database named
    /// in the URI; without either, [`DEFAULT_DATABASE`] is used.
    pub async fn connect(uri: &str, database: Option<&str>) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| classify(e, "Invalid MongoDB connection string"))?;

        let database = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn invoice_store(&self) -> MongoInvoiceStore {
        MongoInvoiceStore::new(self.database.clone())
    }

    pub fn sequence_generator(&self, initial_value: i64) -> MongoSequenceGenerator {
        MongoSequenceGenerator::with_initial_value(self.database.clone(), initial_value)
    }

    /// Round-trip a `ping` to check the server is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| classify(e, "MongoDB ping failed"))?;
        Ok(())
    }

    /// Shut the client down, waiting for in-flight operations.
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}
