//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;
pub mod unavailable;

pub use in_memory::{InMemoryInvoiceStore, InMemorySequenceGenerator};
#[cfg(feature = "mongodb_backend")]
pub use mongodb::{MongoBackend, MongoInvoiceStore, MongoSequenceGenerator};
pub use unavailable::UnavailableBackend;

use crate::config::{StoreBackend, StoreConfig};
use crate::core::{InvoiceStore, SequenceGenerator};
use std::sync::Arc;

/// The storage backend selected at startup
///
/// Owns whatever process-wide resources the backend needs (the MongoDB
/// client) and hands out the trait objects the HTTP layer uses.
pub enum Backend {
    Memory {
        invoices: InMemoryInvoiceStore,
        sequences: InMemorySequenceGenerator,
    },
    #[cfg(feature = "mongodb_backend")]
    Mongo {
        backend: MongoBackend,
        invoices: MongoInvoiceStore,
        sequences: MongoSequenceGenerator,
    },
    Unavailable(UnavailableBackend),
}

impl Backend {
    /// In-memory backend with counters starting at `initial_value`
    pub fn memory(initial_value: i64) -> Self {
        Backend::Memory {
            invoices: InMemoryInvoiceStore::new(),
            sequences: InMemorySequenceGenerator::with_initial_value(initial_value),
        }
    }

    /// Open the configured backend
    ///
    /// Never fails: a backend that cannot be set up is logged and replaced by
    /// [`UnavailableBackend`], so the process keeps serving and every store
    /// call reports the reason.
    pub async fn from_config(config: &StoreConfig) -> Self {
        match config.backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                Self::memory(config.initial_value)
            }
            StoreBackend::Mongodb => Self::open_mongo(config).await,
        }
    }

    #[cfg(feature = "mongodb_backend")]
    async fn open_mongo(config: &StoreConfig) -> Self {
        let Some(uri) = config.mongo_uri.as_deref() else {
            return Self::unavailable("MongoDB connection string (MONGO_URI) is not set");
        };

        let backend = match MongoBackend::connect(uri, config.database.as_deref()).await {
            Ok(backend) => backend,
            Err(e) => return Self::unavailable(e.to_string()),
        };

        let sequences = backend.sequence_generator(config.initial_value);
        tokio::spawn(check_connection(backend.clone(), sequences.clone()));

        Backend::Mongo {
            invoices: backend.invoice_store(),
            sequences,
            backend,
        }
    }

    #[cfg(not(feature = "mongodb_backend"))]
    async fn open_mongo(_config: &StoreConfig) -> Self {
        Self::unavailable("MongoDB support is not compiled in (enable the `mongodb_backend` feature)")
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        let backend = UnavailableBackend::new(reason);
        tracing::error!(reason = backend.reason(), "Store unavailable, serving without a backend");
        Backend::Unavailable(backend)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory { .. } => "memory",
            #[cfg(feature = "mongodb_backend")]
            Backend::Mongo { .. } => "mongodb",
            Backend::Unavailable(_) => "unavailable",
        }
    }

    pub fn invoice_store(&self) -> Arc<dyn InvoiceStore> {
        match self {
            Backend::Memory { invoices, .. } => Arc::new(invoices.clone()),
            #[cfg(feature = "mongodb_backend")]
            Backend::Mongo { invoices, .. } => Arc::new(invoices.clone()),
            Backend::Unavailable(backend) => Arc::new(backend.clone()),
        }
    }

    pub fn sequence_generator(&self) -> Arc<dyn SequenceGenerator> {
        match self {
            Backend::Memory { sequences, .. } => Arc::new(sequences.clone()),
            #[cfg(feature = "mongodb_backend")]
            Backend::Mongo { sequences, .. } => Arc::new(sequences.clone()),
            Backend::Unavailable(backend) => Arc::new(backend.clone()),
        }
    }

    /// Release backend resources after the server has drained
    pub async fn close(self) {
        match self {
            #[cfg(feature = "mongodb_backend")]
            Backend::Mongo { backend, .. } => {
                backend.close().await;
                tracing::info!("MongoDB client closed");
            }
            _ => {}
        }
    }
}

/// Check reachability and build the counter index off the startup path.
///
/// Runs as a background task so the listener binds without waiting for
/// server selection. Only logs; a failed index build is retried by the
/// generator on its next call.
#[cfg(feature = "mongodb_backend")]
async fn check_connection(backend: MongoBackend, sequences: MongoSequenceGenerator) {
    match backend.ping().await {
        Ok(()) => {
            tracing::info!(database = backend.database().name(), "MongoDB connected");
            if let Err(e) = sequences.ensure_indexes().await {
                tracing::warn!(error = %e, "Could not ensure counter index");
            }
        }
        Err(e) => tracing::error!(error = %e, "MongoDB connection error"),
    }
}
