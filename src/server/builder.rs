//! ServerBuilder for fluent API to build the HTTP server

use super::host::ServerHost;
use super::router::{build_health_routes, build_invoice_routes};
use crate::core::{InvoiceStore, SequenceGenerator};
use crate::storage::Backend;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the invoice HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_invoice_store(InMemoryInvoiceStore::new())
///     .with_sequence_generator(InMemorySequenceGenerator::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    invoice_store: Option<Arc<dyn InvoiceStore>>,
    sequence_generator: Option<Arc<dyn SequenceGenerator>>,
    sequence_name: Option<String>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            invoice_store: None,
            sequence_generator: None,
            sequence_name: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice store (required)
    pub fn with_invoice_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.invoice_store = Some(Arc::new(store));
        self
    }

    /// Set the sequence generator (required)
    pub fn with_sequence_generator(mut self, generator: impl SequenceGenerator + 'static) -> Self {
        self.sequence_generator = Some(Arc::new(generator));
        self
    }

    /// Take both services from a configured [`Backend`]
    pub fn with_backend(mut self, backend: &Backend) -> Self {
        self.invoice_store = Some(backend.invoice_store());
        self.sequence_generator = Some(backend.sequence_generator());
        self
    }

    /// Use a counter other than `invoiceNumber` for the next-number endpoint
    pub fn with_sequence_name(mut self, name: impl Into<String>) -> Self {
        self.sequence_name = Some(name.into());
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the shared handler state
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let invoices = self.invoice_store.take().ok_or_else(|| {
            anyhow::anyhow!("InvoiceStore is required. Call .with_invoice_store()")
        })?;
        let sequences = self.sequence_generator.take().ok_or_else(|| {
            anyhow::anyhow!("SequenceGenerator is required. Call .with_sequence_generator()")
        })?;

        let host = ServerHost::new(invoices, sequences);
        Ok(match self.sequence_name.take() {
            Some(name) => host.with_sequence_name(name),
            None => host,
        })
    }

    /// Build the final router: invoice and health routes, custom routes,
    /// permissive CORS and HTTP request tracing
    pub fn build(mut self) -> Result<Router> {
        let host = self.build_host()?;

        let mut app = build_health_routes().merge(build_invoice_routes(host));
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Returns once SIGTERM or Ctrl+C has been received and in-flight
    /// requests have completed.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server running on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
