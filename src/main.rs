//! invoice-ledger server binary

use anyhow::Result;
use invoice_ledger::config::AppConfig;
use invoice_ledger::observability::init_tracing;
use invoice_ledger::server::ServerBuilder;
use invoice_ledger::storage::Backend;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()?;
    tracing::info!(backend = %config.store.backend, "Starting invoice-ledger");

    let backend = Backend::from_config(&config.store).await;

    let served = ServerBuilder::new()
        .with_backend(&backend)
        .with_sequence_name(config.store.sequence_name.clone())
        .serve(&config.server.bind_address())
        .await;

    backend.close().await;
    served
}
