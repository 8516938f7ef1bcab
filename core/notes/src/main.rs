use anyhow::Result;
use notes_service::{
    connect, router, Backend, DynamoStore, InMemoryStore, NoteStore, NotesService, ServiceConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let on_lambda = std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(!on_lambda)
        .init();

    info!("Notes Service v{}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::from_env();

    // The store client is built once here and shared by every request
    let store: Arc<dyn NoteStore> = match config.backend {
        Backend::DynamoDb => {
            let client = connect(&config.dynamo).await;
            info!(
                "Using DynamoDB table: {} ({})",
                config.dynamo.table_name, config.dynamo.region
            );
            Arc::new(DynamoStore::new(client, config.dynamo.table_name.clone()))
        }
        Backend::Memory => {
            warn!("Using in-memory store; notes will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let app = router(NotesService::new(store));

    if on_lambda {
        info!("Starting Lambda runtime");
        lambda_http::run(app)
            .await
            .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))?;
        return Ok(());
    }

    info!("Starting HTTP server on http://{}", config.bind_addr);
    info!("Notes endpoint: http://{}/notes", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
