use std::sync::Arc;

use tokio::net::TcpListener;
use tunetree_catalog::Catalog;
use tunetree_store::S3ObjectStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// tunetree HTTP server.
pub struct TunetreeServer {
    config: ServerConfig,
    catalog: Catalog,
}

impl TunetreeServer {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// Validate `config` and open the S3 store it names.
    pub async fn connect(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let store = S3ObjectStore::connect(&config.store).await?;
        let catalog = Catalog::new(Arc::new(store), config.root_prefix.clone());
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.catalog.clone(), self.config.request_timeout());
        build_router(state, &self.config.static_dir)
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            prefix = %self.catalog.namespace(),
            "tunetree server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
