use std::future::Future;
use std::io;
use std::sync::Arc;

use ourjson_store::{BinStore, FileBinStore, InMemoryBinStore};
use tokio::net::TcpListener;

use crate::config::{ServerConfig, StorageConfig};
use crate::error::ServerResult;
use crate::router::build_router;
use crate::service::BinService;

/// Open the store selected by `storage`.
pub async fn open_store(storage: &StorageConfig) -> ServerResult<Arc<dyn BinStore>> {
    let store: Arc<dyn BinStore> = match storage {
        StorageConfig::Memory => Arc::new(InMemoryBinStore::new()),
        StorageConfig::Directory { path } => Arc::new(FileBinStore::open(path).await?),
    };
    Ok(store)
}

/// OurJSON HTTP server.
pub struct BinServer {
    config: ServerConfig,
    service: Arc<BinService>,
}

impl BinServer {
    /// Build a server over the store named in `config.storage`.
    pub async fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = open_store(&config.storage).await?;
        Ok(Self::with_store(config, store))
    }

    /// Build a server over an already constructed store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn BinStore>) -> Self {
        let service = Arc::new(BinService::new(store, config.base_uri()));
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> Arc<BinService> {
        self.service.clone()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.service.clone(), self.config.max_body_bytes)
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_on(tokio::signal::ctrl_c()))
            .await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            base_uri = %self.config.base_uri(),
            "OurJSON server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("OurJSON server stopped");
        Ok(())
    }
}

/// Resolve when `signal` fires.
///
/// If the signal cannot be listened for, never resolve: the server keeps
/// running instead of stopping right after it binds.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
        std::future::pending::<()>().await;
    }
}
