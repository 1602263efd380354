//! Server startup.

use crate::bootstrap::bootstrap_admin;
use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use crate::store::open_store;
use streamgate_core::StreamgateConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// The stream API server.
pub struct StreamgateServer {
    config: StreamgateConfig,
}

impl StreamgateServer {
    pub fn new(config: StreamgateConfig) -> Self {
        Self { config }
    }

    /// Open storage, provision the admin account and build the state.
    pub async fn prepare(&self) -> Result<AppState, ApiError> {
        let store = open_store(&self.config.storage).await?;
        bootstrap_admin(store.as_ref(), &self.config.admin).await?;
        AppState::from_config(&self.config, store)
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self) -> Result<(), ApiError> {
        let state = self.prepare().await?;

        let mut app = routes::create_router(state);
        if self.config.server.request_logging {
            app = app.layer(TraceLayer::new_for_http());
        }

        let addr = self.config.server.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Startup(format!("{addr}: {e}")))?;
        tracing::info!(address = %addr, "Starting stream API");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Startup(e.to_string()))?;

        tracing::info!("stream API stopped");
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.config.server.bind_address()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
