//! Gateway server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::create_router;
use crate::state::AppState;

/// Serves the router with peer addresses available to handlers.
pub struct GatewayServer {
    host: String,
    port: u16,
    state: Arc<AppState>,
}

impl GatewayServer {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<AppState>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state.clone());

        let listener = TcpListener::bind(self.addr()).await?;
        let local = listener.local_addr()?;
        info!(
            "Trigger gateway listening on {} (routes under {})",
            local,
            self.state.prefix()
        );

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("Trigger gateway stopped");
        Ok(())
    }
}
