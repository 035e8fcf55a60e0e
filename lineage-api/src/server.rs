//! Server lifecycle: bind, serve, and shut down gracefully on Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use tokio::signal;
use tracing::info;

use crate::routes::create_router;
use crate::state::AppState;

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Server { state, addr }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let router = create_router(self.state);

        info!("starting lineage-api on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("listening on http://{}", self.addr);
        info!("  GET  /health    - health check");
        info!("  POST /traverse  - run a bounded taxonomy-driven traversal");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("received SIGTERM, shutting down gracefully"),
    }
}
