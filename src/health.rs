//! Liveness endpoint
//!
//! Two static probes for the hosting platform. The server runs on its own
//! thread and runtime and shares nothing with the bot, so a busy pipeline
//! never delays a probe.

use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub const ROOT_BODY: &str = "🤖 Dispatch bot is running";
pub const HEALTH_BODY: &str = "OK";

async fn root() -> &'static str {
    ROOT_BODY
}

async fn health_check() -> &'static str {
    HEALTH_BODY
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Bind the liveness port; failure here is fatal at startup
pub fn bind(port: u16) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

/// Serve the liveness router on a dedicated background thread
pub fn spawn(listener: TcpListener) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("liveness".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!("Failed to start liveness runtime: {}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(e) => {
                        tracing::error!("Failed to adopt liveness listener: {}", e);
                        return;
                    }
                };
                if let Ok(addr) = listener.local_addr() {
                    tracing::info!("Liveness endpoint listening on {}", addr);
                }
                if let Err(e) = axum::serve(listener, router()).await {
                    tracing::error!("Liveness endpoint stopped: {}", e);
                }
            });
        })
}
