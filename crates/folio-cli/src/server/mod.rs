//! Static file server with graceful shutdown.

mod shutdown;

use std::io;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use self::shutdown::{drain_with_deadline, shutdown_on_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Creates the router serving the built site.
///
/// Directory requests fall back to their `index.html`.
pub fn router(config: &ServerConfig) -> Router {
    let files = ServeDir::new(&config.dir).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Serves the output directory until a shutdown signal arrives.
///
/// After the signal, open connections get the configured shutdown timeout
/// to finish.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: ServerConfig) -> io::Result<()> {
    let server_addr = config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %server_addr,
            error = %err,
            hint = bind_hint(&err),
            "Failed to bind to address"
        );
        err
    })?;

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server bound to all interfaces - ensure firewall is configured"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        dir = %config.dir.display(),
        "Serving site"
    );

    let started_at = Instant::now();
    let shutdown = shutdown_on_signal();
    let server = axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned());

    let result = drain_with_deadline(server, shutdown, config.shutdown_timeout()).await;

    match &result {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            uptime_secs = started_at.elapsed().as_secs(),
            "Server stopped"
        ),
        Err(err) => tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %err,
            uptime_secs = started_at.elapsed().as_secs(),
            "Server failed"
        ),
    }

    result
}

/// Suggests a fix for common bind failures.
fn bind_hint(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::AddrInUse => "another process uses this port, pick another with --port",
        io::ErrorKind::PermissionDenied => "the port needs elevated privileges",
        io::ErrorKind::AddrNotAvailable => "the host address is not assigned to this machine",
        _ => "check HOST and PORT",
    }
}
