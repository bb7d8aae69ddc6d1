//! Shutdown signals and the connection drain deadline.

use std::future::IntoFuture;
use std::io;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SHUTDOWN;

/// Resolves once SIGINT (Ctrl+C) or, on Unix, SIGTERM arrives.
///
/// Returns the name of the received signal. A handler that cannot be
/// installed is logged and never fires.
pub async fn wait_for_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %error,
                    "Failed to install Ctrl+C handler"
                );
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %error,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

/// Returns a token that is cancelled when a shutdown signal arrives.
pub fn shutdown_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            signal = signal,
            "Received shutdown signal, draining connections"
        );
        trigger.cancel();
    });

    token
}

/// Runs `server` to completion, but gives open connections at most
/// `timeout` once `shutdown` is cancelled.
pub async fn drain_with_deadline<F>(
    server: F,
    shutdown: CancellationToken,
    timeout: Duration,
) -> io::Result<()>
where
    F: IntoFuture<Output = io::Result<()>>,
{
    let deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = server.into_future() => result,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}
