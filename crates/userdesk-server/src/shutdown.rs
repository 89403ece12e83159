//! Signal handling and graceful shutdown.

use std::future::Future;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use userdesk_core::AppError;

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT. Cleaning up..."),
        _ = terminate => tracing::info!("Received SIGTERM. Cleaning up..."),
    }
}

/// Serve `app` until `signal` resolves, then stop accepting connections and
/// wait up to `grace` for in-flight requests.
///
/// A zero `grace` skips draining: the server task is aborted and this
/// returns `Ok` straight away, leaving in-flight requests to die with the
/// process.
///
/// # Errors
/// Fails if the server dies on its own or draining outlasts a non-zero
/// `grace`.
pub async fn run_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut handle => return flatten(result),
        _ = signal => {}
    }

    let _ = stop_tx.send(());

    if grace.is_zero() {
        handle.abort();
        tracing::info!("Server closed without draining");
        return Ok(());
    }

    match tokio::time::timeout(grace, &mut handle).await {
        Ok(result) => {
            flatten(result)?;
            tracing::info!("Server closed");
            Ok(())
        }
        Err(_) => {
            handle.abort();
            Err(AppError::Other(anyhow::anyhow!(
                "Requests still in flight after {}s, forcing exit",
                grace.as_secs()
            )))
        }
    }
}

fn flatten(result: Result<std::io::Result<()>, JoinError>) -> Result<(), AppError> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::Io(e)),
        Err(e) => Err(AppError::Other(anyhow::anyhow!("Server task failed: {}", e))),
    }
}
