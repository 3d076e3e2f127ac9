use std::future::Future;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Resolves on SIGTERM or Ctrl+C.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

/// Returns a token that is cancelled once a shutdown signal arrives.
pub fn cancel_on_signal() -> CancellationToken {
    cancel_when(wait_for_shutdown(), tokio::signal::ctrl_c())
}

/// Cancels the returned token when `primary` resolves. If `primary` fails,
/// `fallback` is awaited first; the token is cancelled either way.
fn cancel_when<P, F>(primary: P, fallback: F) -> CancellationToken
where
    P: Future<Output = Result<()>> + Send + 'static,
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let c = cancel.clone();
    tokio::spawn(async move {
        match primary.await {
            Ok(()) => tracing::info!("shutdown: signal received"),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "shutdown: primary waiter failed; falling back to ctrl_c()"
                );
                if let Err(e) = fallback.await {
                    tracing::warn!(error = %e, "shutdown: ctrl_c() fallback failed");
                }
            }
        }
        c.cancel();
    });
    cancel
}
