use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

#[cfg(unix)]
use smallvec::SmallVec;
#[cfg(unix)]
use tokio::signal::unix::{self, Signal, SignalKind};

/// Shutdown trigger for `axum::serve`. Resolves on the first of SIGINT,
/// SIGTERM or SIGQUIT (ctrl-c outside unix), after which in-flight requests
/// are drained.
pub struct SignalHandler {
    #[cfg(unix)]
    listeners: SmallVec<[(&'static str, Signal); 3]>,
    #[cfg(not(unix))]
    ctrl_c: Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>,
}

#[cfg(unix)]
const SHUTDOWN_SIGNALS: [(&str, fn() -> SignalKind); 3] = [
    ("SIGINT", SignalKind::interrupt),
    ("SIGTERM", SignalKind::terminate),
    ("SIGQUIT", SignalKind::quit),
];

impl SignalHandler {
    #[cfg(unix)]
    pub fn new() -> Self {
        let listeners: SmallVec<_> = SHUTDOWN_SIGNALS
            .into_iter()
            .filter_map(|(name, kind)| match unix::signal(kind()) {
                Ok(signal) => Some((name, signal)),
                Err(err) => {
                    error!("failed to listen for {}: {}", name, err);
                    None
                }
            })
            .collect();

        if listeners.is_empty() {
            warn!("no shutdown signal could be registered");
        }

        Self { listeners }
    }

    #[cfg(not(unix))]
    pub fn new() -> Self {
        Self {
            ctrl_c: Box::pin(tokio::signal::ctrl_c()),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Future for SignalHandler {
    type Output = ();

    #[cfg(unix)]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        for (name, signal) in self.listeners.iter_mut() {
            if signal.poll_recv(cx).is_ready() {
                info!("received {}, draining in-flight requests", name);
                return Poll::Ready(());
            }
        }

        Poll::Pending
    }

    #[cfg(not(unix))]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.ctrl_c.as_mut().poll(cx).is_ready() {
            info!("received ctrl-c, draining in-flight requests");
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stays_pending_without_a_signal() {
        let handler = SignalHandler::new();
        assert_eq!(handler.listeners.len(), SHUTDOWN_SIGNALS.len());

        let result = tokio::time::timeout(Duration::from_millis(20), handler).await;
        assert!(result.is_err());
    }
}
