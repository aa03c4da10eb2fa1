//! Cancellation scope for backend calls made by one editor.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

/// A call was abandoned because its scope was cancelled or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request cancelled")]
pub struct Cancelled;

/// Cancels every call started through it on [`cancel`](Self::cancel) or drop.
///
/// Cancellation is permanent: calls started afterwards fail immediately.
#[derive(Debug)]
pub struct RequestScope {
    cancel: watch::Sender<bool>,
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestScope {
    #[must_use]
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { cancel }
    }

    /// Run `fut` until it completes or the scope is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the scope is cancelled first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        self.guard(fut).await
    }

    /// Detach `fut` from `&self` so it can be spawned; dropping the scope
    /// still cancels it.
    pub fn guard<F: Future>(
        &self,
        fut: F,
    ) -> impl Future<Output = Result<F::Output, Cancelled>> + use<F> {
        let rx = self.cancel.subscribe();
        async move {
            tokio::select! {
                biased;
                () = cancelled(rx) => Err(Cancelled),
                output = fut => Ok(output),
            }
        }
    }

    /// Cancel every outstanding and future call.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

/// Resolves once the flag is set or the sender is gone.
async fn cancelled(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|cancelled| *cancelled).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_run_completes_when_not_cancelled() {
        let scope = RequestScope::new();
        assert_eq!(scope.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_cancelled_scope_rejects_new_calls() {
        let scope = RequestScope::new();
        scope.cancel();

        assert!(scope.is_cancelled());
        assert_eq!(scope.run(async { 7 }).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let scope = RequestScope::new();
        let call = scope.guard(tokio::time::sleep(Duration::from_secs(60)));
        let handle = tokio::spawn(call);

        tokio::task::yield_now().await;
        scope.cancel();

        assert_eq!(handle.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test]
    async fn test_drop_cancels_detached_call() {
        let scope = RequestScope::new();
        let handle = tokio::spawn(scope.guard(std::future::pending::<()>()));

        drop(scope);

        assert_eq!(handle.await.unwrap(), Err(Cancelled));
    }
}
