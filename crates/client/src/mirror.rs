//! Fire-and-forget mirroring of cart mutations to the backend.

use std::sync::{Mutex, PoisonError};

use atelier_cart::{CartMirror, MirrorOp};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::api::ApiClient;

/// Mirrors cart mutations to the backend cart resource.
///
/// Each mutation is sent on a spawned task so the store's synchronous
/// dispatch never waits on the network. A failed send is logged and the
/// local cart stays authoritative; there is no retry and no rollback.
///
/// Dropping the mirror aborts any in-flight sends, so tearing down a
/// session does not leave requests running against a stale token.
pub struct RemoteCartMirror {
    client: ApiClient,
    runtime: tokio::runtime::Handle,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RemoteCartMirror {
    /// Create a mirror that spawns its sends on `runtime`.
    #[must_use]
    pub fn new(client: ApiClient, runtime: tokio::runtime::Handle) -> Self {
        Self {
            client,
            runtime,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Number of sends still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        let mut tasks = self.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.len()
    }

    /// Abort every in-flight send.
    pub fn abort_pending(&self) {
        for task in self.lock().drain(..) {
            task.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartMirror for RemoteCartMirror {
    fn apply(&self, op: MirrorOp) {
        let client = self.client.clone();
        let task = self.runtime.spawn(async move {
            let result = match op {
                MirrorOp::Add { line } => client.cart_add(&line).await.map(drop),
                MirrorOp::UpdateQuantity { line_id, quantity } => {
                    client.cart_update(line_id, quantity).await.map(drop)
                }
                MirrorOp::Remove { line_id } => client.cart_remove(line_id).await.map(drop),
                MirrorOp::Clear => client.cart_clear().await.map(drop),
            };
            if let Err(err) = result {
                // Reported, not rolled back: the local cart is the source
                // of truth and stays as the user left it.
                warn!(error = %err, "cart mirror request failed");
            }
        });

        let mut tasks = self.lock();
        tasks.retain(|existing| !existing.is_finished());
        tasks.push(task);
    }
}

impl Drop for RemoteCartMirror {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_mirror_send_fails_quietly() {
        let client = ApiClient::new("https://backend.example".parse().unwrap());
        let mirror = RemoteCartMirror::new(client, tokio::runtime::Handle::current());

        // No token installed: the spawned send fails with Unauthorized
        // and the mirror swallows it.
        mirror.apply(MirrorOp::Clear);
        while mirror.pending() > 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_abort_pending_clears_tasks() {
        let client = ApiClient::new("https://backend.example".parse().unwrap());
        let mirror = RemoteCartMirror::new(client, tokio::runtime::Handle::current());

        mirror.apply(MirrorOp::Clear);
        mirror.abort_pending();
        assert_eq!(mirror.pending(), 0);
    }
}
