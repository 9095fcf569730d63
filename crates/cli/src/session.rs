//! Shared command context.
//!
//! A [`Session`] bundles the loaded configuration, an [`ApiClient`] with
//! any persisted token restored, and the cart store hydrated from the
//! snapshot file. Logged-in sessions mirror cart mutations to the
//! backend cart resource.

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use atelier_cart::CartStore;
use atelier_cart::storage::JsonFileStorage;
use atelier_client::{ApiClient, RemoteCartMirror};

use crate::config::{CliConfig, ConfigError};

/// How long to wait for in-flight mirror sends before the process exits.
const MIRROR_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

pub struct Session {
    pub config: CliConfig,
    pub client: ApiClient,
    pub store: CartStore<JsonFileStorage>,
    mirror: Option<Arc<RemoteCartMirror>>,
}

impl Session {
    /// Open a session for the current process.
    ///
    /// Loads configuration, restores the persisted token if one exists,
    /// and hydrates the cart from its snapshot. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are
    /// missing or invalid.
    pub fn open() -> Result<Self, ConfigError> {
        let config = CliConfig::from_env()?;
        let client = ApiClient::new(config.backend_url.clone());

        if let Some(token) = read_token(&config) {
            client.set_token(SecretString::from(token));
        }

        let mut store = CartStore::hydrate(JsonFileStorage::new(config.cart_path()));
        let mut mirror = None;
        if client.has_token() {
            let remote = Arc::new(RemoteCartMirror::new(
                client.clone(),
                tokio::runtime::Handle::current(),
            ));
            store = store.with_mirror(Arc::clone(&remote));
            mirror = Some(remote);
        }

        Ok(Self {
            config,
            client,
            store,
            mirror,
        })
    }

    /// Persist the session token for later runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or token file cannot be
    /// written.
    pub fn persist_token(&self, token: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config.data_dir)?;
        std::fs::write(self.config.token_path(), token)
    }

    /// Clear the in-memory token and delete the persisted one.
    ///
    /// Deleting an already-absent token file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file exists but cannot be removed.
    pub fn forget_token(&self) -> std::io::Result<()> {
        self.client.clear_token();
        match std::fs::remove_file(self.config.token_path()) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Let fire-and-forget mirror sends drain before the process exits.
    ///
    /// Sends still in flight after [`MIRROR_DRAIN_TIMEOUT`] are aborted;
    /// the local snapshot is the source of truth either way.
    pub async fn finish(self) {
        let Self { store, mirror, .. } = self;
        drop(store);

        if let Some(mirror) = mirror {
            let deadline = tokio::time::Instant::now() + MIRROR_DRAIN_TIMEOUT;
            while mirror.pending() > 0 && tokio::time::Instant::now() < deadline {
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            mirror.abort_pending();
        }
    }
}

/// The persisted token, if a non-empty token file exists.
fn read_token(config: &CliConfig) -> Option<String> {
    let raw = std::fs::read_to_string(config.token_path()).ok()?;
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_cart::{CartMirror, MirrorOp};

    // A command that fails after mutating the cart can leave a mirror
    // send in flight; finish still waits for it before the process exits.
    #[tokio::test]
    async fn test_finish_drains_pending_mirror_sends() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            backend_url: "http://backend.invalid".parse().unwrap(),
            data_dir: dir.path().to_path_buf(),
        };
        let client = ApiClient::new(config.backend_url.clone());
        let remote = Arc::new(RemoteCartMirror::new(
            client.clone(),
            tokio::runtime::Handle::current(),
        ));
        let store = CartStore::hydrate(JsonFileStorage::new(config.cart_path()))
            .with_mirror(Arc::clone(&remote));
        let session = Session {
            config,
            client,
            store,
            mirror: Some(Arc::clone(&remote)),
        };

        // Fails fast without a token, but the task still has to be
        // joined rather than aborted mid-send.
        remote.apply(MirrorOp::Clear);
        session.finish().await;
        assert_eq!(remote.pending(), 0);
    }
}
