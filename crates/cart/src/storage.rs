//! The cart persistence port.
//!
//! The store never touches storage directly; it goes through the
//! [`CartStorage`] trait so the cart model is testable without any real
//! environment. Two implementations ship here: a JSON file snapshot (the
//! durable, well-known-location analog of a browser's local storage) and
//! an in-memory one for tests and ephemeral sessions.
//!
//! Concurrent writers (two processes sharing one snapshot path) race and
//! the last write wins. That weak consistency is accepted for a
//! single-user convenience cart; this is not a ledger.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::store::Cart;

/// Default file name for the cart snapshot, the storefront's well-known
/// storage key.
pub const CART_SNAPSHOT_FILE: &str = "cart.json";

/// Current snapshot envelope version.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the snapshot failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot exists but could not be parsed.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The snapshot was written by an unknown format version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// Durable storage for the serialized cart.
///
/// `save` is called synchronously after every mutation, so a reload
/// reconstructs the same cart. Implementations must treat a missing
/// snapshot as `Ok(None)`, not an error.
pub trait CartStorage {
    /// Load the persisted cart, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when a snapshot exists but cannot be read
    /// or parsed. The store treats that as a corrupt snapshot and starts
    /// empty rather than failing.
    fn load(&self) -> Result<Option<Cart>, StorageError>;

    /// Persist the cart, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the snapshot cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), StorageError>;

    /// Remove the persisted snapshot entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the snapshot cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Versioned envelope around the persisted cart.
///
/// The version field lets a future format change be detected instead of
/// silently misread; an unknown version is reported as corrupt.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    cart: Cart,
}

// =============================================================================
// JSON file storage
// =============================================================================

/// Cart snapshot stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at an explicit snapshot path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the well-known file name inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CART_SNAPSHOT_FILE))
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion(snapshot.version));
        }
        debug!(path = %self.path.display(), items = snapshot.cart.len(), "loaded cart snapshot");
        Ok(Some(snapshot.cart))
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            cart: cart.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Cart snapshot held in memory. For tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Cart>>,
}

impl MemoryStorage {
    /// Number of saves that would survive a reload (0 or 1).
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Cart>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        Ok(self.lock().clone())
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        *self.lock() = Some(cart.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock() = None;
        Ok(())
    }
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        (**self).save(cart)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}
