use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::store::{MediaStore, MediaStoreInner};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

/// Default per-object limit (5 MiB).
pub const DEFAULT_MAX_OBJECT_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Type-state builder: a root directory must be set before [`MediaStoreBuilder::connect`].
#[allow(private_bounds)]
#[derive(Debug)]
#[must_use = "the store is not opened until you call .connect()"]
pub struct MediaStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
    max_object_size: u64,
}

impl Default for MediaStoreBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, create: true, max_object_size: DEFAULT_MAX_OBJECT_SIZE }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> MediaStoreBuilder<S> {
    /// Creates the root directory when it is missing (default `true`).
    pub const fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Largest object accepted by [`MediaStore::put`].
    pub const fn max_object_size(mut self, bytes: u64) -> Self {
        self.max_object_size = bytes;
        self
    }
}

impl MediaStoreBuilder<NoRoot> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(self, path: impl Into<PathBuf>) -> MediaStoreBuilder<WithRoot> {
        MediaStoreBuilder {
            state: WithRoot(path.into()),
            create: self.create,
            max_object_size: self.max_object_size,
        }
    }
}

impl MediaStoreBuilder<WithRoot> {
    /// Opens the store: creates and canonicalizes the root, then removes stale temp files.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] when the root is missing (and `create` is off) or cannot be
    /// resolved.
    pub async fn connect(self) -> Result<MediaStore, StorageError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .await
                .context(format!("creating media root {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("resolving media root {}", root.display()))?;
        info!(root = %canonical.display(), "Media store opened");

        let store = MediaStore {
            inner: Arc::new(MediaStoreInner {
                root: canonical,
                max_object_size: self.max_object_size,
                tmp_counter: AtomicU64::new(1),
            }),
        };
        maintenance::purge_tmp(store.root()).await;

        Ok(store)
    }
}
