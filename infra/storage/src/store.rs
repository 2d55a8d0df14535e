use crate::builder::MediaStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::TMP_MARKER;
use crate::name::{Bucket, ObjectName};
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct MediaStoreInner {
    pub(crate) root: PathBuf,
    pub(crate) max_object_size: u64,
    pub(crate) tmp_counter: AtomicU64,
}

/// Handle to the media store. Cheap to clone.
///
/// Objects live at `<root>/<bucket>/<s1>/<s2>/<name>` where `s1`/`s2` are the first two
/// character pairs of the name, which keeps directories small for random identifiers.
#[derive(Debug, Clone)]
pub struct MediaStore {
    pub(crate) inner: Arc<MediaStoreInner>,
}

impl Deref for MediaStore {
    type Target = MediaStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Result of a successful [`MediaStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub name: ObjectName,
    pub size: u64,
}

impl MediaStore {
    pub fn builder() -> MediaStoreBuilder {
        MediaStoreBuilder::new()
    }

    /// Canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    #[must_use]
    pub fn max_object_size(&self) -> u64 {
        self.inner.max_object_size
    }

    /// Physical location of an object (which may not exist yet).
    ///
    /// # Errors
    /// Returns [`StorageError::OutsideRoot`] if an existing directory on the way is a link that
    /// leaves the root.
    pub fn locate(&self, bucket: &Bucket, name: &ObjectName) -> Result<PathBuf, StorageError> {
        let mut path = self.root.join(bucket.as_str());
        if let Some((first, second)) = name.shards() {
            path.push(first);
            path.push(second);
        }
        path.push(name.as_str());
        self.ensure_inside(&path)?;
        Ok(path)
    }

    /// Writes an object atomically (temp file, fsync, rename), replacing any previous content.
    ///
    /// # Errors
    /// * [`StorageError::TooLarge`] when `data` exceeds the configured limit.
    /// * [`StorageError::Io`] on filesystem failures.
    pub async fn put(
        &self,
        bucket: &Bucket,
        name: &ObjectName,
        data: &[u8],
    ) -> Result<StoredObject, StorageError> {
        let size = data.len() as u64;
        if size > self.max_object_size {
            return Err(StorageError::TooLarge {
                message: format!("{size} bytes").into(),
                context: Some(format!("limit is {} bytes", self.max_object_size).into()),
            });
        }

        let target = self.locate(bucket, name)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("creating {}", parent.display()))?;
        }

        let temp = self.temp_path(&target);
        let written = write_synced(&temp, data).await;
        if let Err(err) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(err);
        }

        if let Err(err) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(format!("moving into place {}", target.display()).into()),
            });
        }
        sync_dir(target.parent()).await;

        debug!(bucket = %bucket, object = %name, size, "Object stored");
        Ok(StoredObject { bucket: bucket.clone(), name: name.clone(), size })
    }

    /// Reads a whole object.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] when the object is missing.
    pub async fn get(&self, bucket: &Bucket, name: &ObjectName) -> Result<Vec<u8>, StorageError> {
        let path = self.locate(bucket, name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                message: format!("{bucket}/{name}").into(),
                context: None,
            }),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("reading {}", path.display()).into()),
            }),
        }
    }

    /// Removes an object. Returns `false` when it did not exist.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] on filesystem failures other than a missing file.
    pub async fn remove(&self, bucket: &Bucket, name: &ObjectName) -> Result<bool, StorageError> {
        let path = self.locate(bucket, name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(bucket = %bucket, object = %name, "Object removed");
                Ok(true)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("removing {}", path.display()).into()),
            }),
        }
    }

    /// # Errors
    /// Propagates [`MediaStore::locate`] failures.
    pub async fn exists(&self, bucket: &Bucket, name: &ObjectName) -> Result<bool, StorageError> {
        let path = self.locate(bucket, name)?;
        fs::try_exists(&path).await.context(format!("checking {}", path.display()))
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let id = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("object");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{id}"))
    }

    /// Walks up to the first existing ancestor and checks it still resolves under the root.
    fn ensure_inside(&self, path: &Path) -> Result<(), StorageError> {
        let mut current = Some(path);
        while let Some(candidate) = current {
            if candidate == self.root {
                return Ok(());
            }
            if candidate.exists() {
                let canonical = candidate
                    .canonicalize()
                    .context(format!("resolving {}", candidate.display()))?;
                return if canonical.starts_with(&self.root) {
                    Ok(())
                } else {
                    Err(StorageError::OutsideRoot {
                        message: canonical.display().to_string().into(),
                        context: Some(path.display().to_string().into()),
                    })
                };
            }
            current = candidate.parent();
        }
        Err(StorageError::OutsideRoot { message: path.display().to_string().into(), context: None })
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut file = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)
        .await
        .context(format!("creating {}", path.display()))?;
    file.write_all(data).await.context("writing object")?;
    file.sync_all().await.context("syncing object")?;
    Ok(())
}

async fn sync_dir(dir: Option<&Path>) {
    let Some(dir) = dir else { return };
    match fs::File::open(dir).await {
        Ok(handle) => {
            if let Err(err) = handle.sync_all().await {
                warn!(path = %dir.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %dir.display(), error = %err, "Directory open failed"),
    }
}
