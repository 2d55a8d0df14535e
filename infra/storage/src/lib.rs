//! Sandboxed media store for uploaded files.
//!
//! * Objects are addressed by a validated [`Bucket`] and a flat [`ObjectName`]; there is no way to
//!   spell a path outside the root.
//! * Writes are atomic: unique temp file, `fsync`, rename.
//! * Objects are sharded into two directory levels by name prefix.
//! * Temp files orphaned by a crash are purged when the store is opened.
//!
//! ```rust
//! use folio_storage::{Bucket, MediaStore, ObjectName, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let store = MediaStore::builder().root(tmp.path().join("media")).connect().await?;
//!     let bucket = Bucket::parse("uploads")?;
//!     let name = ObjectName::parse("k3Hq9xPz2mTa.png")?;
//!
//!     store.put(&bucket, &name, b"\x89PNG").await?;
//!     assert_eq!(store.get(&bucket, &name).await?, b"\x89PNG");
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod maintenance;
mod name;
mod store;

pub use builder::{DEFAULT_MAX_OBJECT_SIZE, MediaStoreBuilder};
pub use error::{StorageError, StorageErrorExt};
pub use name::{Bucket, ObjectName};
pub use store::{MediaStore, StoredObject};
