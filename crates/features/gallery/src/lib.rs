//! Gallery feature slice: image uploads kept in the media store, their metadata, and the
//! public `/uploads` file route.

mod error;
mod handlers;
mod kind;
mod model;
mod repository;
mod upload;

pub use crate::error::{GalleryError, GalleryErrorExt};
pub use crate::kind::ImageKind;
pub use crate::model::{CategoryQuery, Image, ImageListQuery, ImageUpdate, TagList};

use crate::repository::ImageRepository;
use folio_database::{Database, Migration};
use folio_domain::config::ApiConfig;
use folio_domain::constants::UPLOADS_BUCKET;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::ApiState;
use folio_storage::{Bucket, MediaStore};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("gallery", "0001", include_str!("../migrations/0001_init.surql"))];

#[folio_derive::folio_slice]
pub struct Gallery {
    repository: ImageRepository,
    store: MediaStore,
    bucket: Bucket,
}

impl Gallery {
    #[must_use]
    pub fn store(&self) -> &MediaStore {
        &self.store
    }
}

/// Opens the media store under `storage.media_dir` and initializes the gallery feature.
///
/// # Errors
/// Returns an error when the media root cannot be created or resolved.
pub async fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, GalleryError> {
    let store = MediaStore::builder()
        .root(config.storage.media_dir.clone())
        .max_object_size(config.storage.max_upload_bytes)
        .connect()
        .await
        .context("opening media store")?;
    let bucket = Bucket::parse(UPLOADS_BUCKET).context("uploads bucket")?;

    tracing::info!(
        root = %store.root().display(),
        max_upload_bytes = store.max_object_size(),
        "Gallery slice initialized"
    );
    let slice = Gallery::new(GalleryInner { repository: ImageRepository::new(database.clone()), store, bucket });
    Ok(InitializedSlice::new(slice))
}

/// Routes under `/api/images` plus the `/uploads` file route.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_images))
        .routes(routes!(handlers::upload_image))
        .routes(routes!(handlers::images_by_category))
        .routes(routes!(handlers::get_image, handlers::update_image, handlers::delete_image))
        .routes(routes!(handlers::serve_upload))
}
