use crate::Gallery;
use crate::kind::ImageKind;
use crate::model::{CategoryQuery, Image, ImageListQuery, ImageRow, ImageUpdate, UploadForm};
use crate::repository::ImageFilter;
use crate::upload::read_upload;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_derive::api_handler;
use folio_domain::constants::{IMAGE, TAG_IMAGES, UPLOADS_ROUTE};
use folio_domain::models::ImageCategory;
use folio_identity::AdminUser;
use folio_kernel::prelude::*;
use folio_storage::ObjectName;
use tokio_util::io::ReaderStream;

const DEFAULT_PAGE_SIZE: u32 = 20;
const CATEGORY_LIMIT: u32 = 10;

const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("title", "title"),
    ("views", "views"),
    ("size", "size"),
    ("category", "category"),
];

fn not_found() -> ApiError {
    ApiError::not_found("Image not found")
}

#[api_handler(
    get,
    path = "/api/images",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("limit" = Option<u32>, Query, description = "1..=100, default 20"),
        ("category" = Option<String>, Query, description = "hero, project, gallery, avatar or other"),
        ("tags" = Option<String>, Query, description = "Comma separated, matches any"),
        ("isPublic" = Option<bool>, Query),
        ("sort" = Option<String>, Query, description = "createdAt, updatedAt, title, views, size or category; '-' for descending"),
    ),
    responses(
        (status = OK, description = "One page of images", body = Paginated<Image>),
        (status = BAD_REQUEST, description = "Invalid paging or sort", body = ErrorBody),
    ),
    tag = TAG_IMAGES,
)]
pub(crate) async fn list_images(
    State(state): State<ApiState>,
    QueryParams(query): QueryParams<ImageListQuery>,
) -> ApiResult<Paginated<Image>> {
    let page = PageRequest::checked(query.page, query.limit, DEFAULT_PAGE_SIZE)?;
    let sort = Sort::parse(query.sort.as_deref(), "-createdAt", SORT_FIELDS)?;

    let gallery = state.try_get_slice::<Gallery>()?;
    let (rows, total) = gallery.repository.list(ImageFilter::from_query(&query), sort, page).await?;
    Ok(Paginated::new(rows.into_iter().map(ImageRow::into_image).collect(), Pagination::new(page, total)))
}

#[api_handler(
    get,
    path = "/api/images/category/{category}",
    params(
        ("category" = String, Path, description = "hero, project, gallery, avatar or other"),
        ("limit" = Option<u32>, Query, description = "1..=10, default 10"),
    ),
    responses(
        (status = OK, description = "Newest public images of the category", body = ApiResponse<Vec<Image>>),
        (status = BAD_REQUEST, description = "Unknown category", body = ErrorBody),
    ),
    tag = TAG_IMAGES,
)]
pub(crate) async fn images_by_category(
    State(state): State<ApiState>,
    Path(category): Path<String>,
    QueryParams(query): QueryParams<CategoryQuery>,
) -> ApiResult<ApiResponse<Vec<Image>>> {
    let category: ImageCategory = category.parse().map_err(|_| ApiError::bad_request("Invalid category"))?;
    let limit = query.limit.unwrap_or(CATEGORY_LIMIT).clamp(1, CATEGORY_LIMIT);

    let gallery = state.try_get_slice::<Gallery>()?;
    let rows = gallery.repository.public_in_category(category.to_string(), limit).await?;
    Ok(ApiResponse::with_message(
        "Images fetched successfully",
        rows.into_iter().map(ImageRow::into_image).collect(),
    ))
}

#[api_handler(
    get,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = OK, description = "The image; its view count is incremented", body = ApiResponse<Image>),
        (status = NOT_FOUND, description = "No such image", body = ErrorBody),
    ),
    tag = TAG_IMAGES,
)]
pub(crate) async fn get_image(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<ApiResponse<Image>> {
    let uid = ResourceGuard::verify(&id, IMAGE)?;
    let gallery = state.try_get_slice::<Gallery>()?;
    let row = gallery.repository.viewed(&uid).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Image fetched successfully", row.into_image()))
}

#[api_handler(
    post,
    path = "/api/images/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = CREATED, description = "Image stored", body = ApiResponse<Image>),
        (status = BAD_REQUEST, description = "Missing file, unsupported type or invalid fields", body = ErrorBody),
        (status = PAYLOAD_TOO_LARGE, description = "File exceeds the upload limit", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_IMAGES,
)]
pub(crate) async fn upload_image(
    State(state): State<ApiState>,
    admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, ApiResponse<Image>)> {
    let gallery = state.try_get_slice::<Gallery>()?;
    let upload = read_upload(multipart, gallery.store.max_object_size()).await?;

    let uid = safe_nanoid!();
    let filename = format!("{uid}.{}", upload.kind.extension());
    let name = ObjectName::parse(&filename).map_err(crate::GalleryError::from)?;
    let stored = gallery.store.put(&gallery.bucket, &name, &upload.data).await.map_err(crate::GalleryError::from)?;

    let now = timestamp();
    let row = ImageRow {
        uid,
        title: upload.title,
        description: upload.description,
        url: format!("{UPLOADS_ROUTE}/{filename}"),
        filename,
        original_name: upload.original_name,
        mimetype: upload.kind.mime().to_owned(),
        size: i64::try_from(stored.size).unwrap_or(i64::MAX),
        tags: upload.tags,
        category: upload.category.to_string(),
        is_public: upload.is_public,
        views: 0,
        uploaded_by: admin.id().to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };

    if let Err(err) = gallery.repository.create(row.clone()).await {
        if let Err(cleanup) = gallery.store.remove(&gallery.bucket, &name).await {
            tracing::warn!(object = %name, error = %cleanup, "Failed to discard orphaned upload");
        }
        return Err(err.into());
    }
    tracing::info!(image = %row.uid, size = stored.size, mimetype = %row.mimetype, "Image uploaded");

    Ok((StatusCode::CREATED, ApiResponse::with_message("Image uploaded successfully", row.into_image())))
}

#[api_handler(
    put,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image id")),
    request_body = ImageUpdate,
    responses(
        (status = OK, description = "Metadata updated", body = ApiResponse<Image>),
        (status = NOT_FOUND, description = "No such image", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_IMAGES,
)]
pub(crate) async fn update_image(
    State(state): State<ApiState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ImageUpdate>,
) -> ApiResult<ApiResponse<Image>> {
    let uid = ResourceGuard::verify(&id, IMAGE)?;
    let update = body.normalized();
    update.validate()?;

    let gallery = state.try_get_slice::<Gallery>()?;
    let mut row = gallery.repository.find(&uid).await?.ok_or_else(not_found)?;
    row.apply(update);
    row.updated_at = timestamp();
    gallery.repository.replace(row.clone()).await?;

    Ok(ApiResponse::with_message("Image updated successfully", row.into_image()))
}

#[api_handler(
    delete,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = OK, description = "Image and its file deleted"),
        (status = NOT_FOUND, description = "No such image", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_IMAGES,
)]
pub(crate) async fn delete_image(
    State(state): State<ApiState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let uid = ResourceGuard::verify(&id, IMAGE)?;
    let gallery = state.try_get_slice::<Gallery>()?;
    let row = gallery.repository.find(&uid).await?.ok_or_else(not_found)?;
    gallery.repository.delete(&uid).await?;

    match ObjectName::parse(&row.filename) {
        Ok(name) => match gallery.store.remove(&gallery.bucket, &name).await {
            Ok(true) => {},
            Ok(false) => tracing::warn!(image = %uid, file = %row.filename, "Image file was already gone"),
            Err(err) => tracing::warn!(image = %uid, error = %err, "Failed to remove image file"),
        },
        Err(err) => tracing::warn!(image = %uid, error = %err, "Stored filename is not a valid object name"),
    }

    Ok(ApiResponse::message("Image deleted successfully"))
}

#[api_handler(
    get,
    path = "/uploads/{file}",
    params(("file" = String, Path, description = "Stored file name")),
    responses(
        (status = OK, description = "File content", content_type = "application/octet-stream"),
        (status = NOT_FOUND, description = "No such file", body = ErrorBody),
    ),
    tag = TAG_IMAGES,
)]
pub(crate) async fn serve_upload(State(state): State<ApiState>, Path(file): Path<String>) -> ApiResult<Response> {
    let missing = || ApiError::not_found("File not found");
    let name = ObjectName::parse(&file).map_err(|_| missing())?;

    let gallery = state.try_get_slice::<Gallery>()?;
    let path = gallery.store.locate(&gallery.bucket, &name).map_err(crate::GalleryError::from)?;
    let handle = match tokio::fs::File::open(&path).await {
        Ok(handle) => handle,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(missing()),
        Err(err) => {
            return Err(ApiError::Internal { message: err.to_string().into(), context: Some("opening upload".into()) });
        },
    };
    let length = handle.metadata().await.ok().map(|meta| meta.len());

    let mime = name.extension().as_deref().and_then(ImageKind::from_extension).map_or("application/octet-stream", ImageKind::mime);
    let mut response = Body::from_stream(ReaderStream::new(handle)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=86400"));
    if let Some(length) = length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    Ok(response)
}
