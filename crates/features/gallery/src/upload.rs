//! Reads the upload form out of a multipart body.

use crate::kind::ImageKind;
use crate::model::{split_tags, validate_text};
use axum::extract::Multipart;
use folio_domain::models::ImageCategory;
use folio_kernel::error::ApiError;

const FILE_FIELD: &str = "image";
pub(crate) const UNSUPPORTED_TYPE: &str = "Only image files are allowed (jpeg, png, gif, webp)";

/// A received file with its accompanying metadata fields.
#[derive(Debug)]
pub(crate) struct Upload {
    pub kind: ImageKind,
    pub data: Vec<u8>,
    pub original_name: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: ImageCategory,
    pub is_public: bool,
}

#[derive(Debug, Default)]
struct Fields {
    file: Option<(String, Vec<u8>)>,
    title: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    category: Option<String>,
    is_public: Option<String>,
}

fn malformed(err: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("Malformed upload: {err}"))
}

/// Drains the form. The file must be under `max_bytes` and an accepted image format.
///
/// # Errors
/// Bad request for a missing file, an unsupported format, an unknown category or invalid text,
/// payload too large when the file exceeds the limit.
pub(crate) async fn read_upload(mut multipart: Multipart, max_bytes: u64) -> Result<Upload, ApiError> {
    let mut fields = Fields::default();
    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or("upload").to_owned();
            let mut data = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(malformed)? {
                data.extend_from_slice(&chunk);
                if data.len() as u64 > max_bytes {
                    return Err(ApiError::payload_too_large(format!("File exceeds {max_bytes} bytes")));
                }
            }
            fields.file = Some((file_name, data));
            continue;
        }

        let value = field.text().await.map_err(malformed)?;
        let slot = match name.as_str() {
            "title" => &mut fields.title,
            "description" => &mut fields.description,
            "tags" => &mut fields.tags,
            "category" => &mut fields.category,
            "isPublic" => &mut fields.is_public,
            _ => continue,
        };
        *slot = Some(value.trim().to_owned());
    }

    let Some((original_name, data)) = fields.file.filter(|(_, data)| !data.is_empty()) else {
        return Err(ApiError::bad_request("No file uploaded"));
    };
    let kind = ImageKind::sniff(&data).ok_or_else(|| ApiError::bad_request(UNSUPPORTED_TYPE))?;

    let category = match fields.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => category.parse().map_err(|_| ApiError::bad_request("Invalid category"))?,
        None => ImageCategory::default(),
    };
    let is_public = match fields.is_public.as_deref().filter(|p| !p.is_empty()) {
        Some(flag) => flag.parse().map_err(|_| ApiError::bad_request("isPublic must be true or false"))?,
        None => true,
    };

    let title = fields.title.filter(|t| !t.is_empty()).unwrap_or_else(|| original_name.chars().take(100).collect());
    let description = fields.description.unwrap_or_default();
    validate_text(Some(&title), Some(&description))?;

    Ok(Upload {
        kind,
        data,
        original_name,
        title,
        description,
        tags: fields.tags.as_deref().map(|tags| split_tags(tags.split(','))).unwrap_or_default(),
        category,
        is_public,
    })
}
