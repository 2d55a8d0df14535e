use folio_derive::api_model;
use folio_domain::models::ImageCategory;
use folio_kernel::error::ApiError;
use folio_kernel::validation::Validator;
use serde::Deserialize;
use surrealdb::types::SurrealValue;
use utoipa::ToSchema;

#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct ImageRow {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: i64,
    pub url: String,
    pub tags: Vec<String>,
    pub category: String,
    pub is_public: bool,
    pub views: i64,
    pub uploaded_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ImageRow {
    pub(crate) fn into_image(self) -> Image {
        Image {
            category: self.category.parse().unwrap_or_default(),
            id: self.uid,
            title: self.title,
            description: self.description,
            filename: self.filename,
            original_name: self.original_name,
            mimetype: self.mimetype,
            size: self.size,
            url: self.url,
            tags: self.tags,
            is_public: self.is_public,
            views: self.views,
            uploaded_by: self.uploaded_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn apply(&mut self, update: ImageUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(tags) = update.tags {
            self.tags = tags.into_list();
        }
        if let Some(category) = update.category {
            self.category = category.to_string();
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
    }
}

/// Metadata of an uploaded image.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Stored object name under `/uploads`.
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: i64,
    pub url: String,
    pub tags: Vec<String>,
    #[schema(value_type = String, example = "gallery")]
    pub category: ImageCategory,
    pub is_public: bool,
    pub views: i64,
    /// Account id of the uploader.
    pub uploaded_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Tags as a JSON list or a comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Csv(String),
}

impl TagList {
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(tags) => split_tags(tags.iter().map(String::as_str)),
            Self::Csv(tags) => split_tags(tags.split(',')),
        }
    }
}

pub(crate) fn split_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.map(str::trim).filter(|tag| !tag.is_empty()).map(str::to_owned).collect()
}

/// Metadata changes; absent fields are kept.
#[api_model]
#[derive(Default)]
pub struct ImageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagList>,
    #[schema(value_type = Option<String>)]
    pub category: Option<ImageCategory>,
    pub is_public: Option<bool>,
}

impl ImageUpdate {
    /// Trims text and ignores a blank title.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
            description: self.description.map(|d| d.trim().to_owned()),
            ..self
        }
    }

    /// # Errors
    /// Returns the validation error listing every invalid field.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_text(self.title.as_deref(), self.description.as_deref())
    }
}

pub(crate) fn validate_text(title: Option<&str>, description: Option<&str>) -> Result<(), ApiError> {
    let mut validator = Validator::new();
    if let Some(title) = title {
        validator.length("title", title, 1, 100, "Title cannot exceed 100 characters");
    }
    if let Some(description) = description {
        validator.length("description", description, 0, 500, "Description cannot exceed 500 characters");
    }
    validator.finish()
}

/// Filters for `GET /api/images`.
#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct ImageListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub category: Option<ImageCategory>,
    /// Comma separated; matches images carrying any of them.
    pub tags: Option<String>,
    pub is_public: Option<bool>,
    /// Field name, `-` prefix for descending. Defaults to `-createdAt`.
    pub sort: Option<String>,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct CategoryQuery {
    pub limit: Option<u32>,
}

/// Multipart form of `POST /api/images/upload`. Documentation only; the handler reads the
/// fields itself.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub(crate) struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accept_both_shapes() {
        assert_eq!(TagList::Csv(" neon, ,grid ".to_owned()).into_list(), vec!["neon", "grid"]);
        let list: TagList = serde_json::from_str(r#"["a", " b "]"#).expect("list");
        assert_eq!(list.into_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut row = ImageRow {
            uid: "i1".to_owned(),
            title: "Old".to_owned(),
            description: "Keep".to_owned(),
            filename: "i1.png".to_owned(),
            original_name: "old.png".to_owned(),
            mimetype: "image/png".to_owned(),
            size: 10,
            url: "/uploads/i1.png".to_owned(),
            tags: vec!["x".to_owned()],
            category: "gallery".to_owned(),
            is_public: true,
            views: 4,
            uploaded_by: "a1".to_owned(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let update = ImageUpdate {
            title: Some("  ".to_owned()),
            category: Some(ImageCategory::Hero),
            is_public: Some(false),
            ..ImageUpdate::default()
        }
        .normalized();
        row.apply(update);

        assert_eq!(row.title, "Old");
        assert_eq!(row.description, "Keep");
        assert_eq!(row.category, "hero");
        assert!(!row.is_public);
        assert_eq!(row.views, 4);
    }

    #[test]
    fn test_long_text_is_rejected() {
        assert!(validate_text(Some(&"t".repeat(101)), None).is_err());
        assert!(validate_text(None, Some(&"d".repeat(501))).is_err());
        assert!(validate_text(Some("Sunset"), Some("")).is_ok());
    }
}
