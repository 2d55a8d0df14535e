use folio_derive::api_model;
use folio_domain::models::ProjectStatus;
use folio_kernel::validation::{Validator, is_hex_color};
use surrealdb::types::SurrealValue;

pub(crate) const DEFAULT_COLOR: &str = "#00ff88";

/// Stored form of a project. `position` backs the API's `order` field.
#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct ProjectRow {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub github: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
    pub position: i64,
    pub status: String,
    pub views: i64,
    pub likes: i64,
    pub color: String,
    pub result_metrics: Vec<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectRow {
    pub(crate) fn into_project(self) -> Project {
        Project {
            status: self.status.parse().unwrap_or_default(),
            id: self.uid,
            title: self.title,
            description: self.description,
            url: self.url,
            github: self.github,
            thumbnail: self.thumbnail,
            images: self.images,
            tags: self.tags,
            technologies: self.technologies,
            featured: self.featured,
            order: self.position,
            views: self.views,
            likes: self.likes,
            color: self.color,
            result_metrics: self.result_metrics,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Overwrites every field the input supplies.
    pub(crate) fn apply(&mut self, input: ProjectInput) {
        self.title = input.title;
        self.description = input.description;
        self.url = input.url;
        if let Some(github) = input.github {
            self.github = Some(github).filter(|g| !g.is_empty());
        }
        if let Some(thumbnail) = input.thumbnail {
            self.thumbnail = Some(thumbnail).filter(|t| !t.is_empty());
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        if let Some(technologies) = input.technologies {
            self.technologies = technologies;
        }
        if let Some(featured) = input.featured {
            self.featured = featured;
        }
        if let Some(order) = input.order {
            self.position = order;
        }
        if let Some(status) = input.status {
            self.status = status.to_string();
        }
        if let Some(color) = input.color {
            self.color = color;
        }
        if let Some(metrics) = input.result_metrics {
            self.result_metrics = metrics;
        }
    }
}

/// A portfolio project.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub github: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
    pub order: i64,
    #[schema(value_type = String, example = "active")]
    pub status: ProjectStatus,
    pub views: i64,
    pub likes: i64,
    pub color: String,
    pub result_metrics: Vec<String>,
    /// Account id of the author.
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Create and update payload. On update, absent optional fields keep their stored values.
#[api_model]
#[derive(Clone, Default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub url: String,
    pub github: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    #[schema(value_type = Option<String>)]
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub result_metrics: Option<Vec<String>>,
}

fn trimmed_list(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.map(|items| items.into_iter().map(|item| item.trim().to_owned()).filter(|item| !item.is_empty()).collect())
}

impl ProjectInput {
    /// Trims text fields and drops blank list entries.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            url: self.url.trim().to_owned(),
            github: self.github.map(|g| g.trim().to_owned()),
            thumbnail: self.thumbnail.map(|t| t.trim().to_owned()),
            images: trimmed_list(self.images),
            tags: trimmed_list(self.tags),
            technologies: trimmed_list(self.technologies),
            color: self.color.map(|c| c.trim().to_owned()),
            result_metrics: trimmed_list(self.result_metrics),
            ..self
        }
    }

    /// # Errors
    /// Returns the validation error listing every invalid field.
    pub fn validate(&self) -> Result<(), folio_kernel::error::ApiError> {
        let mut validator = Validator::new();
        validator
            .length("title", &self.title, 1, 100, "Title must be between 1 and 100 characters")
            .length("description", &self.description, 1, 1000, "Description must be between 1 and 1000 characters")
            .url("url", &self.url, "Please provide a valid URL");
        if let Some(github) = self.github.as_deref().filter(|g| !g.is_empty()) {
            validator.url("github", github, "Please provide a valid GitHub URL");
        }
        if let Some(color) = &self.color {
            validator.check(is_hex_color(color), "color", "Please provide a valid hex color");
        }
        if let Some(metrics) = &self.result_metrics {
            validator.check(
                metrics.iter().all(|metric| metric.chars().count() <= 100),
                "resultMetrics",
                "Metric too long",
            );
        }
        validator.finish()
    }
}

/// Filters for `GET /api/projects`.
#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct ProjectListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    /// Comma separated; matches projects carrying any of them.
    pub tags: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Field name, `-` prefix for descending. Defaults to `-createdAt`.
    pub sort: Option<String>,
}

#[api_model]
pub struct LikeResult {
    pub likes: i64,
}
