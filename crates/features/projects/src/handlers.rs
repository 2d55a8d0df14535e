use crate::Projects;
use crate::model::{DEFAULT_COLOR, LikeResult, Project, ProjectInput, ProjectListQuery, ProjectRow};
use crate::repository::{Counter, ProjectFilter};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_derive::api_handler;
use folio_domain::constants::{PROJECT, TAG_PROJECTS};
use folio_identity::AdminUser;
use folio_kernel::prelude::*;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// API sort names and the stored fields behind them.
const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("title", "title"),
    ("order", "position"),
    ("views", "views"),
    ("likes", "likes"),
    ("status", "status"),
    ("featured", "featured"),
];

fn not_found() -> ApiError {
    ApiError::not_found("Project not found")
}

#[api_handler(
    get,
    path = "/api/projects",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("limit" = Option<u32>, Query, description = "1..=100, default 10"),
        ("status" = Option<String>, Query, description = "active, archived or draft"),
        ("featured" = Option<bool>, Query),
        ("tags" = Option<String>, Query, description = "Comma separated, matches any"),
        ("search" = Option<String>, Query, description = "Substring of title or description"),
        ("sort" = Option<String>, Query, description = "createdAt, updatedAt, title, order, views, likes, status or featured; '-' for descending"),
    ),
    responses(
        (status = OK, description = "One page of projects", body = Paginated<Project>),
        (status = BAD_REQUEST, description = "Invalid paging or sort", body = ErrorBody),
    ),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn list_projects(
    State(state): State<ApiState>,
    QueryParams(query): QueryParams<ProjectListQuery>,
) -> ApiResult<Paginated<Project>> {
    let page = PageRequest::checked(query.page, query.limit, DEFAULT_PAGE_SIZE)?;
    let sort = Sort::parse(query.sort.as_deref(), "-createdAt", SORT_FIELDS)?;

    let projects = state.try_get_slice::<Projects>()?;
    let (rows, total) = projects.repository.list(ProjectFilter::from_query(&query), sort, page).await?;
    Ok(Paginated::new(rows.into_iter().map(ProjectRow::into_project).collect(), Pagination::new(page, total)))
}

#[api_handler(
    get,
    path = "/api/projects/featured",
    responses((status = OK, description = "Up to six active featured projects", body = ApiResponse<Vec<Project>>)),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn featured_projects(State(state): State<ApiState>) -> ApiResult<ApiResponse<Vec<Project>>> {
    let projects = state.try_get_slice::<Projects>()?;
    let rows = projects.repository.featured().await?;
    Ok(ApiResponse::with_message(
        "Featured projects fetched successfully",
        rows.into_iter().map(ProjectRow::into_project).collect(),
    ))
}

#[api_handler(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = OK, description = "The project; its view count is incremented", body = ApiResponse<Project>),
        (status = NOT_FOUND, description = "No such project", body = ErrorBody),
    ),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn get_project(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Project>> {
    let uid = ResourceGuard::verify(&id, PROJECT)?;
    let projects = state.try_get_slice::<Projects>()?;
    let row = projects.repository.bump(&uid, Counter::Views).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Project fetched successfully", row.into_project()))
}

#[api_handler(
    post,
    path = "/api/projects/{id}/like",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = OK, description = "New like count", body = ApiResponse<LikeResult>),
        (status = NOT_FOUND, description = "No such project", body = ErrorBody),
    ),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn like_project(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<LikeResult>> {
    let uid = ResourceGuard::verify(&id, PROJECT)?;
    let projects = state.try_get_slice::<Projects>()?;
    let row = projects.repository.bump(&uid, Counter::Likes).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Project liked successfully", LikeResult { likes: row.likes }))
}

#[api_handler(
    post,
    path = "/api/projects",
    request_body = ProjectInput,
    responses(
        (status = CREATED, description = "Project created", body = ApiResponse<Project>),
        (status = BAD_REQUEST, description = "Invalid input", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn create_project(
    State(state): State<ApiState>,
    admin: AdminUser,
    JsonBody(body): JsonBody<ProjectInput>,
) -> ApiResult<(StatusCode, ApiResponse<Project>)> {
    let input = body.normalized();
    input.validate()?;

    let now = timestamp();
    let mut row = ProjectRow {
        uid: safe_nanoid!(),
        title: String::new(),
        description: String::new(),
        url: String::new(),
        github: None,
        thumbnail: None,
        images: Vec::new(),
        tags: Vec::new(),
        technologies: Vec::new(),
        featured: false,
        position: 0,
        status: folio_domain::models::ProjectStatus::default().to_string(),
        views: 0,
        likes: 0,
        color: DEFAULT_COLOR.to_owned(),
        result_metrics: Vec::new(),
        created_by: admin.id().to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };
    row.apply(input);

    let projects = state.try_get_slice::<Projects>()?;
    projects.repository.create(row.clone()).await?;
    tracing::info!(project = %row.uid, "Project created");

    Ok((StatusCode::CREATED, ApiResponse::with_message("Project created successfully", row.into_project())))
}

#[api_handler(
    put,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = OK, description = "Project updated", body = ApiResponse<Project>),
        (status = NOT_FOUND, description = "No such project", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn update_project(
    State(state): State<ApiState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ProjectInput>,
) -> ApiResult<ApiResponse<Project>> {
    let uid = ResourceGuard::verify(&id, PROJECT)?;
    let input = body.normalized();
    input.validate()?;

    let projects = state.try_get_slice::<Projects>()?;
    let mut row = projects.repository.find(&uid).await?.ok_or_else(not_found)?;
    row.apply(input);
    row.updated_at = timestamp();
    projects.repository.replace(row.clone()).await?;

    Ok(ApiResponse::with_message("Project updated successfully", row.into_project()))
}

#[api_handler(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = OK, description = "Project deleted"),
        (status = NOT_FOUND, description = "No such project", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_PROJECTS,
)]
pub(crate) async fn delete_project(
    State(state): State<ApiState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let uid = ResourceGuard::verify(&id, PROJECT)?;
    let projects = state.try_get_slice::<Projects>()?;
    projects.repository.find(&uid).await?.ok_or_else(not_found)?;
    projects.repository.delete(&uid).await?;
    Ok(ApiResponse::message("Project deleted successfully"))
}
