use crate::Settings;
use crate::model::{BulkConfigRequest, BulkConfigResult, ConfigListQuery, ConfigRecord, SetConfigRequest, SettingChange};
use axum::extract::{Path, State};
use folio_customize::InjectionPlan;
use folio_derive::api_handler;
use folio_domain::constants::{TAG_CONFIG, TAG_SITE};
use folio_identity::{AdminUser, AuthUser};
use folio_kernel::prelude::*;
use serde_json::{Map, Value};

const MAX_KEY_LEN: usize = 100;

#[api_handler(
    get,
    path = "/api/config/public/all",
    responses((status = OK, description = "Flat key/value object of every public setting, ordered by key")),
    tag = TAG_CONFIG,
)]
pub(crate) async fn public_settings(State(state): State<ApiState>) -> ApiResult<ApiResponse<Map<String, Value>>> {
    let settings = state.try_get_slice::<Settings>()?;
    let values = settings.repository.public_values().await?;
    Ok(ApiResponse::with_message("Public configs fetched successfully", values))
}

#[api_handler(
    get,
    path = "/api/config",
    params(("category" = Option<String>, Query, description = "general, social, seo, api, theme or other")),
    responses(
        (status = OK, description = "Records sorted by category then key", body = ApiResponse<Vec<ConfigRecord>>),
        (status = FORBIDDEN, description = "Admin only", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_CONFIG,
)]
pub(crate) async fn list_settings(
    State(state): State<ApiState>,
    _admin: AdminUser,
    QueryParams(query): QueryParams<ConfigListQuery>,
) -> ApiResult<ApiResponse<Vec<ConfigRecord>>> {
    let settings = state.try_get_slice::<Settings>()?;
    let records = settings
        .repository
        .list(query.category)
        .await?
        .into_iter()
        .map(crate::model::SettingRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiResponse::with_message("Configs fetched successfully", records))
}

#[api_handler(
    get,
    path = "/api/config/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = OK, description = "The record", body = ApiResponse<ConfigRecord>),
        (status = UNAUTHORIZED, description = "Record is private", body = ErrorBody),
        (status = NOT_FOUND, description = "No such key", body = ErrorBody),
    ),
    tag = TAG_CONFIG,
)]
pub(crate) async fn get_setting(
    State(state): State<ApiState>,
    user: Option<AuthUser>,
    Path(key): Path<String>,
) -> ApiResult<ApiResponse<ConfigRecord>> {
    let settings = state.try_get_slice::<Settings>()?;
    let row = settings.repository.find(&key).await?.ok_or_else(|| ApiError::not_found("Config not found"))?;
    if !row.is_public && user.is_none() {
        return Err(ApiError::unauthorized("Unauthorized"));
    }
    Ok(ApiResponse::with_message("Config fetched successfully", row.into_record()?))
}

#[api_handler(
    post,
    path = "/api/config",
    request_body = SetConfigRequest,
    responses(
        (status = OK, description = "Record created or updated", body = ApiResponse<ConfigRecord>),
        (status = BAD_REQUEST, description = "Invalid payload", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_CONFIG,
)]
pub(crate) async fn set_setting(
    State(state): State<ApiState>,
    _admin: AdminUser,
    JsonBody(body): JsonBody<SetConfigRequest>,
) -> ApiResult<ApiResponse<ConfigRecord>> {
    let key = body.key.trim().to_owned();
    Validator::new()
        .length("key", &key, 1, MAX_KEY_LEN, "Key must be between 1 and 100 characters")
        .check(!body.value.is_null(), "value", "Value is required")
        .finish()?;

    let settings = state.try_get_slice::<Settings>()?;
    let row = settings
        .repository
        .upsert(SettingChange {
            key,
            value: body.value,
            description: body.description,
            category: body.category,
            is_public: body.is_public,
        })
        .await?;
    Ok(ApiResponse::with_message("Config saved successfully", row.into_record()?))
}

#[api_handler(
    post,
    path = "/api/config/bulk",
    request_body = BulkConfigRequest,
    responses(
        (status = OK, description = "Number of records written", body = ApiResponse<BulkConfigResult>),
        (status = BAD_REQUEST, description = "Empty or entirely invalid batch", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_CONFIG,
)]
pub(crate) async fn bulk_set_settings(
    State(state): State<ApiState>,
    _admin: AdminUser,
    JsonBody(body): JsonBody<BulkConfigRequest>,
) -> ApiResult<ApiResponse<BulkConfigResult>> {
    let items = body.configs.filter(|items| !items.is_empty()).ok_or_else(|| {
        ApiError::bad_request("configs must be a non-empty array")
    })?;
    let changes: Vec<SettingChange> = items.iter().filter_map(SettingChange::from_bulk_item).collect();
    if changes.is_empty() {
        return Err(ApiError::bad_request("No valid config items provided"));
    }

    let settings = state.try_get_slice::<Settings>()?;
    let count = changes.len();
    for change in changes {
        settings.repository.upsert(change).await?;
    }
    Ok(ApiResponse::with_message("Configs saved successfully", BulkConfigResult { count }))
}

#[api_handler(
    delete,
    path = "/api/config/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = OK, description = "Record deleted"),
        (status = NOT_FOUND, description = "No such key", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_CONFIG,
)]
pub(crate) async fn delete_setting(
    State(state): State<ApiState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let settings = state.try_get_slice::<Settings>()?;
    if !settings.repository.delete(&key).await? {
        return Err(ApiError::not_found("Config not found"));
    }
    Ok(ApiResponse::message("Config deleted successfully"))
}

#[api_handler(
    get,
    path = "/api/site/injection",
    responses((status = OK, description = "Blocks the site shell injects, in insertion order", body = ApiResponse<InjectionPlan>)),
    tag = TAG_SITE,
)]
pub(crate) async fn injection_plan(State(state): State<ApiState>) -> ApiResult<ApiResponse<InjectionPlan>> {
    let settings = state.try_get_slice::<Settings>()?;
    Ok(ApiResponse::ok(settings.current_plan().await))
}
