use crate::Leads;
use crate::model::{Lead, LeadListQuery, LeadRow, LeadStatusRequest, NewLeadRequest};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_derive::api_handler;
use folio_domain::constants::{LEAD, TAG_LEADS};
use folio_domain::models::LeadStatus;
use folio_identity::AdminUser;
use folio_kernel::prelude::*;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[api_handler(
    post,
    path = "/api/leads",
    request_body = NewLeadRequest,
    responses(
        (status = CREATED, description = "Lead stored", body = ApiResponse<Lead>),
        (status = BAD_REQUEST, description = "Missing or invalid fields", body = ErrorBody),
    ),
    tag = TAG_LEADS,
)]
pub(crate) async fn submit_lead(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<NewLeadRequest>,
) -> ApiResult<(StatusCode, ApiResponse<Lead>)> {
    let lead = body.validate()?;

    let now = timestamp();
    let row = LeadRow {
        uid: safe_nanoid!(),
        name: lead.name,
        email: lead.email,
        budget: lead.budget,
        message: lead.message,
        source: lead.source,
        status: LeadStatus::default().to_string(),
        created_at: now.clone(),
        updated_at: now,
    };

    let leads = state.try_get_slice::<Leads>()?;
    leads.repository.create(row.clone()).await?;
    tracing::info!(lead = %row.uid, source = %row.source, "Lead submitted");

    Ok((StatusCode::CREATED, ApiResponse::with_message("Lead submitted successfully", row.into_lead())))
}

#[api_handler(
    get,
    path = "/api/leads",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("limit" = Option<u32>, Query, description = "1..=100, default 20"),
        ("status" = Option<String>, Query, description = "new, contacted, won or lost"),
    ),
    responses(
        (status = OK, description = "One page of leads, newest first", body = Paginated<Lead>),
        (status = BAD_REQUEST, description = "Invalid paging", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_LEADS,
)]
pub(crate) async fn list_leads(
    State(state): State<ApiState>,
    _admin: AdminUser,
    QueryParams(query): QueryParams<LeadListQuery>,
) -> ApiResult<Paginated<Lead>> {
    let page = PageRequest::checked(query.page, query.limit, DEFAULT_PAGE_SIZE)?;

    let leads = state.try_get_slice::<Leads>()?;
    let (rows, total) = leads.repository.list(query.status.map(|s| s.to_string()), page).await?;
    Ok(Paginated::new(rows.into_iter().map(LeadRow::into_lead).collect(), Pagination::new(page, total)))
}

#[api_handler(
    put,
    path = "/api/leads/{id}/status",
    params(("id" = String, Path, description = "Lead id")),
    request_body = LeadStatusRequest,
    responses(
        (status = OK, description = "Status changed", body = ApiResponse<Lead>),
        (status = BAD_REQUEST, description = "Unknown status", body = ErrorBody),
        (status = NOT_FOUND, description = "No such lead", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_LEADS,
)]
pub(crate) async fn update_lead_status(
    State(state): State<ApiState>,
    admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<LeadStatusRequest>,
) -> ApiResult<ApiResponse<Lead>> {
    let uid = ResourceGuard::verify(&id, LEAD)?;
    let status = body.status()?;

    let leads = state.try_get_slice::<Leads>()?;
    let row = leads
        .repository
        .set_status(&uid, status.to_string(), timestamp())
        .await?
        .ok_or_else(|| ApiError::not_found("Lead not found"))?;
    tracing::info!(lead = %uid, %status, by = %admin.id(), "Lead status updated");

    Ok(ApiResponse::with_message("Lead status updated", row.into_lead()))
}
