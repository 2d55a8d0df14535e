//! Leads feature slice: the public contact form and the admin inbox behind it.

mod error;
mod handlers;
mod model;
mod repository;

pub use crate::error::{LeadError, LeadErrorExt};
pub use crate::model::{Lead, LeadListQuery, LeadStatusRequest, NewLeadRequest};

use crate::repository::LeadRepository;
use folio_database::{Database, Migration};
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] = &[Migration::new("leads", "0001", include_str!("../migrations/0001_init.surql"))];

#[folio_derive::folio_slice]
pub struct Leads {
    repository: LeadRepository,
}

/// Initialize the leads feature.
///
/// # Errors
/// Currently never fails.
pub fn init(database: &Database) -> Result<InitializedSlice, LeadError> {
    let slice = Leads::new(LeadsInner { repository: LeadRepository::new(database.clone()) });

    tracing::info!("Leads slice initialized");
    Ok(InitializedSlice::new(slice))
}

/// Routes under `/api/leads`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submit_lead, handlers::list_leads))
        .routes(routes!(handlers::update_lead_status))
}
