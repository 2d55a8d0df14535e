//! Projects feature slice: the portfolio entries, with public listing, a featured shelf,
//! view and like counters, and admin-only writes.

mod error;
mod handlers;
mod model;
mod repository;

pub use crate::error::{ProjectError, ProjectErrorExt};
pub use crate::model::{LikeResult, Project, ProjectInput, ProjectListQuery};

use crate::repository::ProjectRepository;
use folio_database::{Database, Migration};
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Schema scripts owned by this slice.
pub const MIGRATIONS: &[Migration] =
    &[Migration::new("projects", "0001", include_str!("../migrations/0001_init.surql"))];

/// Projects feature state
#[folio_derive::folio_slice]
pub struct Projects {
    repository: ProjectRepository,
}

/// Initialize the projects feature.
///
/// # Errors
/// Currently never fails.
pub fn init(database: &Database) -> Result<InitializedSlice, ProjectError> {
    let slice = Projects::new(ProjectsInner { repository: ProjectRepository::new(database.clone()) });

    tracing::info!("Projects slice initialized");
    Ok(InitializedSlice::new(slice))
}

/// Routes under `/api/projects`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_projects, handlers::create_project))
        .routes(routes!(handlers::featured_projects))
        .routes(routes!(handlers::get_project, handlers::update_project, handlers::delete_project))
        .routes(routes!(handlers::like_project))
}
