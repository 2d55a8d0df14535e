//! Identity feature slice: accounts with argon2 password hashes, HS256 access tokens and the
//! [`AuthUser`] / [`AdminUser`] extractors other slices use to guard their routes.

mod error;
mod extract;
mod handlers;
mod model;
mod password;
mod repository;
mod service;
mod token;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::extract::{AdminUser, AuthUser};
pub use crate::model::{
    AccountProfile, AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
pub use crate::token::{Claims, TokenService};

use crate::repository::AccountRepository;
use folio_database::{Database, Migration};
use folio_kernel::domain::config::ApiConfig;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Schema scripts owned by this slice.
pub const MIGRATIONS: &[Migration] =
    &[Migration::new("identity", "0001", include_str!("../migrations/0001_init.surql"))];

/// Identity feature state
#[folio_derive::folio_slice]
pub struct Identity {
    accounts: AccountRepository,
    tokens: TokenService,
}

impl Identity {
    /// Token service, for callers that need to mint tokens outside a request (tests, tooling).
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

/// Initialize the identity feature and seed the configured administrator.
///
/// # Errors
/// Returns [`IdentityError::Config`] for an unusable JWT secret or admin seed and storage errors
/// from the seeding queries.
pub async fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, IdentityError> {
    let slice = Identity::new(IdentityInner {
        accounts: AccountRepository::new(database.clone()),
        tokens: TokenService::new(&config.security.jwt)?,
    });

    if let Some(seed) = &config.security.admin {
        slice.seed_admin(seed).await.context("seeding administrator")?;
    }

    tracing::info!("Identity slice initialized");
    Ok(InitializedSlice::new(slice))
}

/// Routes under `/api/auth`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::register))
        .routes(routes!(handlers::login))
        .routes(routes!(handlers::me))
        .routes(routes!(handlers::update_profile))
        .routes(routes!(handlers::change_password))
}
