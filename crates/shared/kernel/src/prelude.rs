//! Common imports for feature slices.

pub use crate::error::{ApiError, ApiResult, ErrorBody, FieldError};
pub use crate::extract::{JsonBody, QueryParams};
pub use crate::pagination::{PageRequest, Paginated, Pagination, Sort};
pub use crate::response::ApiResponse;
pub use crate::safe_nanoid;
pub use crate::security::resource::ResourceGuard;
pub use crate::server::ApiState;
pub use crate::timestamp;
pub use crate::validation::Validator;
