pub mod health;
pub mod router;
pub mod state;

pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
