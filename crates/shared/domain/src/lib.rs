//! # Domain Models
//!
//! Pure data shared across folio crates: configuration, entity enums, the settings document and
//! the slice registry. Dependencies are limited to `serde`, `bitflags` and `strum`.
//! No I/O or networking here.

pub mod config;
pub mod constants;
pub mod models;
pub mod registry;
pub mod settings;
