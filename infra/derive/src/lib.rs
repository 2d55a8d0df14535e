#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros used across the folio workspace: error enums, API models and handlers,
//! feature slice handles and the runtime bootstrap for binaries.
//!
//! The examples below are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a plain `fn main` running on a `folio_runtime` profile.
///
/// # Arguments
///
/// * `server` - Multi-threaded runtime sized for the HTTP server.
/// * `cli` - Small runtime for short-lived command line tools.
/// * no argument - Library defaults.
///
/// # Examples
///
/// ```rust,ignore
/// #[folio_runtime::main(server)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data transfer type.
///
/// Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when they are not derived
/// already, applies `rename_all = "camelCase"` and, for structs, `deny_unknown_fields`.
///
/// # Arguments
///
/// * `rename_all = "..."` - Overrides the serde rename policy.
/// * `deny_unknown_fields = false` - Accepts unknown fields (structs only).
///
/// # Example
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct ListQuery {
///     pub page: Option<u32>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an axum handler with `utoipa::path`.
///
/// Accepts the usual `utoipa::path` arguments (`get`, `post`, `path = "..."`, `params(...)`,
/// `responses(...)`, `tag = "..."`).
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)), tag = "System")]
/// pub async fn health() -> Json<HealthResponse> { ... }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Declares an error enum wired for `thiserror` and contextual error chaining.
///
/// Every variant must use named fields. A variant holding an upstream error names it
/// `source` (or marks it `#[source]` / `#[from]`) and must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for `Result<T, Source>`.
/// * `From<Source>` for each source-carrying variant.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper usable from `#[error(...)]` strings.
///
/// # Example
///
/// ```rust,ignore
/// use folio_derive::folio_error;
/// use std::borrow::Cow;
///
/// #[folio_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn folio_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}

/// Declares a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is a cheap `Arc` wrapper that derefs to
/// it and implements `folio_kernel::domain::registry::FeatureSlice`.
///
/// # Example
///
/// ```rust,ignore
/// #[folio_derive::folio_slice]
/// pub struct Projects {
///     repository: ProjectRepository,
/// }
///
/// let slice = Projects::new(ProjectsInner { repository });
/// ```
#[proc_macro_attribute]
pub fn folio_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
