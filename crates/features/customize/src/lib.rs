//! # Site Customization
//!
//! Administrators store HTML, CSS and JavaScript snippets in the public site settings. This crate
//! turns those settings into nodes in a page:
//!
//! 1. **Source ([`source`])** reads the public settings document once. Failure is never fatal;
//!    an empty document is used and the defaults apply.
//! 2. **Planner ([`plan`])** merges the document over a defaults table and produces one block
//!    per non-empty slot, ordered head, body-start, footer and markup, style, script.
//! 3. **Reconciler ([`reconcile`])** removes every node tagged with a slot marker from the sink,
//!    then inserts the planned blocks, each top-level element tagged on its own.
//!
//! Sinks implement [`UntrustedMarkupSink`]; [`HtmlDocument`] is the one provided, editing an HTML
//! page held in memory.
//!
//! ## Example
//!
//! ```rust
//! use folio_customize::{HtmlDocument, Region, apply, compute_plan};
//! use folio_domain::settings::SettingsDocument;
//!
//! let settings = SettingsDocument::new().with("customHeadCss", "body{margin:0}");
//! let plan = compute_plan(&settings, &SettingsDocument::new());
//!
//! let mut page = HtmlDocument::parse("<html><head></head><body></body></html>");
//! apply(&mut page, &plan);
//!
//! assert_eq!(page.tagged(Region::Head).len(), 1);
//! assert!(page.render().contains(r#"<style data-custom-slot="head-css">body{margin:0}</style>"#));
//! ```

mod document;
mod error;
mod fragment;
#[cfg(feature = "http")]
pub mod http;
pub mod plan;
pub mod presets;
pub mod reconcile;
pub mod slot;
pub mod source;

pub use crate::document::{HtmlDocument, TaggedNode, UntrustedMarkupSink};
pub use crate::error::{CustomizeError, CustomizeErrorExt};
pub use crate::plan::{InjectedBlock, InjectionPlan, compute_plan};
pub use crate::reconcile::apply;
pub use crate::slot::{ContentKind, MARKER_ATTRIBUTE, Region, Slot};
pub use crate::source::{SettingsSource, load_settings, refresh};
