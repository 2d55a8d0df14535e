//! Where the settings document comes from.

use crate::document::UntrustedMarkupSink;
use crate::error::CustomizeError;
use crate::plan::{InjectionPlan, compute_plan};
use crate::reconcile::apply;
use folio_domain::settings::SettingsDocument;
use std::future::Future;
use tracing::warn;

/// Read access to the publicly readable settings.
pub trait SettingsSource: Send + Sync {
    fn fetch_public_settings(&self) -> impl Future<Output = Result<SettingsDocument, CustomizeError>> + Send;
}

/// A fixed document, e.g. for offline rendering.
impl SettingsSource for SettingsDocument {
    async fn fetch_public_settings(&self) -> Result<SettingsDocument, CustomizeError> {
        Ok(self.clone())
    }
}

/// Fetches the settings once, substituting an empty document on failure.
///
/// A failed fetch is logged and otherwise ignored: callers then plan from defaults alone.
pub async fn load_settings<S: SettingsSource>(source: &S) -> SettingsDocument {
    match source.fetch_public_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "Public settings unavailable, using defaults");
            SettingsDocument::new()
        },
    }
}

/// Runs one full fetch, plan and apply pass against `sink` and returns the applied plan.
///
/// The pass is not cancellable: whichever plan a caller applies last is what the sink shows.
pub async fn refresh<S, K>(source: &S, defaults: &SettingsDocument, sink: &mut K) -> InjectionPlan
where
    S: SettingsSource,
    K: UntrustedMarkupSink + ?Sized,
{
    let settings = load_settings(source).await;
    let plan = compute_plan(&settings, defaults);
    apply(sink, &plan);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Offline;

    impl SettingsSource for Offline {
        async fn fetch_public_settings(&self) -> Result<SettingsDocument, CustomizeError> {
            Err(CustomizeError::Unavailable { message: "offline".into(), context: None })
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_document() {
        assert!(load_settings(&Offline).await.is_empty());
    }

    #[tokio::test]
    async fn test_static_document_is_returned_as_is() {
        let doc = SettingsDocument::new().with("customHeadCss", "a{}");
        assert_eq!(load_settings(&doc).await, doc);
    }
}
