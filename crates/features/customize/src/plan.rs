//! Turns a settings document into the ordered list of blocks to inject.

use crate::slot::{ContentKind, Region, Slot};
use folio_domain::settings::{ContentKinds, SettingsDocument};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One planned `(region, kind, content)` unit.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedBlock {
    pub region: Region,
    pub kind: ContentKind,
    pub content: String,
}

impl InjectedBlock {
    #[must_use]
    pub const fn slot(&self) -> Slot {
        Slot::new(self.region, self.kind)
    }
}

/// Blocks in insertion order: head, body-start, footer; markup, style, script within each.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InjectionPlan {
    blocks: Vec<InjectedBlock>,
}

impl InjectionPlan {
    #[must_use]
    pub fn blocks(&self) -> &[InjectedBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InjectedBlock> {
        self.blocks.iter()
    }

    pub fn region(&self, region: Region) -> impl Iterator<Item = &InjectedBlock> {
        self.blocks.iter().filter(move |block| block.region == region)
    }

    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&InjectedBlock> {
        self.blocks.iter().find(|block| block.slot() == slot)
    }

    /// Drops blocks whose kind is not in `allowed`.
    #[must_use]
    pub fn restrict(mut self, allowed: ContentKinds) -> Self {
        self.blocks.retain(|block| allowed.contains(block.kind.flag()));
        self
    }
}

impl<'a> IntoIterator for &'a InjectionPlan {
    type Item = &'a InjectedBlock;
    type IntoIter = std::slice::Iter<'a, InjectedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Plans the blocks for every recognized slot.
///
/// The effective value of a slot is its settings entry when that is a non-empty string, otherwise
/// the defaults entry under the same rule. Values of any other type count as absent. Slots whose
/// effective value is missing or whitespace only are omitted, so a blank setting switches off a
/// default.
#[must_use]
pub fn compute_plan(settings: &SettingsDocument, defaults: &SettingsDocument) -> InjectionPlan {
    let blocks: Vec<InjectedBlock> = Slot::ALL
        .into_iter()
        .filter_map(|slot| {
            let key = slot.settings_key();
            let content = settings.text(key).or_else(|| defaults.text(key))?;
            if content.trim().is_empty() {
                return None;
            }
            Some(InjectedBlock { region: slot.region, kind: slot.kind, content: content.to_owned() })
        })
        .collect();

    debug!(blocks = blocks.len(), "Injection plan computed");
    InjectionPlan { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_override_defaults_per_key() {
        let settings = SettingsDocument::new().with("customHeadCss", ".x{color:red}");
        let defaults = SettingsDocument::new()
            .with("customHeadCss", ".y{color:blue}")
            .with("customBodyJs", "console.log(1)");

        let plan = compute_plan(&settings, &defaults);

        assert_eq!(
            plan.blocks(),
            [
                InjectedBlock {
                    region: Region::Head,
                    kind: ContentKind::Style,
                    content: ".x{color:red}".to_owned()
                },
                InjectedBlock {
                    region: Region::BodyStart,
                    kind: ContentKind::Script,
                    content: "console.log(1)".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_empty_settings_yield_defaults_only() {
        let defaults = SettingsDocument::new().with("customFooterHtml", "<p>bye</p>");
        let plan = compute_plan(&SettingsDocument::new(), &defaults);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.blocks()[0].region, Region::Footer);
    }

    #[test]
    fn test_empty_blank_and_mistyped_values_add_no_block() {
        let settings = SettingsDocument::new()
            .with("customHeadHtml", "")
            .with("customHeadJs", "  \t")
            .with("customBodyCss", true)
            .with("customFooterJs", 42.0);

        assert!(compute_plan(&settings, &SettingsDocument::new()).is_empty());
    }

    #[test]
    fn test_blank_setting_falls_back_to_default() {
        let settings = SettingsDocument::new().with("customHeadJs", "");
        let defaults = SettingsDocument::new().with("customHeadJs", "window.x=1");
        let plan = compute_plan(&settings, &defaults);
        assert_eq!(plan.get(Slot::new(Region::Head, ContentKind::Script)).map(|b| b.content.as_str()), Some("window.x=1"));
    }

    #[test]
    fn test_blank_setting_switches_off_default() {
        let settings = SettingsDocument::new().with("customHeadCss", "   ");
        let defaults = SettingsDocument::new().with("customHeadCss", ".y{}").with("customHeadJs", "y()");
        let plan = compute_plan(&settings, &defaults);
        assert_eq!(plan.len(), 1);
        assert!(plan.get(Slot::new(Region::Head, ContentKind::Style)).is_none());
    }

    #[test]
    fn test_region_order_is_markup_style_script() {
        let settings = SettingsDocument::new()
            .with("customBodyJs", "run()")
            .with("customBodyCss", "a{}")
            .with("customBodyHtml", "<b>x</b>");

        let kinds: Vec<_> = compute_plan(&settings, &SettingsDocument::new())
            .region(Region::BodyStart)
            .map(|b| b.kind)
            .collect();
        assert_eq!(kinds, ContentKind::ORDER);
    }

    #[test]
    fn test_restrict_drops_disallowed_kinds() {
        let settings = SettingsDocument::new()
            .with("customHeadHtml", "<meta name=a>")
            .with("customHeadJs", "x()");
        let plan = compute_plan(&settings, &SettingsDocument::new()).restrict(ContentKinds::MARKUP);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.blocks()[0].kind, ContentKind::Markup);
    }

    #[test]
    fn test_plan_serializes_as_block_list() {
        let settings = SettingsDocument::new().with("customFooterCss", "p{}");
        let json = serde_json::to_value(compute_plan(&settings, &SettingsDocument::new())).expect("serialize");
        assert_eq!(json, serde_json::json!([{ "region": "footer", "kind": "style", "content": "p{}" }]));
    }
}
