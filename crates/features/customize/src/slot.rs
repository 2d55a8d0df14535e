//! The fixed vocabulary of injection slots.

use folio_domain::settings::ContentKinds;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Attribute that marks a node as owned by the reconciler.
///
/// Its values are reserved: any other node carrying one of them is treated as a previous
/// injection and removed on the next apply.
pub const MARKER_ATTRIBUTE: &str = "data-custom-slot";

/// Document area a block is rendered into.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Region {
    /// End of `<head>`.
    Head,
    /// Top of `<body>`.
    BodyStart,
    /// End of `<body>`.
    Footer,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::Head, Self::BodyStart, Self::Footer];
}

/// What a block contains.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Markup,
    Style,
    Script,
}

impl ContentKind {
    /// Insertion priority within a region.
    pub const ORDER: [Self; 3] = [Self::Markup, Self::Style, Self::Script];

    #[must_use]
    pub const fn flag(self) -> ContentKinds {
        match self {
            Self::Markup => ContentKinds::MARKUP,
            Self::Style => ContentKinds::STYLE,
            Self::Script => ContentKinds::SCRIPT,
        }
    }
}

/// A `(region, kind)` pair: one settings key and one marker value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub region: Region,
    pub kind: ContentKind,
}

impl Slot {
    /// Every slot, region-major, then markup, style, script.
    pub const ALL: [Self; 9] = [
        Self::new(Region::Head, ContentKind::Markup),
        Self::new(Region::Head, ContentKind::Style),
        Self::new(Region::Head, ContentKind::Script),
        Self::new(Region::BodyStart, ContentKind::Markup),
        Self::new(Region::BodyStart, ContentKind::Style),
        Self::new(Region::BodyStart, ContentKind::Script),
        Self::new(Region::Footer, ContentKind::Markup),
        Self::new(Region::Footer, ContentKind::Style),
        Self::new(Region::Footer, ContentKind::Script),
    ];

    #[must_use]
    pub const fn new(region: Region, kind: ContentKind) -> Self {
        Self { region, kind }
    }

    /// Value of [`MARKER_ATTRIBUTE`] on nodes injected for this slot.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match (self.region, self.kind) {
            (Region::Head, ContentKind::Markup) => "head-html",
            (Region::Head, ContentKind::Style) => "head-css",
            (Region::Head, ContentKind::Script) => "head-js",
            (Region::BodyStart, ContentKind::Markup) => "body-html",
            (Region::BodyStart, ContentKind::Style) => "body-css",
            (Region::BodyStart, ContentKind::Script) => "body-js",
            (Region::Footer, ContentKind::Markup) => "footer-html",
            (Region::Footer, ContentKind::Style) => "footer-css",
            (Region::Footer, ContentKind::Script) => "footer-js",
        }
    }

    /// Settings document key holding this slot's content.
    #[must_use]
    pub const fn settings_key(self) -> &'static str {
        match (self.region, self.kind) {
            (Region::Head, ContentKind::Markup) => "customHeadHtml",
            (Region::Head, ContentKind::Style) => "customHeadCss",
            (Region::Head, ContentKind::Script) => "customHeadJs",
            (Region::BodyStart, ContentKind::Markup) => "customBodyHtml",
            (Region::BodyStart, ContentKind::Style) => "customBodyCss",
            (Region::BodyStart, ContentKind::Script) => "customBodyJs",
            (Region::Footer, ContentKind::Markup) => "customFooterHtml",
            (Region::Footer, ContentKind::Style) => "customFooterCss",
            (Region::Footer, ContentKind::Script) => "customFooterJs",
        }
    }

    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.marker() == marker)
    }

    #[must_use]
    pub fn from_settings_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.settings_key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_markers_and_keys_are_unique() {
        let markers: HashSet<_> = Slot::ALL.iter().map(|s| s.marker()).collect();
        let keys: HashSet<_> = Slot::ALL.iter().map(|s| s.settings_key()).collect();
        assert_eq!(markers.len(), 9);
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn test_lookups_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_marker(slot.marker()), Some(slot));
            assert_eq!(Slot::from_settings_key(slot.settings_key()), Some(slot));
        }
        assert_eq!(Slot::from_marker("head"), None);
    }

    #[test]
    fn test_all_is_sorted_region_major() {
        let mut sorted = Slot::ALL;
        sorted.sort();
        assert_eq!(sorted, Slot::ALL);
    }
}
