//! Closed vocabularies used by the persisted entities.
//!
//! Every enum serializes to its lowercase name, both through serde and through `strum`
//! (`Display`/`FromStr`), so the same spelling is used on the wire and in the database.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Draft,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Won,
    Lost,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SettingCategory {
    General,
    Social,
    Seo,
    Api,
    Theme,
    #[default]
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageCategory {
    Hero,
    Project,
    #[default]
    Gallery,
    Avatar,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wire_and_strum_spelling_agree() {
        for status in LeadStatus::iter() {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(LeadStatus::from_str(status.as_ref()).ok(), Some(status));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(SettingCategory::default(), SettingCategory::Other);
        assert_eq!(ImageCategory::default(), ImageCategory::Gallery);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(ProjectStatus::from_str("deleted").is_err());
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
