//! The public settings document and its value model.

use bitflags::bitflags;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// A single settings value as it appears in the public document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl SettingValue {
    /// The string content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Flat key/value snapshot of the publicly readable site settings.
///
/// Deserialization is lenient per entry: a value that is not a boolean, number, string or
/// array of strings is dropped instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SettingsDocument(BTreeMap<String, SettingValue>);

impl SettingsDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for defaults tables.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Text value for `key` when it is a non-empty string.
    ///
    /// Empty strings and non-text values yield `None`. Whitespace-only strings are returned as is.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SettingValue::as_text).filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SettingValue> {
        self.0.iter()
    }
}

impl FromIterator<(String, SettingValue)> for SettingsDocument {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, SettingValue>> for SettingsDocument {
    fn from(map: BTreeMap<String, SettingValue>) -> Self {
        Self(map)
    }
}

impl IntoIterator for SettingsDocument {
    type Item = (String, SettingValue);
    type IntoIter = btree_map::IntoIter<String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientValue {
    Valid(SettingValue),
    Ignored(IgnoredAny),
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = SettingsDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat object of settings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, LenientValue>()? {
            if let LenientValue::Valid(value) = value {
                entries.insert(key, value);
            }
        }
        Ok(SettingsDocument(entries))
    }
}

impl<'de> Deserialize<'de> for SettingsDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

bitflags! {
    /// Kinds of customization content a renderer may inject.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContentKinds: u8 {
        const MARKUP = 1 << 0;
        const STYLE = 1 << 1;
        const SCRIPT = 1 << 2;
    }
}

impl ContentKinds {
    fn from_alias(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "markup" | "html" => Some(Self::MARKUP),
            "style" | "css" => Some(Self::STYLE),
            "script" | "js" => Some(Self::SCRIPT),
            "all" | "*" => Some(Self::all()),
            _ => None,
        }
    }
}

impl Serialize for ContentKinds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&str> = [(Self::MARKUP, "markup"), (Self::STYLE, "style"), (Self::SCRIPT, "script")]
            .into_iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
            .collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentKinds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Self::empty(), |kinds, name| {
            Self::from_alias(name).map(|kind| kinds | kind).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown content kind '{name}'"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_values_are_dropped() {
        let doc: SettingsDocument = serde_json::from_value(json!({
            "customHeadCss": ".x{color:red}",
            "customBodyJs": { "nested": true },
            "fxEnableGlow": true,
            "homeStats": [1, 2],
            "tags": ["a", "b"],
            "opacity": 0.5,
            "missing": null
        }))
        .expect("lenient document");

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.text("customHeadCss"), Some(".x{color:red}"));
        assert!(doc.get("customBodyJs").is_none());
        assert!(doc.get("homeStats").is_none());
        assert!(doc.get("missing").is_none());
        assert_eq!(doc.get("fxEnableGlow"), Some(&SettingValue::Bool(true)));
    }

    #[test]
    fn test_text_ignores_empty_and_non_text() {
        let doc = SettingsDocument::new()
            .with("empty", "")
            .with("blank", "   \n")
            .with("flag", true)
            .with("count", 3.0)
            .with("css", "body{}");

        assert_eq!(doc.text("empty"), None);
        assert_eq!(doc.text("blank"), Some("   \n"));
        assert_eq!(doc.text("flag"), None);
        assert_eq!(doc.text("count"), None);
        assert_eq!(doc.text("css"), Some("body{}"));
        assert_eq!(doc.text("absent"), None);
    }

    #[test]
    fn test_non_object_document_is_an_error() {
        assert!(serde_json::from_value::<SettingsDocument>(json!(["a"])).is_err());
    }

    #[test]
    fn test_document_serializes_flat() {
        let doc = SettingsDocument::new().with("b", "2").with("a", true);
        assert_eq!(serde_json::to_value(&doc).expect("serialize"), json!({ "a": true, "b": "2" }));
    }

    #[test]
    fn test_content_kinds_round_trip_through_names() {
        let kinds: ContentKinds = serde_json::from_value(json!(["css", "markup"])).expect("kinds");
        assert_eq!(kinds, ContentKinds::MARKUP | ContentKinds::STYLE);
        assert_eq!(serde_json::to_value(kinds).expect("serialize"), json!(["markup", "style"]));

        let all: ContentKinds = serde_json::from_value(json!(["all"])).expect("all");
        assert_eq!(all, ContentKinds::all());
        assert!(serde_json::from_value::<ContentKinds>(json!(["iframe"])).is_err());
    }
}
