//! Shared wire types used across accessors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A string that is either plain or keyed by language code
///
/// Resource titles, descriptions and institution names come in both shapes on
/// the wire depending on what the endpoint declared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    /// A single string without language information
    Plain(String),
    /// Per-language variants, keyed by language code
    ByLanguage(BTreeMap<String, String>),
}

impl LocalizedString {
    /// The variant for `language`, if one exists
    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedString::Plain(_) => None,
            LocalizedString::ByLanguage(map) => map.get(language).map(String::as_str),
        }
    }

    /// The variant for `language`, the plain string, or any variant at all
    pub fn get_or_any(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedString::Plain(value) => Some(value),
            LocalizedString::ByLanguage(map) => map
                .get(language)
                .or_else(|| map.values().next())
                .map(String::as_str),
        }
    }
}

/// A normalized SRU/FCS diagnostic attached to one resource's results
///
/// Diagnostics accumulate across partial failures within one search; they are
/// never overwritten by later polls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Machine-readable diagnostic identifier URI
    pub uri: String,
    /// Human-readable message
    pub message: String,
    /// Additional diagnostic detail, if any
    pub diagnostic: Option<String>,
}

/// A normalized server-side exception attached to one resource's results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    /// Exception class name
    pub klass: String,
    /// Human-readable message
    pub message: String,
    /// Cause description, if any
    pub cause: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn localized_string_decodes_both_shapes() {
        let plain: LocalizedString = serde_json::from_value(json!("Corpus A")).unwrap();
        assert_eq!(plain, LocalizedString::Plain("Corpus A".to_string()));
        assert_eq!(plain.get_or_any("de"), Some("Corpus A"));

        let by_language: LocalizedString =
            serde_json::from_value(json!({"en": "Corpus A", "de": "Korpus A"})).unwrap();
        assert_eq!(by_language.get("de"), Some("Korpus A"));
        assert_eq!(by_language.get_or_any("fr"), Some("Korpus A"));
        assert_eq!(by_language.get("fr"), None);
    }

    #[test]
    fn diagnostic_decodes_null_detail() {
        let diagnostic: Diagnostic = serde_json::from_value(json!({
            "uri": "info:srw/diagnostic/1/1",
            "message": "General system error",
            "diagnostic": null
        }))
        .unwrap();
        assert_eq!(diagnostic.diagnostic, None);
    }
}
