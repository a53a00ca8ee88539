//! Result export URL builders (download formats and Weblicht handoff)
//!
//! These are pure URL constructors: they never perform network I/O. The
//! resulting absolute URLs are meant to be handed to a browser or fetched by
//! the embedding application.

use crate::client::AggregatorClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Export formats supported by the download endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    /// Plain text
    Text,
    /// Comma-separated values
    Csv,
    /// TCF (Text Corpus Format)
    Tcf,
    /// OpenDocument spreadsheet
    Ods,
    /// Excel spreadsheet
    Excel,
}

impl DownloadFormat {
    /// The wire representation of this format
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::Text => "text",
            DownloadFormat::Csv => "csv",
            DownloadFormat::Tcf => "tcf",
            DownloadFormat::Ods => "ods",
            DownloadFormat::Excel => "excel",
        }
    }
}

/// Language filter modes applied when exporting results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageFilter {
    /// Filter by declared resource metadata only (server default)
    ByMeta,
    /// Filter by detected record language
    ByGuess,
    /// Filter by declared metadata and detected record language
    ByMetaAndGuess,
}

impl LanguageFilter {
    /// True when the mode filters on the detected record language
    ///
    /// Only these modes emit a `filterLanguage` parameter; for
    /// [`LanguageFilter::ByMeta`] the server falls back to metadata-based
    /// filtering on its own.
    pub fn filters_by_detected_language(&self) -> bool {
        matches!(self, LanguageFilter::ByGuess | LanguageFilter::ByMetaAndGuess)
    }
}

impl AggregatorClient {
    /// Build the absolute URL for exporting one resource's results
    ///
    /// `resourceId` and `format` are always set; `filterLanguage` is set only
    /// when the filter mode considers the detected record language.
    ///
    /// # Errors
    /// Never fails for a client built by the factory; the `Result` covers the
    /// fallibility of URL joining.
    pub fn download_url(
        &self,
        search_id: &str,
        resource_id: &str,
        format: DownloadFormat,
        language: &str,
        language_filter: LanguageFilter,
    ) -> Result<Url> {
        let mut url = self.endpoint(&format!(
            "search/{}/download",
            urlencoding::encode(search_id)
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("resourceId", resource_id);
            query.append_pair("format", format.as_str());
            if language_filter.filters_by_detected_language() {
                query.append_pair("filterLanguage", language);
            }
        }
        Ok(url)
    }

    /// Build the absolute URL for handing one resource's results to Weblicht
    ///
    /// An explicit non-empty `weblicht_language` overrides the filter-mode
    /// logic; otherwise `filterLanguage` follows the same rule as
    /// [`Self::download_url`].
    ///
    /// # Errors
    /// Never fails for a client built by the factory; the `Result` covers the
    /// fallibility of URL joining.
    pub fn weblicht_url(
        &self,
        search_id: &str,
        resource_id: &str,
        weblicht_language: Option<&str>,
        language: &str,
        language_filter: LanguageFilter,
    ) -> Result<Url> {
        let mut url = self.endpoint(&format!(
            "search/{}/toWeblicht",
            urlencoding::encode(search_id)
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("resourceId", resource_id);
            match weblicht_language {
                Some(explicit) if !explicit.is_empty() => {
                    query.append_pair("filterLanguage", explicit);
                }
                _ => {
                    if language_filter.filters_by_detected_language() {
                        query.append_pair("filterLanguage", language);
                    }
                }
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AggregatorClient {
        AggregatorClient::with_base_url("https://fcs.example.org/rest/").unwrap()
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn download_url_by_meta_omits_filter_language() {
        let url = client()
            .download_url("s1", "res-a", DownloadFormat::Csv, "deu", LanguageFilter::ByMeta)
            .unwrap();
        assert!(url
            .as_str()
            .starts_with("https://fcs.example.org/rest/search/s1/download?"));
        assert_eq!(query_value(&url, "resourceId").as_deref(), Some("res-a"));
        assert_eq!(query_value(&url, "format").as_deref(), Some("csv"));
        assert_eq!(query_value(&url, "filterLanguage"), None);
    }

    #[test]
    fn download_url_guess_modes_set_filter_language() {
        for filter in [LanguageFilter::ByGuess, LanguageFilter::ByMetaAndGuess] {
            let url = client()
                .download_url("s1", "res-a", DownloadFormat::Text, "deu", filter)
                .unwrap();
            assert_eq!(query_value(&url, "filterLanguage").as_deref(), Some("deu"));
        }
    }

    #[test]
    fn weblicht_url_explicit_language_wins_for_all_modes() {
        for filter in [
            LanguageFilter::ByMeta,
            LanguageFilter::ByGuess,
            LanguageFilter::ByMetaAndGuess,
        ] {
            let url = client()
                .weblicht_url("s1", "res-a", Some("eng"), "deu", filter)
                .unwrap();
            assert_eq!(query_value(&url, "filterLanguage").as_deref(), Some("eng"));
        }
    }

    #[test]
    fn weblicht_url_falls_back_to_filter_mode() {
        let by_meta = client()
            .weblicht_url("s1", "res-a", None, "deu", LanguageFilter::ByMeta)
            .unwrap();
        assert_eq!(query_value(&by_meta, "filterLanguage"), None);

        let by_guess = client()
            .weblicht_url("s1", "res-a", None, "deu", LanguageFilter::ByGuess)
            .unwrap();
        assert_eq!(query_value(&by_guess, "filterLanguage").as_deref(), Some("deu"));

        // An empty override behaves like no override.
        let empty = client()
            .weblicht_url("s1", "res-a", Some(""), "deu", LanguageFilter::ByMeta)
            .unwrap();
        assert_eq!(query_value(&empty, "filterLanguage"), None);
    }

    #[test]
    fn export_urls_encode_caller_supplied_identifiers() {
        let url = client()
            .download_url(
                "s1",
                "res/with special",
                DownloadFormat::Ods,
                "deu",
                LanguageFilter::ByMeta,
            )
            .unwrap();
        assert_eq!(
            query_value(&url, "resourceId").as_deref(),
            Some("res/with special")
        );
        assert!(url.as_str().contains("resourceId=res%2Fwith+special"));
    }
}
