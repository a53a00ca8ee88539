//! Search lifecycle client: submit, extend, poll and stop a distributed search
//!
//! A search session lives server-side and is identified by an opaque id (UUID
//! string) returned once on submit. Every later call is keyed by that id; the
//! client holds no record of live searches. Results are polled, not pushed:
//! each poll returns a full snapshot that replaces the previous one, and the
//! client must not assume monotonic progress between two consecutive polls.

use crate::client::AggregatorClient;
use crate::error::{require_param, Error, Result};
use crate::resources::{QueryType, Resource};
use crate::types::{Diagnostic, Exception};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Parameters for submitting a new search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    /// The query string
    pub query: String,
    /// Query language of the query string
    pub query_type: QueryType,
    /// Language to search in (ISO 639-3 code, or "mul" for all)
    pub language: String,
    /// Number of results to request per resource
    pub number_of_results: u32,
    /// Identifiers of the resources to search (must be non-empty; server-enforced)
    pub resource_ids: Vec<String>,
}

impl SearchRequest {
    /// Form-encoded body pairs, with one `resourceIds` pair per resource
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            ("queryType", self.query_type.as_str().to_string()),
            ("language", self.language.clone()),
            ("numberOfResults", self.number_of_results.to_string()),
        ];
        for resource_id in &self.resource_ids {
            pairs.push(("resourceIds", resource_id.clone()));
        }
        pairs
    }
}

/// Parameters for extending one resource's result set within a session
#[derive(Clone, Debug, PartialEq)]
pub struct MoreResultsRequest {
    /// The resource whose result set should grow
    pub resource_id: String,
    /// Desired total number of results
    pub number_of_results: u32,
}

impl MoreResultsRequest {
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("resourceId", self.resource_id.clone()),
            ("numberOfResults", self.number_of_results.to_string()),
        ]
    }
}

/// Full snapshot of a search's aggregate progress
///
/// Response for `search/{searchId}`. Invariant: `in_progress` equals the
/// number of entries in `results` whose own `in_progress` flag is true.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Number of resources still in progress
    pub in_progress: u32,
    /// Number of cancelled resources, if the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<u32>,
    /// Per-resource results, in server order
    pub results: Vec<ResourceSearchResult>,
}

/// Metadata-only snapshot of a search's aggregate progress
///
/// Response for `search/{searchId}/metaonly`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultsMetaOnly {
    /// Number of resources still in progress
    pub in_progress: u32,
    /// Number of cancelled resources, if the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<u32>,
    /// Per-resource progress entries, in server order
    pub results: Vec<ResourceSearchResultMetaOnly>,
}

/// Progress and diagnostics for one resource within a search, without records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSearchResultMetaOnly {
    /// Resource identifier
    pub id: String,
    /// Persistent handle of the resource
    pub resource_handle: String,
    /// URL of the endpoint serving this resource
    pub endpoint_url: String,

    /// True while the endpoint search is still running
    pub in_progress: bool,
    /// True when the endpoint search was cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,

    /// SRU position of the next record to fetch
    pub next_record_position: i64,
    /// Total number of records reported by the endpoint
    pub number_of_records: i64,
    /// Number of records fetched so far
    pub number_of_records_loaded: i64,

    /// Server-side exception, if the endpoint search failed
    pub exception: Option<Exception>,
    /// Accumulated diagnostics for this resource
    pub diagnostics: Vec<Diagnostic>,
    /// The SRU request URL the aggregator issued, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,

    /// True when advanced (layered) results are available
    pub has_adv_results: bool,
    /// True when lexical results are available
    pub has_lex_results: bool,
    /// True when lexical results are rendered as hits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_lex_hits: Option<bool>,
}

/// Progress, resource descriptor and records for one resource within a search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSearchResult {
    /// Progress and diagnostics shared with the meta-only variant
    #[serde(flatten)]
    pub meta: ResourceSearchResultMetaOnly,

    /// Full resource descriptor
    pub resource: Resource,

    /// Records retrieved so far; `None` only on legacy aggregator APIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<ResultRecord>>,
}

impl ResourceSearchResult {
    /// The records retrieved so far (empty on legacy APIs without a records field)
    pub fn loaded_records(&self) -> &[ResultRecord] {
        self.records.as_deref().unwrap_or(&[])
    }
}

/// One matched item within a resource's results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord", into = "WireRecord")]
pub struct ResultRecord {
    /// Persistent identifier of the matched item
    pub pid: String,
    /// External reference URL, if any
    pub reference: Option<String>,
    /// Detected language of the match, if any
    pub language: Option<String>,
    /// The populated result shape
    pub view: RecordView,
}

/// The result shape carried by one record
///
/// Every record carries a keyword-in-context rendering; advanced and lexical
/// payloads come on top of it, never both at once.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordView {
    /// Keyword-in-context only
    Kwic(Kwic),
    /// Keyword-in-context plus layered span annotations
    Advanced {
        /// Keyword-in-context rendering
        kwic: Kwic,
        /// Annotation layers, in server order
        layers: Vec<AdvancedLayer>,
    },
    /// Keyword-in-context plus a lexicon entry
    Lexical {
        /// Keyword-in-context rendering
        kwic: Kwic,
        /// The lexicon entry
        entry: LexEntry,
    },
}

impl RecordView {
    /// The keyword-in-context rendering every record carries
    pub fn kwic(&self) -> &Kwic {
        match self {
            RecordView::Kwic(kwic) => kwic,
            RecordView::Advanced { kwic, .. } => kwic,
            RecordView::Lexical { kwic, .. } => kwic,
        }
    }
}

/// Wire shape of a result record: `hits` plus nullable `adv`/`lex` fields
#[derive(Clone, Debug, Serialize, Deserialize)]
struct WireRecord {
    pid: String,
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    hits: Kwic,
    #[serde(default)]
    adv: Option<Vec<AdvancedLayer>>,
    #[serde(default)]
    lex: Option<LexEntry>,
}

impl TryFrom<WireRecord> for ResultRecord {
    type Error = String;

    fn try_from(raw: WireRecord) -> std::result::Result<Self, Self::Error> {
        let view = match (raw.adv, raw.lex) {
            (None, None) => RecordView::Kwic(raw.hits),
            (Some(layers), None) => RecordView::Advanced {
                kwic: raw.hits,
                layers,
            },
            (None, Some(entry)) => RecordView::Lexical {
                kwic: raw.hits,
                entry,
            },
            (Some(_), Some(_)) => {
                return Err(format!(
                    "result record {:?} carries both adv and lex payloads",
                    raw.pid
                ));
            }
        };
        Ok(ResultRecord {
            pid: raw.pid,
            reference: raw.reference,
            language: raw.lang,
            view,
        })
    }
}

impl From<ResultRecord> for WireRecord {
    fn from(record: ResultRecord) -> Self {
        let (hits, adv, lex) = match record.view {
            RecordView::Kwic(kwic) => (kwic, None, None),
            RecordView::Advanced { kwic, layers } => (kwic, Some(layers), None),
            RecordView::Lexical { kwic, entry } => (kwic, None, Some(entry)),
        };
        WireRecord {
            pid: record.pid,
            reference: record.reference,
            lang: record.language,
            hits,
            adv,
            lex,
        }
    }
}

/// Keyword-in-context rendering of a hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kwic {
    /// Text fragments with hit markers, in reading order
    #[serde(default)]
    pub fragments: Vec<KwicFragment>,
    /// Context left of the keyword
    pub left: String,
    /// The matched keyword
    pub keyword: String,
    /// Context right of the keyword
    pub right: String,
}

/// One text fragment of a keyword-in-context rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KwicFragment {
    /// Fragment text
    pub text: String,
    /// True when the fragment is part of the hit
    pub hit: bool,
    /// Hit kind qualifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_kind: Option<String>,
}

/// One annotation layer of an advanced-search result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvancedLayer {
    /// Layer identifier
    pub id: String,
    /// Annotated spans, in reading order
    pub spans: Vec<LayerFragment>,
}

/// One annotated span within a layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerFragment {
    /// Span text or value
    pub text: String,
    /// True when the span is part of the hit
    pub hit: bool,
    /// Character offset range, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(u64, u64)>,
}

/// A lexicon entry result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEntry {
    /// Entry fields, in server order
    pub fields: Vec<LexField>,
    /// Language of the entry
    pub lang: String,
    /// Language URI, if any
    pub lang_uri: Option<String>,
    /// Persistent identifier of the entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    /// Reference URL of the entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One field of a lexicon entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LexField {
    /// Field type (open set)
    #[serde(rename = "type")]
    pub field_type: crate::resources::LexFieldType,
    /// Field values
    pub values: Vec<LexValue>,
}

/// One value of a lexicon entry field
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexValue {
    /// The value text (may be absent for marker values)
    pub value: Option<String>,
    /// XML id of the value element, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_id: Option<String>,
    /// XML language of the value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_lang: Option<String>,
    /// Language URI, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_uri: Option<String>,
    /// True when this value is the preferred one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,
    /// Reference URL, if any
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Ids of referenced values, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_refs: Option<Vec<String>>,
    /// Vocabulary reference, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab_ref: Option<String>,
    /// Vocabulary value reference, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab_value_ref: Option<String>,
    /// Value type qualifier, if any
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    /// Source description, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Source reference, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    /// Date qualifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Error body shape used by the aggregator for HTTP error responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn warn_on_legacy_records(search_id: &str, results: &[ResourceSearchResult]) {
    if results.iter().any(|result| result.records.is_none()) {
        warn!(
            search_id,
            "legacy aggregator API: search results carry no records field"
        );
    }
}

impl AggregatorClient {
    /// Submit a new search and return the server-assigned search identifier
    ///
    /// # Errors
    /// Returns [`Error::Network`] on transport failure and [`Error::Decode`]
    /// on a non-JSON body.
    pub async fn submit_search(&self, request: &SearchRequest) -> Result<String> {
        let url = self.endpoint("search")?;
        debug!(
            query = %request.query,
            query_type = request.query_type.as_str(),
            resources = request.resource_ids.len(),
            "submitting search"
        );
        let search_id: String = self.post_form_json(url, &request.form_pairs()).await?;
        debug!(%search_id, "search submitted");
        Ok(search_id)
    }

    /// Request the server extend one resource's result set within a session
    ///
    /// The returned identifier is authoritative for all subsequent calls; it
    /// may or may not equal `search_id`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] on an empty `search_id` or resource id,
    /// [`Error::Network`] on transport failure and [`Error::Decode`] on a
    /// non-JSON body.
    pub async fn extend_search(
        &self,
        search_id: &str,
        request: &MoreResultsRequest,
    ) -> Result<String> {
        require_param("search_id", search_id)?;
        require_param("resource_id", &request.resource_id)?;
        let url = self.endpoint(&format!("search/{}", urlencoding::encode(search_id)))?;
        debug!(
            search_id,
            resource_id = %request.resource_id,
            number_of_results = request.number_of_results,
            "requesting more results"
        );
        let next_id: String = self.post_form_json(url, &request.form_pairs()).await?;
        Ok(next_id)
    }

    /// Request early termination of an in-progress search
    ///
    /// Returns `true` when the server acknowledged stopping (202, or any
    /// success other than 204). Older deployments answer 404 with the message
    /// `"HTTP 404 Not Found"` because the endpoint predates stop support;
    /// that one case yields `false` instead of an error.
    ///
    /// # Errors
    /// Returns [`Error::Config`] on an empty `search_id` and
    /// [`Error::Network`] on transport failure or any other error status.
    pub async fn stop_search(&self, search_id: &str) -> Result<bool> {
        require_param("search_id", search_id)?;
        let url = self.endpoint(&format!("search/{}/stop", urlencoding::encode(search_id)))?;
        debug!(search_id, "stopping search");

        let empty_form: [(&str, &str); 0] = [];
        let response = self.http().post(url).form(&empty_form).send().await?;
        let status = response.status();

        if let Err(status_error) = response.error_for_status_ref() {
            if status == StatusCode::NOT_FOUND {
                let body = response.bytes().await?;
                if let Ok(error_body) = serde_json::from_slice::<ErrorBody>(&body) {
                    if error_body.message.as_deref() == Some("HTTP 404 Not Found") {
                        warn!(search_id, "search stopping is not supported by this aggregator");
                        return Ok(false);
                    }
                }
            }
            return Err(Error::Network(status_error));
        }

        Ok(status == StatusCode::ACCEPTED || status != StatusCode::NO_CONTENT)
    }

    /// Poll the current full snapshot of a search (all resources, all records)
    ///
    /// A result entry missing its records field indicates a legacy aggregator
    /// API; it is tolerated and reported via a `warn!` event, not the return
    /// value.
    ///
    /// # Errors
    /// Returns [`Error::Config`] on an empty `search_id`, [`Error::Network`]
    /// on transport failure and [`Error::Decode`] on a non-JSON body.
    pub async fn search_results(&self, search_id: &str) -> Result<SearchResults> {
        require_param("search_id", search_id)?;
        let url = self.endpoint(&format!("search/{}", urlencoding::encode(search_id)))?;
        let snapshot: SearchResults = self.get_json(url).await?;
        debug!(
            search_id,
            in_progress = snapshot.in_progress,
            results = snapshot.results.len(),
            "polled search results"
        );
        warn_on_legacy_records(search_id, &snapshot.results);
        Ok(snapshot)
    }

    /// Poll the metadata-only snapshot of a search
    ///
    /// # Errors
    /// Returns [`Error::Config`] on an empty `search_id`, [`Error::Network`]
    /// on transport failure and [`Error::Decode`] on a non-JSON body.
    pub async fn search_results_meta_only(&self, search_id: &str) -> Result<SearchResultsMetaOnly> {
        require_param("search_id", search_id)?;
        let url = self.endpoint(&format!(
            "search/{}/metaonly",
            urlencoding::encode(search_id)
        ))?;
        let snapshot: SearchResultsMetaOnly = self.get_json(url).await?;
        debug!(
            search_id,
            in_progress = snapshot.in_progress,
            results = snapshot.results.len(),
            "polled search results (meta only)"
        );
        Ok(snapshot)
    }

    /// Poll the metadata-only snapshot for one resource
    ///
    /// The server-side `resourceId` filter is re-applied client-side on the
    /// entry's `id` field.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no entry matches `resource_id` after
    /// filtering; otherwise as [`Self::search_results_meta_only`].
    pub async fn search_results_meta_only_for_resource(
        &self,
        search_id: &str,
        resource_id: &str,
    ) -> Result<ResourceSearchResultMetaOnly> {
        require_param("search_id", search_id)?;
        require_param("resource_id", resource_id)?;
        let mut url = self.endpoint(&format!(
            "search/{}/metaonly",
            urlencoding::encode(search_id)
        ))?;
        url.query_pairs_mut().append_pair("resourceId", resource_id);

        let snapshot: SearchResultsMetaOnly = self.get_json(url).await?;
        snapshot
            .results
            .into_iter()
            .find(|result| result.id == resource_id)
            .ok_or_else(|| Error::NotFound {
                search_id: search_id.to_string(),
                resource_id: resource_id.to_string(),
            })
    }

    /// Poll the full snapshot for one resource
    ///
    /// The server-side `resourceId` filter is re-applied client-side on the
    /// entry's resource descriptor id (not the top-level entry id).
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no entry matches `resource_id` after
    /// filtering; otherwise as [`Self::search_results`].
    pub async fn search_result_details(
        &self,
        search_id: &str,
        resource_id: &str,
    ) -> Result<ResourceSearchResult> {
        require_param("search_id", search_id)?;
        require_param("resource_id", resource_id)?;
        let mut url = self.endpoint(&format!("search/{}", urlencoding::encode(search_id)))?;
        url.query_pairs_mut().append_pair("resourceId", resource_id);

        let snapshot: SearchResults = self.get_json(url).await?;
        let result = snapshot
            .results
            .into_iter()
            .find(|result| result.resource.id == resource_id)
            .ok_or_else(|| Error::NotFound {
                search_id: search_id.to_string(),
                resource_id: resource_id.to_string(),
            })?;

        if result.records.is_none() {
            warn!(
                search_id,
                resource_id, "legacy aggregator API: search results carry no records field"
            );
        }
        Ok(result)
    }

    /// Build the poll URL for a search without issuing a request
    ///
    /// Mirrors the poll endpoints: `search/{id}`, optionally `/metaonly`,
    /// optionally filtered to one resource.
    ///
    /// # Errors
    /// Returns [`Error::Config`] on an empty `search_id`.
    pub fn search_results_url(
        &self,
        search_id: &str,
        resource_id: Option<&str>,
        meta_only: bool,
    ) -> Result<Url> {
        require_param("search_id", search_id)?;
        let mut path = format!("search/{}", urlencoding::encode(search_id));
        if meta_only {
            path.push_str("/metaonly");
        }
        let mut url = self.endpoint(&path)?;
        if let Some(resource_id) = resource_id {
            url.query_pairs_mut().append_pair("resourceId", resource_id);
        }
        Ok(url)
    }
}
