//! Resource catalog, language table and init-data accessors
//!
//! The resource catalog is a forest: each [`Resource`] exclusively owns its
//! `sub_resources` children. The client never mutates the tree after decoding.

use crate::client::AggregatorClient;
use crate::consortia::Consortium;
use crate::error::Result;
use crate::types::LocalizedString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Language code to display name table (name may be unknown)
///
/// Response for `/languages`.
pub type Languages = BTreeMap<String, Option<String>>;

/// Combined bootstrap payload
///
/// Response for `/init`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitData {
    /// Language code to display name table
    pub languages: Languages,
    /// Resource catalog
    pub resources: Vec<Resource>,
    /// Languages supported by the Weblicht export pipeline
    pub weblicht_languages: Vec<String>,
}

/// A searchable collection exposed by one federated endpoint institution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// The institution hosting this resource's endpoint
    pub endpoint_institution: EndpointInstitution,
    /// The endpoint this resource is served from
    pub endpoint: Endpoint,

    /// Persistent handle of the resource
    pub handle: String,
    /// Stable aggregator-assigned identifier
    pub id: String,

    /// Declared record count (currently never populated by the server)
    pub number_of_records: Option<u64>,

    /// Resource title, possibly multilingual
    pub title: LocalizedString,
    /// Resource description, possibly multilingual
    pub description: Option<LocalizedString>,
    /// Institution display name, possibly multilingual
    pub institution: LocalizedString,
    /// Landing page URL
    pub landing_page: Option<String>,
    /// Languages of the material in this resource (ISO 639-3 codes)
    pub languages: Vec<String>,

    /// Search capabilities declared by the endpoint
    pub search_capabilities: Vec<Capability>,
    /// Search capabilities after aggregator-side resolution
    pub search_capabilities_resolved: Vec<Capability>,

    /// Availability restriction class
    pub availability_restriction: AvailabilityRestriction,
    /// Declared data views, if advertised
    pub available_data_views: Option<Vec<AvailableDataView>>,
    /// Declared advanced-search layers, if advertised
    pub available_layers: Option<Vec<AvailableLayer>>,
    /// Declared lexical fields, if advertised
    pub available_lex_fields: Option<Vec<AvailableLexField>>,

    /// Example queries provided by the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_queries: Option<Vec<ExampleQuery>>,

    /// Nested sub-resources (owned tree, unbounded depth)
    #[serde(default)]
    pub sub_resources: Vec<Resource>,
}

/// One remote search-capable service instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint base URL
    pub url: String,
    /// FCS protocol version spoken by the endpoint
    pub protocol: ProtocolVersion,
    /// Search capabilities declared by the endpoint
    pub search_capabilities: Vec<Capability>,
}

/// The organization hosting one or more endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInstitution {
    /// Institution display name
    pub name: String,
    /// Institution website
    pub link: Option<String>,
    /// Endpoints operated by this institution
    pub endpoints: Vec<Endpoint>,

    /// Consortium this institution belongs to, if registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consortium: Option<Consortium>,

    /// True when the institution was added outside normal discovery
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sideloaded: bool,
}

/// A data view advertised by a resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDataView {
    /// Data view identifier (open set)
    pub identifier: DataViewIdentifier,
    /// MIME type of the view payload
    pub mime_type: String,
    /// Whether the view is sent by default or must be requested
    pub delivery_policy: DeliveryPolicy,
}

/// An advanced-search annotation layer advertised by a resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLayer {
    /// Layer identifier URI
    pub identifier: String,
    /// Result id the layer is delivered under
    pub result_id: String,
    /// Layer type (open set)
    pub layer_type: LayerType,
    /// Value encoding of the layer
    pub encoding: LayerEncoding,
    /// Layer qualifier, if any
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Alternative value info, if any
    #[serde(default)]
    pub alt_value_info: Option<String>,
    /// Alternative value info URI, if any
    #[serde(default, rename = "altValueInfoURI")]
    pub alt_value_info_uri: Option<String>,
}

/// A lexical field advertised by a resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailableLexField {
    /// Field identifier
    pub id: String,
    /// Field type (open set, including the virtual `lang` field)
    #[serde(rename = "type")]
    pub field_type: LexFieldType,
}

/// An example query provided by an endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleQuery {
    /// The query string
    pub query: String,
    /// Query language of the example
    pub query_type: QueryType,
    /// Description of what the example demonstrates
    pub description: LocalizedString,
}

/// Query languages accepted by the aggregator (also used as request parameters)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Basic contextual query language
    Cql,
    /// FCS-QL advanced search
    Fcs,
    /// LexCQL lexical search
    Lex,
}

impl QueryType {
    /// The wire representation of this query type
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Cql => "cql",
            QueryType::Fcs => "fcs",
            QueryType::Lex => "lex",
        }
    }
}

/// FCS protocol versions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// FCS 2.0
    #[serde(rename = "VERSION_2")]
    Version2,
    /// FCS 1.0
    #[serde(rename = "VERSION_1")]
    Version1,
    /// Pre-1.0 legacy endpoints
    #[serde(rename = "LEGACY")]
    Legacy,
}

/// Endpoint search capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Plain full-text search
    BasicSearch,
    /// Layer-annotated advanced search
    AdvancedSearch,
    /// Lexical resource search
    LexSearch,
    /// Search requiring authentication
    AuthenticatedSearch,
}

/// Resource availability restriction classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityRestriction {
    /// No restriction
    None,
    /// Requires authentication
    AuthOnly,
    /// Requires a personal identifier
    PersonalIdentifier,
}

/// Data view delivery policies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryPolicy {
    /// View is included in every response
    SendByDefault,
    /// View must be explicitly requested
    NeedToRequest,
}

/// Advanced-search layer value encodings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerEncoding {
    /// Layer spans carry values
    Value,
    /// Layer spans are markers without values
    Empty,
}

/// Known data view identifiers plus server-introduced extensions
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataViewIdentifier {
    /// Generic hits view
    Hits,
    /// Advanced (layered) view
    Adv,
    /// CMDI metadata view
    Cmdi,
    /// Keyword-in-context view
    Kwic,
    /// Lexical entry view
    Lex,
    /// An identifier not (yet) known to this library
    Other(String),
}

impl DataViewIdentifier {
    /// The wire representation of this identifier
    pub fn as_str(&self) -> &str {
        match self {
            DataViewIdentifier::Hits => "hits",
            DataViewIdentifier::Adv => "adv",
            DataViewIdentifier::Cmdi => "cmdi",
            DataViewIdentifier::Kwic => "kwic",
            DataViewIdentifier::Lex => "lex",
            DataViewIdentifier::Other(name) => name,
        }
    }
}

impl From<String> for DataViewIdentifier {
    fn from(value: String) -> Self {
        match value.as_str() {
            "hits" => DataViewIdentifier::Hits,
            "adv" => DataViewIdentifier::Adv,
            "cmdi" => DataViewIdentifier::Cmdi,
            "kwic" => DataViewIdentifier::Kwic,
            "lex" => DataViewIdentifier::Lex,
            _ => DataViewIdentifier::Other(value),
        }
    }
}

impl From<DataViewIdentifier> for String {
    fn from(value: DataViewIdentifier) -> Self {
        value.as_str().to_string()
    }
}

/// Known advanced-search layer types plus server-introduced extensions
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    /// Primary text layer
    Text,
    /// Lemmatization layer
    Lemma,
    /// Part-of-speech layer
    Pos,
    /// Orthographic transcription layer
    Orth,
    /// Normalization layer
    Norm,
    /// Phonetic transcription layer
    Phonetic,
    /// Non-standard legacy word layer
    Word,
    /// Named entity layer
    Entity,
    /// A layer type not (yet) known to this library
    Other(String),
}

impl LayerType {
    /// The wire representation of this layer type
    pub fn as_str(&self) -> &str {
        match self {
            LayerType::Text => "text",
            LayerType::Lemma => "lemma",
            LayerType::Pos => "pos",
            LayerType::Orth => "orth",
            LayerType::Norm => "norm",
            LayerType::Phonetic => "phonetic",
            LayerType::Word => "word",
            LayerType::Entity => "entity",
            LayerType::Other(name) => name,
        }
    }
}

impl From<String> for LayerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => LayerType::Text,
            "lemma" => LayerType::Lemma,
            "pos" => LayerType::Pos,
            "orth" => LayerType::Orth,
            "norm" => LayerType::Norm,
            "phonetic" => LayerType::Phonetic,
            "word" => LayerType::Word,
            "entity" => LayerType::Entity,
            _ => LayerType::Other(value),
        }
    }
}

impl From<LayerType> for String {
    fn from(value: LayerType) -> Self {
        value.as_str().to_string()
    }
}

/// Known lexical field types plus server-introduced extensions
///
/// Includes the virtual `lang` field the aggregator synthesizes for language
/// filtering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[allow(missing_docs)]
pub enum LexFieldType {
    EntryId,
    Lemma,
    Translation,
    Transcription,
    Phonetic,
    Definition,
    Etymology,
    Case,
    Number,
    Gender,
    Pos,
    Baseform,
    Segmentation,
    Sentiment,
    Frequency,
    Antonym,
    Hyponym,
    Hypernym,
    Meronym,
    Holonym,
    Synonym,
    Related,
    Ref,
    SenseRef,
    Citation,
    /// Virtual language field
    Lang,
    /// A field type not (yet) known to this library
    Other(String),
}

impl LexFieldType {
    /// The wire representation of this field type
    pub fn as_str(&self) -> &str {
        match self {
            LexFieldType::EntryId => "entryId",
            LexFieldType::Lemma => "lemma",
            LexFieldType::Translation => "translation",
            LexFieldType::Transcription => "transcription",
            LexFieldType::Phonetic => "phonetic",
            LexFieldType::Definition => "definition",
            LexFieldType::Etymology => "etymology",
            LexFieldType::Case => "case",
            LexFieldType::Number => "number",
            LexFieldType::Gender => "gender",
            LexFieldType::Pos => "pos",
            LexFieldType::Baseform => "baseform",
            LexFieldType::Segmentation => "segmentation",
            LexFieldType::Sentiment => "sentiment",
            LexFieldType::Frequency => "frequency",
            LexFieldType::Antonym => "antonym",
            LexFieldType::Hyponym => "hyponym",
            LexFieldType::Hypernym => "hypernym",
            LexFieldType::Meronym => "meronym",
            LexFieldType::Holonym => "holonym",
            LexFieldType::Synonym => "synonym",
            LexFieldType::Related => "related",
            LexFieldType::Ref => "ref",
            LexFieldType::SenseRef => "senseRef",
            LexFieldType::Citation => "citation",
            LexFieldType::Lang => "lang",
            LexFieldType::Other(name) => name,
        }
    }
}

impl From<String> for LexFieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "entryId" => LexFieldType::EntryId,
            "lemma" => LexFieldType::Lemma,
            "translation" => LexFieldType::Translation,
            "transcription" => LexFieldType::Transcription,
            "phonetic" => LexFieldType::Phonetic,
            "definition" => LexFieldType::Definition,
            "etymology" => LexFieldType::Etymology,
            "case" => LexFieldType::Case,
            "number" => LexFieldType::Number,
            "gender" => LexFieldType::Gender,
            "pos" => LexFieldType::Pos,
            "baseform" => LexFieldType::Baseform,
            "segmentation" => LexFieldType::Segmentation,
            "sentiment" => LexFieldType::Sentiment,
            "frequency" => LexFieldType::Frequency,
            "antonym" => LexFieldType::Antonym,
            "hyponym" => LexFieldType::Hyponym,
            "hypernym" => LexFieldType::Hypernym,
            "meronym" => LexFieldType::Meronym,
            "holonym" => LexFieldType::Holonym,
            "synonym" => LexFieldType::Synonym,
            "related" => LexFieldType::Related,
            "ref" => LexFieldType::Ref,
            "senseRef" => LexFieldType::SenseRef,
            "citation" => LexFieldType::Citation,
            "lang" => LexFieldType::Lang,
            _ => LexFieldType::Other(value),
        }
    }
}

impl From<LexFieldType> for String {
    fn from(value: LexFieldType) -> Self {
        value.as_str().to_string()
    }
}

impl AggregatorClient {
    /// Fetch the combined bootstrap payload (languages, resources, Weblicht languages)
    ///
    /// # Errors
    /// Returns [`Error::Network`](crate::Error::Network) on transport failure
    /// and [`Error::Decode`](crate::Error::Decode) on a non-JSON body.
    pub async fn init_data(&self, consortium: Option<&Consortium>) -> Result<InitData> {
        let url = self.scoped_endpoint("init", consortium)?;
        let init_data: InitData = self.get_json(url).await?;
        debug!(
            resources = init_data.resources.len(),
            languages = init_data.languages.len(),
            "fetched init data"
        );
        Ok(init_data)
    }

    /// Fetch the resource catalog
    ///
    /// # Errors
    /// Returns [`Error::Network`](crate::Error::Network) on transport failure
    /// and [`Error::Decode`](crate::Error::Decode) on a non-JSON body.
    pub async fn resources(&self, consortium: Option<&Consortium>) -> Result<Vec<Resource>> {
        let url = self.scoped_endpoint("resources", consortium)?;
        let resources: Vec<Resource> = self.get_json(url).await?;
        debug!(count = resources.len(), "fetched resources");
        Ok(resources)
    }

    /// Fetch the language code to display name table
    ///
    /// # Errors
    /// Returns [`Error::Network`](crate::Error::Network) on transport failure
    /// and [`Error::Decode`](crate::Error::Decode) on a non-JSON body.
    pub async fn languages(&self, consortium: Option<&Consortium>) -> Result<Languages> {
        let url = self.scoped_endpoint("languages", consortium)?;
        let languages: Languages = self.get_json(url).await?;
        debug!(count = languages.len(), "fetched languages");
        Ok(languages)
    }
}
