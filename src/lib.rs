//! # fcs-aggregator-client
//!
//! Typed async client library for the FCS (Federated Content Search)
//! aggregator REST API.
//!
//! ## Design Philosophy
//!
//! fcs-aggregator-client is designed to be:
//! - **Thin** - typed request/response shapes plus one HTTP call per method,
//!   no scheduling, caching or retry logic
//! - **Stateless** - a search is identified by an opaque server-issued id;
//!   the client holds no record of live searches, so arbitrarily many
//!   independent observers can track the same search
//! - **Strict** - responses are decoded as JSON or fail loudly, never
//!   silently degraded to text
//! - **Observable** - every request emits `tracing` events; the embedding
//!   application chooses the subscriber
//!
//! ## Quick Start
//!
//! ```no_run
//! use fcs_aggregator_client::{AggregatorClient, QueryType, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AggregatorClient::with_base_url("https://contentsearch.clarin.eu/rest/")?;
//!
//!     let resources = client.resources(None).await?;
//!     let resource_ids: Vec<String> = resources.iter().take(2).map(|r| r.id.clone()).collect();
//!
//!     let search_id = client
//!         .submit_search(&SearchRequest {
//!             query: "\"Haus\"".to_string(),
//!             query_type: QueryType::Cql,
//!             language: "mul".to_string(),
//!             number_of_results: 20,
//!             resource_ids,
//!         })
//!         .await?;
//!
//!     let snapshot = client.search_results(&search_id).await?;
//!     println!(
//!         "{} of {} resources still in progress",
//!         snapshot.in_progress,
//!         snapshot.results.len()
//!     );
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Client construction and shared request plumbing
pub mod client;
/// Consortium identifiers and accessor
pub mod consortia;
/// Export URL builders
pub mod download;
/// Error types
pub mod error;
/// Resource catalog and language accessors
pub mod resources;
/// Search lifecycle client
pub mod search;
/// Operational statistics accessor
pub mod statistics;
/// Shared wire types
pub mod types;

// Re-export commonly used types
pub use client::{AggregatorClient, ClientConfig, DEFAULT_TIMEOUT};
pub use consortia::{Consortium, REQ_PARAM_CONSORTIA};
pub use download::{DownloadFormat, LanguageFilter};
pub use error::{Error, Result};
pub use resources::{
    AvailabilityRestriction, Capability, Endpoint, EndpointInstitution, InitData, Languages,
    ProtocolVersion, QueryType, Resource,
};
pub use search::{
    MoreResultsRequest, RecordView, ResourceSearchResult, ResourceSearchResultMetaOnly,
    ResultRecord, SearchRequest, SearchResults, SearchResultsMetaOnly,
};
pub use statistics::Statistics;
pub use types::{Diagnostic, Exception, LocalizedString};
