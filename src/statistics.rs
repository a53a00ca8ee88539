//! Aggregator operational statistics accessor
//!
//! A read-only snapshot partitioned into a "last scan" and a "recent searches"
//! section, each keyed by institution name and then endpoint URL. Counters are
//! incremented server-side; this client only decodes them.

use crate::client::AggregatorClient;
use crate::consortia::Consortium;
use crate::error::Result;
use crate::resources::{Capability, ProtocolVersion};
use crate::types::{Diagnostic, Exception};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregator-wide operational snapshot
///
/// Response for `/statistics`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Statistics collected during the last endpoint scan
    #[serde(rename = "last-scan")]
    pub last_scan: StatisticsSection,
    /// Statistics collected over recent searches
    #[serde(rename = "recent-searches")]
    pub recent_searches: StatisticsSection,
}

/// One section of the statistics snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSection {
    /// Per-institution, per-endpoint counters
    pub institutions: BTreeMap<String, BTreeMap<String, InstitutionEndpointInfo>>,
    /// When the section was collected
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Request timeout in effect during collection, in seconds
    pub timeout: i64,
    /// True when the section stems from a scan rather than searches
    pub is_scan: bool,
}

/// Counters and capabilities for one endpoint of one institution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionEndpointInfo {
    /// FCS protocol version spoken by the endpoint
    pub version: ProtocolVersion,
    /// Search capabilities seen on the endpoint
    pub search_capabilities: Vec<Capability>,

    /// Root resources of the endpoint, bare handles or detailed records
    pub root_resources: RootResources,

    /// Categorized diagnostic tallies, keyed by reason
    pub diagnostics: BTreeMap<String, DiagnosticInfo>,
    /// Categorized error tallies, keyed by reason
    pub errors: BTreeMap<String, ErrorInfo>,

    /// Maximum number of concurrent requests observed
    pub max_concurrent_requests: u32,

    /// Total number of requests issued
    pub number_of_requests: u64,

    /// Maximum queue time in seconds
    pub max_queue_time: f64,
    /// Average queue time in seconds
    pub avg_queue_time: f64,
    /// Average execution time in seconds
    pub avg_execution_time: f64,
    /// Maximum execution time in seconds
    pub max_execution_time: f64,
}

/// Root resources reported for an endpoint, in either wire shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RootResources {
    /// Bare resource handles
    Handles(Vec<String>),
    /// Detailed per-resource records
    Detailed(Vec<StatisticsResourceInfo>),
}

/// Validation detail for one root resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResourceInfo {
    /// Persistent handle of the resource
    pub handle: String,
    /// Resource title
    pub title: String,
    /// True when the resource description validated
    pub valid: bool,
    /// Validation notes
    pub notes: Vec<String>,
}

/// One categorized diagnostic tally
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// The diagnostic this tally counts
    pub diagnostic: Diagnostic,
    /// Context in which the diagnostic occurred
    pub context: String,
    /// Number of occurrences (monotonically incremented server-side)
    pub counter: u64,
}

/// One categorized error tally
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// The exception this tally counts
    pub exception: Exception,
    /// Context in which the exception occurred
    pub context: String,
    /// Number of occurrences (monotonically incremented server-side)
    pub counter: u64,
}

impl AggregatorClient {
    /// Fetch aggregator operational statistics
    ///
    /// # Errors
    /// Returns [`Error::Network`](crate::Error::Network) on transport failure
    /// and [`Error::Decode`](crate::Error::Decode) on a non-JSON body.
    pub async fn statistics(&self, consortium: Option<&Consortium>) -> Result<Statistics> {
        let url = self.scoped_endpoint("statistics", consortium)?;
        let statistics: Statistics = self.get_json(url).await?;
        debug!(
            scan_institutions = statistics.last_scan.institutions.len(),
            search_institutions = statistics.recent_searches.institutions.len(),
            "fetched statistics"
        );
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_statistics_json() -> serde_json::Value {
        json!({
            "last-scan": {
                "institutions": {
                    "Example Institution": {
                        "https://fcs.example.org/sru": {
                            "version": "VERSION_2",
                            "searchCapabilities": ["BASIC_SEARCH", "ADVANCED_SEARCH"],
                            "rootResources": [
                                {
                                    "handle": "hdl:11022/example-0001",
                                    "title": "Example Corpus",
                                    "valid": true,
                                    "notes": []
                                }
                            ],
                            "diagnostics": {},
                            "errors": {},
                            "maxConcurrentRequests": 4,
                            "numberOfRequests": 12,
                            "maxQueueTime": 0.5,
                            "avgQueueTime": 0.1,
                            "avgExecutionTime": 1.2,
                            "maxExecutionTime": 4.8
                        }
                    }
                },
                "date": 1724932800000i64,
                "timeout": 600,
                "isScan": true
            },
            "recent-searches": {
                "institutions": {
                    "Example Institution": {
                        "https://fcs.example.org/sru": {
                            "version": "VERSION_2",
                            "searchCapabilities": ["BASIC_SEARCH"],
                            "rootResources": ["hdl:11022/example-0001"],
                            "diagnostics": {
                                "General system error": {
                                    "diagnostic": {
                                        "uri": "info:srw/diagnostic/1/1",
                                        "message": "General system error",
                                        "diagnostic": null
                                    },
                                    "context": "https://fcs.example.org/sru?query=x",
                                    "counter": 3
                                }
                            },
                            "errors": {
                                "Connection refused": {
                                    "exception": {
                                        "klass": "java.net.ConnectException",
                                        "message": "Connection refused",
                                        "cause": null
                                    },
                                    "context": "https://fcs.example.org/sru?query=y",
                                    "counter": 1
                                }
                            },
                            "maxConcurrentRequests": 2,
                            "numberOfRequests": 40,
                            "maxQueueTime": 1.5,
                            "avgQueueTime": 0.3,
                            "avgExecutionTime": 2.0,
                            "maxExecutionTime": 10.0
                        }
                    }
                },
                "date": 1724936400000i64,
                "timeout": 30,
                "isScan": false
            }
        })
    }

    #[test]
    fn statistics_decodes_both_root_resource_shapes() {
        let statistics: Statistics = serde_json::from_value(sample_statistics_json()).unwrap();

        let scan_info = &statistics.last_scan.institutions["Example Institution"]
            ["https://fcs.example.org/sru"];
        match &scan_info.root_resources {
            RootResources::Detailed(resources) => {
                assert_eq!(resources[0].title, "Example Corpus");
                assert!(resources[0].valid);
            }
            other => panic!("expected detailed root resources, got {other:?}"),
        }

        let search_info = &statistics.recent_searches.institutions["Example Institution"]
            ["https://fcs.example.org/sru"];
        assert_eq!(
            search_info.root_resources,
            RootResources::Handles(vec!["hdl:11022/example-0001".to_string()])
        );
        assert_eq!(
            search_info.diagnostics["General system error"].counter,
            3
        );
        assert_eq!(search_info.errors["Connection refused"].counter, 1);
        assert!(statistics.last_scan.is_scan);
        assert_eq!(statistics.last_scan.date.timestamp_millis(), 1724932800000);
    }

    #[tokio::test]
    async fn statistics_honours_consortium_scoping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/statistics"))
            .and(query_param("x-consortia", "SWE-CLARIN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_statistics_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AggregatorClient::with_base_url(server.uri()).unwrap();
        let scope = Consortium::SweClarin;
        let statistics = client.statistics(Some(&scope)).await.unwrap();
        assert_eq!(statistics.recent_searches.timeout, 30);
    }

    #[tokio::test]
    async fn unscoped_statistics_request_has_no_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_statistics_json()))
            .mount(&server)
            .await;

        let client = AggregatorClient::with_base_url(server.uri()).unwrap();
        client.statistics(None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_none());
    }
}
