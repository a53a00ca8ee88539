//! Consortium identifiers and the `/consortia` accessor

use crate::client::AggregatorClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Query parameter used to scope requests to one consortium
pub const REQ_PARAM_CONSORTIA: &str = "x-consortia";

/// CLARIN centre registry consortium identifier
///
/// Open enumeration: the known registry identifiers get named variants and any
/// server-introduced value is preserved in [`Consortium::Other`], so decoding
/// never fails on new consortia.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Consortium {
    /// CLARIAH-AT (Austria)
    ClariahAt,
    /// CLARIN-BE (Belgium)
    ClarinBe,
    /// CLARIN-D (Germany)
    ClarinD,
    /// CLARIN-DK (Denmark)
    ClarinDk,
    /// CLARIN-IT (Italy)
    ClarinIt,
    /// CLARIN-LV (Latvia)
    ClarinLv,
    /// CLARIN-PL (Poland)
    ClarinPl,
    /// FIN-CLARIN (Finland)
    FinClarin,
    /// LINDAT/CLARIAH-CZ (Czechia)
    LindatClariahCz,
    /// PORTULAN CLARIN (Portugal)
    PortulanClarin,
    /// SWE-CLARIN (Sweden)
    SweClarin,
    /// A consortium identifier not (yet) known to this library
    Other(String),
}

impl Consortium {
    /// The wire representation of this consortium identifier
    pub fn as_str(&self) -> &str {
        match self {
            Consortium::ClariahAt => "CLARIAH-AT",
            Consortium::ClarinBe => "CLARIN-BE",
            Consortium::ClarinD => "CLARIN-D",
            Consortium::ClarinDk => "CLARIN-DK",
            Consortium::ClarinIt => "CLARIN-IT",
            Consortium::ClarinLv => "CLARIN-LV",
            Consortium::ClarinPl => "CLARIN-PL",
            Consortium::FinClarin => "FIN-CLARIN",
            Consortium::LindatClariahCz => "LINDAT/CLARIAH-CZ",
            Consortium::PortulanClarin => "PORTULAN CLARIN",
            Consortium::SweClarin => "SWE-CLARIN",
            Consortium::Other(name) => name,
        }
    }
}

impl From<String> for Consortium {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CLARIAH-AT" => Consortium::ClariahAt,
            "CLARIN-BE" => Consortium::ClarinBe,
            "CLARIN-D" => Consortium::ClarinD,
            "CLARIN-DK" => Consortium::ClarinDk,
            "CLARIN-IT" => Consortium::ClarinIt,
            "CLARIN-LV" => Consortium::ClarinLv,
            "CLARIN-PL" => Consortium::ClarinPl,
            "FIN-CLARIN" => Consortium::FinClarin,
            "LINDAT/CLARIAH-CZ" => Consortium::LindatClariahCz,
            "PORTULAN CLARIN" => Consortium::PortulanClarin,
            "SWE-CLARIN" => Consortium::SweClarin,
            _ => Consortium::Other(value),
        }
    }
}

impl From<&str> for Consortium {
    fn from(value: &str) -> Self {
        Consortium::from(value.to_string())
    }
}

impl From<Consortium> for String {
    fn from(value: Consortium) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Consortium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AggregatorClient {
    /// Fetch the list of known consortium identifiers
    ///
    /// The server response may contain `null` placeholders for unregistered
    /// entries; these are filtered out, preserving the order of the rest.
    ///
    /// # Errors
    /// Returns [`Error::Network`](crate::Error::Network) on transport failure
    /// and [`Error::Decode`](crate::Error::Decode) on a non-JSON body.
    pub async fn consortia(&self) -> Result<Vec<Consortium>> {
        let url = self.endpoint("consortia")?;
        let entries: Vec<Option<Consortium>> = self.get_json(url).await?;
        let consortia: Vec<Consortium> = entries.into_iter().flatten().collect();
        debug!(count = consortia.len(), "fetched consortia");
        Ok(consortia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn known_identifiers_round_trip() {
        for name in [
            "CLARIAH-AT",
            "CLARIN-D",
            "LINDAT/CLARIAH-CZ",
            "PORTULAN CLARIN",
        ] {
            let consortium = Consortium::from(name);
            assert!(!matches!(consortium, Consortium::Other(_)), "{name}");
            assert_eq!(consortium.as_str(), name);
        }
    }

    #[test]
    fn unknown_identifier_is_preserved() {
        let consortium = Consortium::from("CLARIN-XX");
        assert_eq!(consortium, Consortium::Other("CLARIN-XX".to_string()));
        assert_eq!(consortium.to_string(), "CLARIN-XX");
    }

    #[tokio::test]
    async fn consortia_filters_null_placeholders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/consortia"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                "CLARIN-D",
                null,
                "SWE-CLARIN",
                null,
                "CLARIN-XX"
            ])))
            .mount(&server)
            .await;

        let client = AggregatorClient::with_base_url(server.uri()).unwrap();
        let consortia = client.consortia().await.unwrap();
        assert_eq!(
            consortia,
            vec![
                Consortium::ClarinD,
                Consortium::SweClarin,
                Consortium::Other("CLARIN-XX".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn consortia_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/consortia"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AggregatorClient::with_base_url(server.uri()).unwrap();
        let err = client.consortia().await.unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)));
    }
}
