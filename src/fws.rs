//! Client for the FWS ServCat taxonomy REST service.
use crate::error::{CrateError, Result};
use crate::http::fetch_json;
use crate::taxon::{TaxonCandidate, TaxonLookup};
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use urlencoding::encode;

// Known-good query used to check the service is reachable.
const PROBE_NAME: &str = "Branta canadensis";

/// Operations of the taxonomy service this client can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyService {
    SearchByScientificName,
    SearchByCodes,
}

impl TaxonomyService {
    pub fn path(self) -> &'static str {
        match self {
            TaxonomyService::SearchByScientificName => "searchByScientificName",
            TaxonomyService::SearchByCodes => "searchByCodes",
        }
    }

    // Code queries already carry a `?codes=` parameter.
    fn format_suffix(self) -> &'static str {
        match self {
            TaxonomyService::SearchByScientificName => "?format=JSON",
            TaxonomyService::SearchByCodes => "&format=JSON",
        }
    }
}

/// [`TaxonLookup`] backed by the live FWS taxonomy service.
#[derive(Debug, Clone)]
pub struct FwsTaxonomyClient {
    client: Client,
    base_url: String,
}

impl FwsTaxonomyClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Builds the client and checks the service answers a probe query.
    pub async fn connect(client: Client, base_url: impl Into<String>) -> Result<Self> {
        let taxonomy = Self::new(client, base_url);
        info!("Initiating contact with FWS Taxonomy...");
        let url = taxonomy.service_url(TaxonomyService::SearchByScientificName, PROBE_NAME);
        let response = taxonomy
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| CrateError::ServiceUnavailable {
                url: url.clone(),
                source,
            })?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(CrateError::ServiceStatus {
                url,
                status: response.status(),
            });
        }
        info!("FWS taxonomy initialized.");
        Ok(taxonomy)
    }

    /// Full request URL for `service` with a percent-encoded `query`.
    pub fn service_url(&self, service: TaxonomyService, query: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!(
            "{}/{}/{}{}",
            base,
            service.path(),
            encode_query(query),
            service.format_suffix()
        )
    }
}

// Percent-encodes a path query while keeping the characters that structure
// it (`?`, `=`, `,`, `&`).
fn encode_query(query: &str) -> String {
    let mut encoded = String::with_capacity(query.len());
    let mut rest = query;
    while let Some(pos) = rest.find(['?', '=', ',', '&']) {
        encoded.push_str(&encode(&rest[..pos]));
        encoded.push_str(&rest[pos..pos + 1]);
        rest = &rest[pos + 1..];
    }
    encoded.push_str(&encode(rest));
    encoded
}

fn code_query(codes: &[u64]) -> String {
    let joined = codes
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("taxoncode?codes={}", joined)
}

#[async_trait]
impl TaxonLookup for FwsTaxonomyClient {
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<TaxonCandidate>> {
        let url = self.service_url(TaxonomyService::SearchByScientificName, name);
        fetch_json(&self.client, &url).await
    }

    async fn lookup_by_codes(&self, codes: &[u64]) -> Result<Vec<TaxonCandidate>> {
        let url = self.service_url(TaxonomyService::SearchByCodes, &code_query(codes));
        fetch_json(&self.client, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FWS_TAXONOMY_URL, HttpSettings};
    use crate::http::build_http_client;
    use crate::taxon::TaxonResolver;

    fn client() -> FwsTaxonomyClient {
        let http = build_http_client(&HttpSettings::default()).unwrap();
        FwsTaxonomyClient::new(http, FWS_TAXONOMY_URL)
    }

    #[test]
    fn scientific_name_url() {
        assert_eq!(
            client().service_url(TaxonomyService::SearchByScientificName, "Branta canadensis"),
            "https://ecos.fws.gov/ServCatServices/v2/rest/taxonomy/searchByScientificName/Branta%20canadensis?format=JSON"
        );
    }

    #[test]
    fn code_url_keeps_query_structure() {
        assert_eq!(
            client().service_url(TaxonomyService::SearchByCodes, &code_query(&[179, 42])),
            "https://ecos.fws.gov/ServCatServices/v2/rest/taxonomy/searchByCodes/taxoncode?codes=179,42&format=JSON"
        );
    }

    #[test]
    fn name_query_escapes_reserved_characters() {
        assert_eq!(encode_query("Abies × borisii-regis"), "Abies%20%C3%97%20borisii-regis");
        assert_eq!(encode_query("a=b&c"), "a=b&c");
        assert_eq!(encode_query(""), "");
    }

    #[test]
    fn base_url_without_trailing_slash() {
        let http = build_http_client(&HttpSettings::default()).unwrap();
        let taxonomy = FwsTaxonomyClient::new(http, "http://localhost:8080/taxonomy");
        assert_eq!(
            taxonomy.service_url(TaxonomyService::SearchByScientificName, "Quercus"),
            "http://localhost:8080/taxonomy/searchByScientificName/Quercus?format=JSON"
        );
    }

    #[tokio::test]
    #[ignore] // Ignored by default to avoid hitting the live service
    async fn test_best_match_canada_goose_live() {
        let http = build_http_client(&HttpSettings::default()).unwrap();
        let taxonomy = FwsTaxonomyClient::connect(http, FWS_TAXONOMY_URL).await.unwrap();
        let resolver = TaxonResolver::new(taxonomy);
        let result = resolver
            .resolve_best_match("Branta canadensis", None, None)
            .await
            .unwrap();
        println!("{:?}", result.matches());
        assert!(!result.is_no_match());
        assert!(result.matches().iter().all(|c| c.scientific_name == "Branta canadensis"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_search_by_codes_live() {
        let resolver = TaxonResolver::new(client());
        let found = resolver.resolve_by_taxon_codes(&[179]).await.unwrap();
        println!("{:?}", found);
        assert!(!found.is_empty());
    }
}
