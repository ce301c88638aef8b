//! Ties normalization, lookup and best-match selection together.
use super::classifier::{RankBucket, classify};
use super::normalizer::{NormalizedName, normalize_name, normalize_search_name};
use super::selector::{CategoryFilter, select_best};
use super::{TaxonCandidate, TaxonLookup};
use crate::error::Result;
use crate::table::{Row, Table};
use log::{debug, info};
use serde_json::Value;

/// A caller's name plus what was inferred from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionQuery {
    /// Exactly as supplied.
    pub given_name: String,
    pub clean_name: String,
    pub bucket: RankBucket,
}

impl ResolutionQuery {
    pub fn from_given_name(given_name: &str) -> Self {
        Self::from_normalized(given_name, &normalize_name(given_name))
    }

    /// Builds the query from a name that was already normalized.
    pub fn from_normalized(given_name: &str, normalized: &NormalizedName) -> Self {
        let classification = classify(normalized);
        Self {
            given_name: given_name.to_string(),
            clean_name: classification.clean_name,
            bucket: classification.bucket,
        }
    }

    pub fn genus_or_higher(&self) -> bool {
        self.bucket.genus_or_higher()
    }

    pub fn lower_than_species(&self) -> bool {
        self.bucket.lower_than_species()
    }

    fn annotate(&self, row: &mut Row) {
        row.insert("given_name".into(), Value::from(self.given_name.as_str()));
        row.insert("clean_name".into(), Value::from(self.clean_name.as_str()));
        row.insert("genus_or_higher".into(), Value::from(self.genus_or_higher()));
        row.insert("lower_than_species".into(), Value::from(self.lower_than_species()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The service had nothing for the name.
    NoCandidates,
    /// What survived selection; may still be empty or hold several records.
    Selected(Vec<TaxonCandidate>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub query: ResolutionQuery,
    pub resolution: Resolution,
}

impl ResolutionResult {
    /// Applies best-match selection to the raw lookup output.
    pub fn from_candidates(
        query: ResolutionQuery,
        candidates: Vec<TaxonCandidate>,
        categories: Option<&CategoryFilter>,
    ) -> Self {
        let resolution = if candidates.is_empty() {
            Resolution::NoCandidates
        } else {
            Resolution::Selected(select_best(
                candidates,
                &query.given_name,
                query.bucket,
                categories,
            ))
        };
        Self { query, resolution }
    }

    pub fn matches(&self) -> &[TaxonCandidate] {
        match &self.resolution {
            Resolution::NoCandidates => &[],
            Resolution::Selected(candidates) => candidates.as_slice(),
        }
    }

    pub fn is_no_match(&self) -> bool {
        self.resolution == Resolution::NoCandidates
    }

    /// The single remaining candidate, if selection got down to one.
    pub fn unique(&self) -> Option<&TaxonCandidate> {
        match self.matches() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// One row per remaining candidate with the query fields appended. With no
    /// candidates at all the table is a single row of query fields only.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        match &self.resolution {
            Resolution::NoCandidates => {
                let mut row = Row::new();
                self.query.annotate(&mut row);
                table.push(row);
            }
            Resolution::Selected(candidates) => {
                for candidate in candidates {
                    let mut row = candidate.to_row();
                    self.query.annotate(&mut row);
                    table.push(row);
                }
            }
        }
        table
    }
}

/// Name resolution over any [`TaxonLookup`].
#[derive(Debug, Clone)]
pub struct TaxonResolver<L> {
    lookup: L,
}

impl<L: TaxonLookup> TaxonResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Plain lookup of a cleaned name; candidates come back unfiltered.
    pub async fn resolve_by_scientific_name(&self, name: &str) -> Result<Vec<TaxonCandidate>> {
        let clean = normalize_search_name(name)?;
        info!("Searching taxonomy for '{}'", clean);
        self.lookup.lookup_by_name(&clean).await
    }

    pub async fn resolve_by_taxon_codes(&self, codes: &[u64]) -> Result<Vec<TaxonCandidate>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        info!("Searching taxonomy for {} taxon code(s)", codes.len());
        self.lookup.lookup_by_codes(codes).await
    }

    /// Looks a name up and narrows the candidates to the best match.
    ///
    /// Blank names are not rejected here; they reach the lookup as an empty
    /// string. `kingdom` is accepted for call compatibility but does not
    /// filter anything yet.
    pub async fn resolve_best_match(
        &self,
        name: &str,
        categories: Option<&CategoryFilter>,
        kingdom: Option<&str>,
    ) -> Result<ResolutionResult> {
        let normalized = normalize_name(name);
        let query = ResolutionQuery::from_normalized(name, &normalized);
        debug!(
            "Resolving '{}' as '{}' ({:?})",
            query.given_name, query.clean_name, query.bucket
        );
        if let Some(kingdom) = kingdom {
            debug!("Kingdom '{}' given; kingdom filtering is not applied", kingdom);
        }

        let candidates = self.lookup.lookup_by_name(&normalized.name).await?;
        info!("'{}' returned {} candidate(s)", normalized.name, candidates.len());

        Ok(ResolutionResult::from_candidates(query, candidates, categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrateError;
    use crate::taxon::memory::InMemoryTaxonLookup;
    use async_trait::async_trait;
    use serde_json::json;

    fn candidate(value: Value) -> TaxonCandidate {
        serde_json::from_value(value).unwrap()
    }

    fn oak_lookup() -> InMemoryTaxonLookup {
        InMemoryTaxonLookup::new()
            .with_name(
                "Quercus alba",
                vec![
                    candidate(json!({"ScientificName": "Quercus alba", "Rank": "Species", "Usage": "invalid", "TaxonCode": 1})),
                    candidate(json!({"ScientificName": "Quercus robur", "Rank": "Species", "Usage": "valid", "TaxonCode": 2})),
                ],
            )
            .with_name(
                "Quercus",
                vec![
                    candidate(json!({"ScientificName": "Quercus", "Rank": "Genus", "Usage": "accepted", "TaxonCode": 3})),
                    candidate(json!({"ScientificName": "Quercus alba", "Rank": "Species", "Usage": "valid", "TaxonCode": 4})),
                ],
            )
    }

    #[test]
    fn query_flags_follow_classification() {
        let query = ResolutionQuery::from_given_name("Quercus spp.");
        assert_eq!(query.given_name, "Quercus spp.");
        assert_eq!(query.clean_name, "Quercus");
        assert!(query.genus_or_higher());
        assert!(!query.lower_than_species());

        let query = ResolutionQuery::from_given_name("Quercus alba var. latifolia");
        assert!(query.lower_than_species());
        assert!(!query.genus_or_higher());
    }

    #[test]
    fn query_from_normalized_keeps_given_name() {
        let given = "  Carex   sp. ";
        let normalized = normalize_name(given);
        let query = ResolutionQuery::from_normalized(given, &normalized);
        assert_eq!(query, ResolutionQuery::from_given_name(given));
        assert_eq!(query.given_name, given);
        assert_eq!(query.clean_name, normalized.name);
        assert!(query.genus_or_higher());
    }

    #[tokio::test]
    async fn no_candidates_echoes_query() {
        let resolver = TaxonResolver::new(InMemoryTaxonLookup::new());
        let result = resolver
            .resolve_best_match("Nonexistent thing", None, None)
            .await
            .unwrap();
        assert!(result.is_no_match());

        let table = result.to_table();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.columns(),
            ["given_name", "clean_name", "genus_or_higher", "lower_than_species"]
        );
        let row = &table.rows()[0];
        assert_eq!(row["given_name"], json!("Nonexistent thing"));
        assert_eq!(row["clean_name"], json!("Nonexistent thing"));
        assert_eq!(row["genus_or_higher"], json!(false));
        assert_eq!(row["lower_than_species"], json!(false));
    }

    #[tokio::test]
    async fn exact_name_preferred_over_valid_usage() {
        let resolver = TaxonResolver::new(oak_lookup());
        let result = resolver
            .resolve_best_match("Quercus alba", None, None)
            .await
            .unwrap();
        let best = result.unique().unwrap();
        assert_eq!(best.scientific_name, "Quercus alba");
        assert_eq!(best.usage, "invalid");

        let table = result.to_table();
        let row = &table.rows()[0];
        assert_eq!(row["ScientificName"], json!("Quercus alba"));
        assert_eq!(row["given_name"], json!("Quercus alba"));
        assert_eq!(row["TaxonCode"], json!(1));
    }

    #[tokio::test]
    async fn marker_name_is_looked_up_clean_and_matched_as_genus() {
        let resolver = TaxonResolver::new(oak_lookup());
        let result = resolver
            .resolve_best_match("Quercus spp.", None, Some("Plantae"))
            .await
            .unwrap();
        assert_eq!(resolver.lookup().queried_names(), ["Quercus"]);
        assert_eq!(result.unique().unwrap().rank, crate::taxon::Rank::Genus);
        assert!(result.query.genus_or_higher());
    }

    #[tokio::test]
    async fn filters_can_leave_nothing() {
        let resolver = TaxonResolver::new(oak_lookup());
        let categories: CategoryFilter = ["Fish".to_string()].into();
        let result = resolver
            .resolve_best_match("Quercus alba", Some(&categories), None)
            .await
            .unwrap();
        assert!(!result.is_no_match());
        assert!(result.matches().is_empty());
        assert!(result.to_table().is_empty());
    }

    #[tokio::test]
    async fn blank_best_match_reaches_lookup() {
        let resolver = TaxonResolver::new(oak_lookup());
        let result = resolver.resolve_best_match("   ", None, None).await.unwrap();
        assert!(result.is_no_match());
        assert_eq!(resolver.lookup().queried_names(), [""]);
        assert_eq!(result.to_table().rows()[0]["given_name"], json!("   "));
    }

    #[tokio::test]
    async fn plain_search_rejects_blank_and_returns_unfiltered() {
        let resolver = TaxonResolver::new(oak_lookup());
        assert!(matches!(
            resolver.resolve_by_scientific_name("").await,
            Err(CrateError::InvalidArgument(_))
        ));
        assert!(resolver.lookup().queried_names().is_empty());

        let raw = resolver.resolve_by_scientific_name(" Quercus   alba ").await.unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[tokio::test]
    async fn code_search() {
        let resolver = TaxonResolver::new(oak_lookup());
        assert!(resolver.resolve_by_taxon_codes(&[]).await.unwrap().is_empty());

        let found = resolver.resolve_by_taxon_codes(&[3]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].scientific_name, "Quercus");
    }

    struct DownLookup;

    fn down() -> CrateError {
        CrateError::ServiceStatus {
            url: "https://example.invalid/taxonomy".to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[async_trait]
    impl TaxonLookup for DownLookup {
        async fn lookup_by_name(&self, _name: &str) -> Result<Vec<TaxonCandidate>> {
            Err(down())
        }

        async fn lookup_by_codes(&self, _codes: &[u64]) -> Result<Vec<TaxonCandidate>> {
            Err(down())
        }
    }

    #[tokio::test]
    async fn lookup_errors_propagate() {
        let resolver = TaxonResolver::new(DownLookup);
        let err = resolver
            .resolve_best_match("Quercus alba", None, None)
            .await
            .unwrap_err();
        assert!(err.is_service_unavailable());
        assert!(matches!(err, CrateError::ServiceStatus { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE));
    }
}
