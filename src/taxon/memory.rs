//! In-memory [`TaxonLookup`] for tests and offline use.
//!
//! Answers name lookups from a fixed map and remembers every name it was
//! asked for. Codes are matched against each record's `TaxonCode`.
use super::{TaxonCandidate, TaxonLookup};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct InMemoryTaxonLookup {
    by_name: HashMap<String, Vec<TaxonCandidate>>,
    queried: Mutex<Vec<String>>,
}

impl InMemoryTaxonLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the candidates returned for an exact lookup name.
    pub fn with_name(mut self, name: impl Into<String>, candidates: Vec<TaxonCandidate>) -> Self {
        self.by_name.insert(name.into(), candidates);
        self
    }

    /// Names passed to [`TaxonLookup::lookup_by_name`], in call order.
    pub fn queried_names(&self) -> Vec<String> {
        self.queried
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TaxonLookup for InMemoryTaxonLookup {
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<TaxonCandidate>> {
        self.queried
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        Ok(self.by_name.get(name).cloned().unwrap_or_default())
    }

    async fn lookup_by_codes(&self, codes: &[u64]) -> Result<Vec<TaxonCandidate>> {
        let wanted: Vec<String> = codes.iter().map(u64::to_string).collect();
        Ok(self
            .by_name
            .values()
            .flatten()
            .filter(|c| c.taxon_code.as_ref().is_some_and(|code| wanted.contains(code)))
            .cloned()
            .collect())
    }
}
