//! Scientific-name resolution against a taxonomy service.
//!
//! A queried name goes through [`normalizer`] and [`classifier`] to work out
//! which part of the hierarchy it targets, is looked up through a
//! [`TaxonLookup`], and the returned candidates are narrowed by [`selector`].
//! [`resolver::TaxonResolver`] ties the steps together.
pub mod classifier;
pub mod memory;
pub mod normalizer;
pub mod record;
pub mod resolver;
pub mod selector;

use crate::error::Result;
use async_trait::async_trait;

pub use classifier::{Classification, RankBucket};
pub use record::{Rank, TaxonCandidate, candidates_to_table};
pub use resolver::{Resolution, ResolutionQuery, ResolutionResult, TaxonResolver};
pub use selector::CategoryFilter;

/// Remote source of taxon records.
///
/// Implementations own transport concerns (timeouts, status handling);
/// failures come back as [`crate::error::CrateError::ServiceUnavailable`] or
/// [`crate::error::CrateError::ServiceStatus`] and are not retried.
#[async_trait]
pub trait TaxonLookup: Send + Sync {
    /// Candidates whose scientific name matches `name`.
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<TaxonCandidate>>;

    /// Records for the given FWS taxon codes.
    async fn lookup_by_codes(&self, codes: &[u64]) -> Result<Vec<TaxonCandidate>>;
}
