//! Narrows a set of lookup candidates down to the best match for a query.
//!
//! Filters run in a fixed order (category, rank, exact name, usage) and each
//! one takes the candidate list by value and hands back a new one. As soon as
//! fewer than two candidates remain the selection stops, so a lone candidate
//! is never dropped by a later, stricter filter.
use super::classifier::RankBucket;
use super::record::{Rank, TaxonCandidate};
use log::debug;
use std::collections::HashSet;

pub type CategoryFilter = HashSet<String>;

fn settled(candidates: &[TaxonCandidate]) -> bool {
    candidates.len() < 2
}

/// Runs the filter cascade. Never fails; the worst case is an empty list or
/// the unchanged input.
pub fn select_best(
    candidates: Vec<TaxonCandidate>,
    given_name: &str,
    bucket: RankBucket,
    categories: Option<&CategoryFilter>,
) -> Vec<TaxonCandidate> {
    if settled(&candidates) {
        return candidates;
    }

    let candidates = match categories {
        Some(set) if !set.is_empty() => keep_categories(candidates, set),
        _ => candidates,
    };

    let candidates = keep_rank_bucket(candidates, bucket);
    if settled(&candidates) {
        return candidates;
    }

    let candidates = prefer_exact_name(candidates, given_name);
    if settled(&candidates) {
        return candidates;
    }

    prefer_accepted_usage(candidates)
}

fn keep_categories(candidates: Vec<TaxonCandidate>, set: &CategoryFilter) -> Vec<TaxonCandidate> {
    let kept: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.category.as_ref().is_some_and(|cat| set.contains(cat)))
        .collect();
    debug!("Category filter kept {} candidate(s)", kept.len());
    kept
}

fn rank_fits(rank: &Rank, bucket: RankBucket) -> bool {
    match bucket {
        RankBucket::Species => *rank == Rank::Species,
        RankBucket::GenusOrHigher => rank.is_genus_or_higher(),
        RankBucket::BelowSpecies => rank.is_below_species(),
    }
}

fn keep_rank_bucket(candidates: Vec<TaxonCandidate>, bucket: RankBucket) -> Vec<TaxonCandidate> {
    let kept: Vec<_> = candidates
        .into_iter()
        .filter(|c| rank_fits(&c.rank, bucket))
        .collect();
    debug!("Rank filter ({:?}) kept {} candidate(s)", bucket, kept.len());
    kept
}

/// Keeps only exact (byte-for-byte) name matches when there is at least one.
fn prefer_exact_name(candidates: Vec<TaxonCandidate>, given_name: &str) -> Vec<TaxonCandidate> {
    prefer(candidates, |c| c.scientific_name == given_name, "exact name")
}

/// Keeps only valid/accepted names when there is at least one.
fn prefer_accepted_usage(candidates: Vec<TaxonCandidate>) -> Vec<TaxonCandidate> {
    prefer(candidates, TaxonCandidate::has_accepted_usage, "accepted usage")
}

fn prefer<F>(candidates: Vec<TaxonCandidate>, wanted: F, label: &str) -> Vec<TaxonCandidate>
where
    F: Fn(&TaxonCandidate) -> bool,
{
    if !candidates.iter().any(&wanted) {
        debug!("No {} candidate, keeping all {}", label, candidates.len());
        return candidates;
    }
    let kept: Vec<_> = candidates.into_iter().filter(|c| wanted(c)).collect();
    debug!("Preferring {} kept {} candidate(s)", label, kept.len());
    kept
}
