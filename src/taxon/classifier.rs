//! Rough rank inference from the shape of a scientific name.
use super::normalizer::NormalizedName;

/// Which part of the hierarchy a queried name most likely targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBucket {
    GenusOrHigher,
    Species,
    BelowSpecies,
}

impl RankBucket {
    pub fn genus_or_higher(self) -> bool {
        self == RankBucket::GenusOrHigher
    }

    pub fn lower_than_species(self) -> bool {
        self == RankBucket::BelowSpecies
    }
}

/// Outcome of classifying a normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Working name; a synonym combination is cut down to its first binomial.
    pub clean_name: String,
    pub bucket: RankBucket,
}

/// Buckets a normalized name by word count.
///
/// One word is a genus or higher, two words a species, and more than two an
/// infraspecific name unless a `syn.` marker shows it is really a
/// "binomial syn. binomial" pair. A stripped `spp.` marker always means genus
/// or higher.
pub fn classify(normalized: &NormalizedName) -> Classification {
    let name = normalized.name.as_str();
    let words: Vec<&str> = name.split(' ').collect();

    let (clean_name, bucket) = match words.len() {
        1 => (name.to_string(), RankBucket::GenusOrHigher),
        2 => (name.to_string(), RankBucket::Species),
        _ if has_synonym_marker(&words) => (words[..2].join(" "), RankBucket::Species),
        _ => (name.to_string(), RankBucket::BelowSpecies),
    };

    let bucket = if normalized.marker_stripped {
        RankBucket::GenusOrHigher
    } else {
        bucket
    };

    Classification { clean_name, bucket }
}

// `syn`/`syn.` has to sit between two other words.
fn has_synonym_marker(words: &[&str]) -> bool {
    if words.len() < 3 {
        return false;
    }
    words[1..words.len() - 1]
        .iter()
        .any(|word| word.eq_ignore_ascii_case("syn") || word.eq_ignore_ascii_case("syn."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxon::normalizer::normalize_name;

    fn classify_raw(raw: &str) -> Classification {
        classify(&normalize_name(raw))
    }

    #[test]
    fn single_word_is_genus_or_higher() {
        let c = classify_raw("Quercus");
        assert_eq!(c.bucket, RankBucket::GenusOrHigher);
        assert_eq!(c.clean_name, "Quercus");
    }

    #[test]
    fn marker_means_genus_or_higher() {
        let c = classify_raw("Quercus spp.");
        assert_eq!(c.clean_name, "Quercus");
        assert!(c.bucket.genus_or_higher());
        assert!(!c.bucket.lower_than_species());
    }

    #[test]
    fn binomial_is_species() {
        let c = classify_raw("Quercus alba");
        assert_eq!(c.bucket, RankBucket::Species);
        assert!(!c.bucket.genus_or_higher());
        assert!(!c.bucket.lower_than_species());
    }

    #[test]
    fn trinomial_is_below_species() {
        let c = classify_raw("Quercus alba var. latifolia");
        assert_eq!(c.bucket, RankBucket::BelowSpecies);
        assert_eq!(c.clean_name, "Quercus alba var. latifolia");
    }

    #[test]
    fn synonym_pair_truncates_to_binomial() {
        let c = classify_raw("Quercus alba syn. Quercus montana");
        assert_eq!(c.clean_name, "Quercus alba");
        assert_eq!(c.bucket, RankBucket::Species);

        let c = classify_raw("Quercus alba SYN Quercus montana");
        assert_eq!(c.clean_name, "Quercus alba");
    }

    #[test]
    fn trailing_syn_is_not_a_synonym_marker() {
        let c = classify_raw("Quercus alba syn.");
        assert_eq!(c.bucket, RankBucket::BelowSpecies);
    }

    #[test]
    fn marker_wins_over_word_count() {
        let c = classify_raw("Quercus alba var sp.");
        assert_eq!(c.clean_name, "Quercus alba var");
        assert_eq!(c.bucket, RankBucket::GenusOrHigher);
    }

    #[test]
    fn blank_name_is_total() {
        let c = classify_raw("   ");
        assert_eq!(c.clean_name, "");
        assert_eq!(c.bucket, RankBucket::GenusOrHigher);
    }
}
