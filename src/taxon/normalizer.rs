//! Scientific-name cleanup ahead of a taxonomy lookup.
use crate::error::{CrateError, Result};

/// Informal rank abbreviations standing in for a species epithet.
const INFORMAL_RANK_MARKERS: [&str; 4] = ["spp.", "spp", "sp.", "sp"];

/// A scientific name after whitespace cleanup and marker stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub name: String,
    /// A trailing `spp.`-style marker was removed, so the caller meant a
    /// genus (or something higher).
    pub marker_stripped: bool,
}

/// Trims, collapses whitespace runs and strips trailing informal rank markers.
/// Blank input passes through as an empty name.
pub fn normalize_name(raw: &str) -> NormalizedName {
    let mut name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut marker_stripped = false;

    // Repeat until no marker closes the name so stacked markers ("sp. spp.")
    // all go and a second pass is a no-op.
    while let Some(stripped) = INFORMAL_RANK_MARKERS
        .iter()
        .find_map(|marker| strip_trailing_marker(&name, marker))
    {
        name = stripped;
        marker_stripped = true;
    }

    NormalizedName {
        name: name.trim().to_string(),
        marker_stripped,
    }
}

/// Same cleanup as [`normalize_name`], used by the plain search entry point
/// where a blank name is rejected.
pub fn normalize_search_name(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(CrateError::InvalidArgument(
            "scientific name must not be blank".to_string(),
        ));
    }
    Ok(normalize_name(raw).name)
}

// Removes `marker` when it closes the name and follows whitespace.
fn strip_trailing_marker(name: &str, marker: &str) -> Option<String> {
    let split_at = name.len().checked_sub(marker.len())?;
    let (head, tail) = (name.get(..split_at)?, name.get(split_at..)?);
    if !tail.eq_ignore_ascii_case(marker) {
        return None;
    }
    let kept = head.trim_end();
    if kept.len() == head.len() {
        // marker glued to the previous word, e.g. "Grasp"
        return None;
    }
    Some(kept.to_string())
}
