//! Taxon records as returned by the FWS taxonomy service.
use crate::table::Table;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// Taxonomic rank as labelled by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rank {
    Domain,
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    Subspecies,
    Variety,
    Form,
    Cultivar,
    Other(String),
}

impl Rank {
    pub fn parse(label: &str) -> Self {
        match label {
            "Domain" => Rank::Domain,
            "Kingdom" => Rank::Kingdom,
            "Phylum" => Rank::Phylum,
            "Class" => Rank::Class,
            "Order" => Rank::Order,
            "Family" => Rank::Family,
            "Genus" => Rank::Genus,
            "Species" => Rank::Species,
            "Subspecies" => Rank::Subspecies,
            "Variety" => Rank::Variety,
            "Form" => Rank::Form,
            "Cultivar" => Rank::Cultivar,
            other => Rank::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rank::Domain => "Domain",
            Rank::Kingdom => "Kingdom",
            Rank::Phylum => "Phylum",
            Rank::Class => "Class",
            Rank::Order => "Order",
            Rank::Family => "Family",
            Rank::Genus => "Genus",
            Rank::Species => "Species",
            Rank::Subspecies => "Subspecies",
            Rank::Variety => "Variety",
            Rank::Form => "Form",
            Rank::Cultivar => "Cultivar",
            Rank::Other(label) => label.as_str(),
        }
    }

    pub fn is_genus_or_higher(&self) -> bool {
        matches!(
            self,
            Rank::Domain
                | Rank::Kingdom
                | Rank::Phylum
                | Rank::Class
                | Rank::Order
                | Rank::Family
                | Rank::Genus
        )
    }

    pub fn is_below_species(&self) -> bool {
        matches!(
            self,
            Rank::Variety | Rank::Subspecies | Rank::Form | Rank::Cultivar
        )
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(Rank::parse(label.as_deref().unwrap_or("")))
    }
}

/// Usage statuses that mark a currently accepted name.
pub const ACCEPTED_USAGES: [&str; 2] = ["valid", "accepted"];

/// One candidate taxon from a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonCandidate {
    pub scientific_name: String,
    pub rank: Rank,
    pub usage: String,
    /// `TaxonCode` as text, whatever JSON type the service used.
    pub taxon_code: Option<String>,
    /// Set when this record is a synonym pointing at the accepted taxon.
    pub accepted_taxon_code: Option<String>,
    /// External authority code (ITIS TSN) from the classification source.
    pub classification_source_code: Option<String>,
    /// NPSpecies category.
    pub category: Option<String>,
    /// Remaining fields of the service record, untouched. Includes the raw
    /// `TaxonCode`, `AcceptedTaxa` and `ClassificationSource` values the
    /// codes above are derived from.
    pub extra: Map<String, Value>,
}

impl TaxonCandidate {
    pub fn has_accepted_usage(&self) -> bool {
        ACCEPTED_USAGES.contains(&self.usage.as_str())
    }

    /// Flattens the candidate back into a service-shaped row with the
    /// derived codes appended.
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("ScientificName".into(), Value::from(self.scientific_name.as_str()));
        row.insert("Rank".into(), Value::from(self.rank.as_str()));
        row.insert("Usage".into(), Value::from(self.usage.as_str()));
        row.insert("NPSpeciesCategory".into(), optional(&self.category));
        for (key, value) in &self.extra {
            row.insert(key.clone(), value.clone());
        }
        if !row.contains_key("TaxonCode") {
            row.insert("TaxonCode".into(), optional(&self.taxon_code));
        }
        row.insert("AcceptedTaxonCode".into(), optional(&self.accepted_taxon_code));
        row.insert("TSN".into(), optional(&self.classification_source_code));
        row
    }
}

/// Raw lookup output as a table, one row per candidate.
pub fn candidates_to_table(candidates: &[TaxonCandidate]) -> Table {
    Table::from_rows(candidates.iter().map(TaxonCandidate::to_row).collect())
}

fn optional(value: &Option<String>) -> Value {
    value.as_deref().map(Value::from).unwrap_or(Value::Null)
}

// Wire shape of a service record. The code-bearing fields stay in `extra`
// verbatim; their loosely typed values are narrowed here, once, so the rest
// of the crate never inspects JSON shapes.
#[derive(Debug, Deserialize)]
struct RawTaxonRecord {
    #[serde(rename = "ScientificName", default)]
    scientific_name: Option<String>,
    #[serde(rename = "Rank", default = "unknown_rank")]
    rank: Rank,
    #[serde(rename = "Usage", default)]
    usage: Option<String>,
    #[serde(rename = "NPSpeciesCategory", default)]
    category: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn unknown_rank() -> Rank {
    Rank::Other(String::new())
}

impl From<RawTaxonRecord> for TaxonCandidate {
    fn from(raw: RawTaxonRecord) -> Self {
        let taxon_code = raw.extra.get("TaxonCode").and_then(code_text);
        let accepted_taxon_code = raw.extra.get("AcceptedTaxa").and_then(first_accepted_code);
        let classification_source_code = raw
            .extra
            .get("ClassificationSource")
            .and_then(classification_detail_code);
        TaxonCandidate {
            scientific_name: raw.scientific_name.unwrap_or_default(),
            rank: raw.rank,
            usage: raw.usage.unwrap_or_default(),
            taxon_code,
            accepted_taxon_code,
            classification_source_code,
            category: raw.category,
            extra: raw.extra,
        }
    }
}

impl<'de> Deserialize<'de> for TaxonCandidate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawTaxonRecord::deserialize(deserializer).map(TaxonCandidate::from)
    }
}

// Codes arrive as numbers or strings depending on the endpoint.
fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn first_accepted_code(accepted_taxa: &Value) -> Option<String> {
    accepted_taxa
        .as_array()
        .and_then(|taxa| taxa.first())
        .and_then(|taxon| taxon.get("TaxonCode"))
        .and_then(code_text)
}

fn classification_detail_code(source: &Value) -> Option<String> {
    source
        .as_object()
        .and_then(|source| source.get("Detail"))
        .and_then(|detail| detail.get("Code"))
        .and_then(code_text)
}
