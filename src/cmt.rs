//! USFWS Corporate Master Table (facility list).
//!
//! The service is only reachable from the USFWS network.
use crate::error::{CrateError, Result};
use crate::geo::{Feature, FeatureCollection, Geometry};
use crate::http::fetch_json;
use crate::table::Table;
use log::info;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeSet;

/// Legacy USFWS regions are numbered 0 through 9.
pub const MAX_LEGACY_REGION: u8 = 9;

/// Checks requested regions, defaulting to all of them. Sorted and
/// de-duplicated.
pub fn legacy_regions(requested: Option<&[u8]>) -> Result<BTreeSet<u8>> {
    let regions: BTreeSet<u8> = match requested {
        None => (0..=MAX_LEGACY_REGION).collect(),
        Some(regions) => regions.iter().copied().collect(),
    };
    if regions.iter().any(|region| *region > MAX_LEGACY_REGION) {
        return Err(CrateError::InvalidArgument(format!(
            "One or more invalid region values provided. Here is the set: {:?}",
            regions
        )));
    }
    Ok(regions)
}

pub fn cmt_url(base_url: &str, regions: &BTreeSet<u8>) -> String {
    let region_text = regions
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}{}", base_url, region_text)
}

/// Fetches the main CMT table for the given legacy regions (all when `None`).
pub async fn get_cmt_main_table(
    client: &Client,
    base_url: &str,
    regions: Option<&[u8]>,
) -> Result<Table> {
    let regions = legacy_regions(regions)?;
    let table: Table = fetch_json(client, &cmt_url(base_url, &regions)).await?;
    info!("CMT returned {} facility row(s)", table.len());
    Ok(table)
}

/// CMT rows as WGS84 points built from their `LONG`/`LAT` columns. Rows
/// without usable coordinates keep a null geometry.
pub fn to_point_features(table: &Table) -> FeatureCollection {
    let features = table
        .rows()
        .iter()
        .map(|row| {
            let geometry = match (coordinate(row.get("LONG")), coordinate(row.get("LAT"))) {
                (Some(longitude), Some(latitude)) => Some(Geometry::point(longitude, latitude)),
                _ => None,
            };
            Feature {
                id: None,
                geometry,
                properties: Some(row.clone()),
            }
        })
        .collect();
    FeatureCollection::new(features).with_named_crs("EPSG:4326")
}

// Coordinates come through as numbers or numeric strings.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
