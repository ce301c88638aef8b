//! Bureau of Indian Affairs data: tribal leaders directory and region
//! boundaries. See <https://www.bia.gov/tribal-leaders-directory>.
use crate::error::Result;
use crate::geo::{FeatureCollection, get_geojson};
use crate::http::fetch_json;
use crate::table::Table;
use log::info;
use reqwest::Client;

/// Contact information for every federally recognized tribe.
pub async fn get_tribal_information(client: &Client, url: &str) -> Result<Table> {
    let table: Table = fetch_json(client, url).await?;
    info!("Tribal leaders directory returned {} row(s)", table.len());
    Ok(table)
}

/// BIA region polygons.
pub async fn get_bia_regions(client: &Client, url: &str) -> Result<FeatureCollection> {
    let regions = get_geojson(client, url).await?;
    info!("BIA regions returned {} feature(s)", regions.len());
    Ok(regions)
}
