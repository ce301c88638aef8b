//! Minimal GeoJSON model (RFC 7946) for the boundary and facility layers.
use crate::error::Result;
use crate::http::fetch_json;
use crate::table::{Row, Table};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `[longitude, latitude]`, optionally followed by elevation.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Geometry::Point {
            coordinates: vec![longitude, latitude],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// Legacy named-CRS member some publishers still emit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: None,
        }
    }

    /// Attaches a legacy named CRS such as `EPSG:4326`.
    pub fn with_named_crs(mut self, name: &str) -> Self {
        self.crs = Some(serde_json::json!({
            "type": "name",
            "properties": {"name": name}
        }));
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Properties of each feature as a table, with the geometry type in a
    /// `geometry` column.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for feature in &self.features {
            let mut row = feature.properties.clone().unwrap_or_default();
            let kind = feature.geometry.as_ref().map(Geometry::kind);
            row.insert("geometry".into(), kind.map(Value::from).unwrap_or(Value::Null));
            table.push(row);
        }
        table
    }
}

/// Fetches any GeoJSON feature collection.
pub async fn get_geojson(client: &Client, url: &str) -> Result<FeatureCollection> {
    fetch_json(client, url).await
}
