//! Row-oriented tables of JSON records, the in-memory shape for every tabular
//! endpoint, with delimited and JSON writers.
use crate::error::Result;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, other: Table) {
        self.rows.extend(other.rows);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all row keys, in the order they are first seen.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Writes a header plus one record per row. Missing cells are left empty.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let columns = self.columns();
        let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        if columns.is_empty() {
            writer.flush()?;
            return Ok(());
        }
        writer.write_record(&columns)?;
        for row in &self.rows {
            writer.write_record(columns.iter().map(|column| cell_text(row.get(column))))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.rows)?;
        Ok(())
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
