use crate::error::{CrateError, Result};
use std::path::Path;

pub const DEFAULT_NAME_COLUMN: &str = "scientific_name";

// A name to resolve and the CSV row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub row: usize,
    pub scientific_name: String,
}

// Loads the scientific names from one column of a CSV file. The column must
// exist and every row must carry a non-blank name.
pub fn load_names(file_path: &Path, column: &str, delimiter: u8) -> Result<Vec<NameRecord>> {
    if column.trim().is_empty() {
        return Err(CrateError::InvalidArgument(
            "name column must not be blank".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(file_path)?;
    let headers = reader.headers()?.clone();

    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| CrateError::MissingHeader(column.to_string()))?;

    let mut names = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 2; // +1 for header, +1 for 0-based index

        let name = record.get(index).unwrap_or("");
        if name.trim().is_empty() {
            return Err(CrateError::MissingValue {
                column: column.to_string(),
                row,
            });
        }
        names.push(NameRecord {
            row,
            scientific_name: name.to_string(),
        });
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_names() {
        let content = "site,scientific_name\nA,Quercus alba\nB,Carex spp.";
        let file = create_test_csv(content);
        let names = load_names(file.path(), DEFAULT_NAME_COLUMN, b',').unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].scientific_name, "Quercus alba");
        assert_eq!(names[1], NameRecord { row: 3, scientific_name: "Carex spp.".to_string() });
    }

    #[test]
    fn test_names_keep_original_spacing() {
        let content = "taxon\n\"  Salix  nigra \"";
        let file = create_test_csv(content);
        let names = load_names(file.path(), "taxon", b',').unwrap();
        assert_eq!(names[0].scientific_name, "  Salix  nigra ");
    }

    #[test]
    fn test_tab_delimited() {
        let content = "id\ttaxon\n1\tBranta canadensis";
        let file = create_test_csv(content);
        let names = load_names(file.path(), "taxon", b'\t').unwrap();
        assert_eq!(names[0].scientific_name, "Branta canadensis");
    }

    #[test]
    fn test_missing_header() {
        let content = "site,name\nA,Quercus alba";
        let file = create_test_csv(content);
        let result = load_names(file.path(), DEFAULT_NAME_COLUMN, b',');
        assert!(matches!(result, Err(CrateError::MissingHeader(h)) if h == "scientific_name"));
    }

    #[test]
    fn test_missing_value() {
        let content = "site,scientific_name\nA,Quercus alba\nB,  ";
        let file = create_test_csv(content);
        let result = load_names(file.path(), DEFAULT_NAME_COLUMN, b',');
        assert!(matches!(result, Err(CrateError::MissingValue { column, row }) if column == "scientific_name" && row == 3));
    }

    #[test]
    fn test_header_only() {
        let content = "scientific_name";
        let file = create_test_csv(content);
        let names = load_names(file.path(), DEFAULT_NAME_COLUMN, b',').unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_malformed_csv() {
        let content = "site,scientific_name\nA,Quercus alba,extra";
        let file = create_test_csv(content);
        let result = load_names(file.path(), DEFAULT_NAME_COLUMN, b',');
        assert!(matches!(result, Err(CrateError::CsvError(_))));
    }
}
