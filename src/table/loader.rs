// src/table/loader.rs

use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, trace};

use super::{Dataset, Record};
use crate::{
    config::{ascii_byte, GdpInfo},
    error::{MapError, Result},
};

/// Read the table described by `info`.
pub fn load_gdp_table(info: &GdpInfo) -> Result<Dataset> {
    load_table(&info.gdpfile, &info.country_name, info.separator, info.quote)
}

/// Open `path` and parse it as a delimited table with a header row.
///
/// Each row becomes a [`Record`] keyed by its `key_column` field. When two
/// rows share a key the later one wins.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(
    path: P,
    key_column: &str,
    separator: char,
    quote: char,
) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MapError::file_access(path, e))?;
    load_table_from_reader(BufReader::new(file), path, key_column, separator, quote)
}

/// Parse a delimited table from any reader. `origin` is only used in errors.
pub fn load_table_from_reader<R: Read>(
    reader: R,
    origin: &Path,
    key_column: &str,
    separator: char,
    quote: char,
) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows just lack their trailing columns
        .delimiter(ascii_byte("separator", separator)?)
        .quote(ascii_byte("quote", quote)?)
        .from_reader(reader);

    let csv_err = |source: csv::Error| MapError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let key_idx = headers
        .iter()
        .position(|h| h == key_column)
        .ok_or_else(|| MapError::MissingKeyColumn {
            path: origin.to_path_buf(),
            column: key_column.to_string(),
        })?;

    let mut table = Dataset::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_err)?;

        let Some(key) = record.get(key_idx) else {
            trace!(row = idx, "row too short to hold key column, skipping");
            continue;
        };
        let key = key.to_string();

        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();

        if table.insert(key.clone(), row).is_some() {
            debug!(key = %key, row = idx, "duplicate key, later row replaces earlier");
        }
    }

    debug!(rows = table.len(), columns = headers.len(), "loaded table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn parse(text: &str, key: &str, sep: char, quote: char) -> crate::error::Result<Dataset> {
        load_table_from_reader(Cursor::new(text), Path::new("inline.csv"), key, sep, quote)
    }

    #[test]
    fn loads_rows_keyed_by_name() -> Result<()> {
        let table = parse(
            "Country Name,Country Code,1960,1961\n\
             Aruba,ABW,,\n\
             \"Korea, Rep.\",KOR,3958190758.48,2417558209.28\n",
            "Country Name",
            ',',
            '"',
        )?;

        assert_eq!(table.len(), 2);
        let korea = &table["Korea, Rep."];
        assert_eq!(korea["Country Code"], "KOR");
        assert_eq!(korea["1960"], "3958190758.48");
        assert_eq!(table["Aruba"]["1961"], "");
        Ok(())
    }

    #[test]
    fn honours_custom_separator_and_quote() -> Result<()> {
        let table = parse(
            "name;2000\n'Bonaire; Sint Eustatius';12\nX;3\n",
            "name",
            ';',
            '\'',
        )?;
        assert_eq!(table["Bonaire; Sint Eustatius"]["2000"], "12");
        assert_eq!(table["X"]["2000"], "3");
        Ok(())
    }

    #[test]
    fn duplicate_keys_overwrite() -> Result<()> {
        let table = parse("name,2000\nA,1\nA,2\n", "name", ',', '"')?;
        assert_eq!(table.len(), 1);
        assert_eq!(table["A"]["2000"], "2");
        Ok(())
    }

    #[test]
    fn short_rows_lack_trailing_columns() -> Result<()> {
        let table = parse("name,1999,2000\nA,5\n", "name", ',', '"')?;
        assert_eq!(table["A"]["1999"], "5");
        assert!(!table["A"].contains_key("2000"));
        Ok(())
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let err = parse("name,2000\nA,1\n", "Country Name", ',', '"').unwrap_err();
        assert!(matches!(err, MapError::MissingKeyColumn { ref column, .. } if column == "Country Name"));
    }

    #[test]
    fn missing_file_is_file_access() {
        let err = load_table("/nonexistent/gdp.csv", "name", ',', '"').unwrap_err();
        assert!(matches!(err, MapError::FileAccess { .. }));
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let err = parse("a\n", "a", '§', '"').unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
    }

    #[test]
    fn loads_from_disk_via_config() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "Country Name,2000\nUnited States,10000000000\n")?;
        let info = GdpInfo::new(tmp.path(), "Country Name");

        let table = load_gdp_table(&info)?;
        assert_eq!(table["United States"]["2000"], "10000000000");
        Ok(())
    }
}
