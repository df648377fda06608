// src/process/mod.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, info};

pub mod prepare;
pub mod utils;

use utils::{clean_str, parse_value, parse_year};

pub const COUNTRY_NAME: &str = "Country Name";
pub const COUNTRY_CODE: &str = "Country Code";
pub const INDICATOR_NAME: &str = "Indicator Name";
pub const INDICATOR_CODE: &str = "Indicator Code";

/// One indicator row of the source table, for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub country_name: String,
    pub country_code: String,
    pub indicator_name: String,
    pub indicator_code: String,
    /// One cell per entry of `RawTable::years`, `None` where the source cell is blank.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Year columns found in the header, ascending.
    pub years: Vec<i32>,
    /// Every data row, in file order.
    pub rows: Vec<IndicatorRow>,
}

/// Open the population-estimates CSV at `path` and parse it into a `RawTable`.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_indicator_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open indicator CSV: {:?}", path.as_ref()))?;
    load_indicator_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse indicator CSV: {:?}", path.as_ref()))
}

/// Parse a World Bank style table from any reader.
///
/// - The four descriptive columns are located by name and are required.
/// - Every other header that is a four-digit year becomes a year column.
/// - Anything else (e.g. the trailing unnamed column of WDI exports) is skipped.
pub fn load_indicator_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short trailing rows are common in WDI exports
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("CSV header row")?
        .iter()
        .map(clean_str)
        .collect();

    let position = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("missing required column `{}`", name))
    };
    let country_name = position(COUNTRY_NAME)?;
    let country_code = position(COUNTRY_CODE)?;
    let indicator_name = position(INDICATOR_NAME)?;
    let indicator_code = position(INDICATOR_CODE)?;
    let descriptive = [country_name, country_code, indicator_name, indicator_code];

    // 1) Work out which columns carry years
    let mut year_cols: Vec<(i32, usize)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if descriptive.contains(&idx) {
            continue;
        }
        match parse_year(header) {
            Some(year) => year_cols.push((year, idx)),
            None => debug!(header = %header, "skipping non-year column"),
        }
    }
    year_cols.sort_by_key(|&(year, _)| year);
    if let Some(pair) = year_cols.windows(2).find(|w| w[0].0 == w[1].0) {
        bail!("duplicate year column {}", pair[0].0);
    }

    // 2) Read every data row
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let text = |i: usize| record.get(i).map(clean_str).unwrap_or_default();

        rows.push(IndicatorRow {
            country_name: text(country_name),
            country_code: text(country_code),
            indicator_name: text(indicator_name),
            indicator_code: text(indicator_code),
            values: year_cols
                .iter()
                .map(|&(_, col)| record.get(col).and_then(parse_value))
                .collect(),
        });
    }

    let years: Vec<i32> = year_cols.into_iter().map(|(year, _)| year).collect();
    info!(
        rows = rows.len(),
        years = years.len(),
        "loaded indicator table"
    );
    Ok(RawTable { years, rows })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub(crate) fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,depratio=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// A trimmed-down WDI export: three dependency-ratio rows for CZE, one
    /// for SVK, a blank cell and the trailing empty column WDI files carry.
    pub(crate) const SAMPLE_CSV: &str = "\u{feff}\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"1961\",\"1962\",
\"Czechia\",\"CZE\",\"Age dependency ratio (% of working-age population)\",\"SP.POP.DPND\",\"40.0\",\"55.2\",\"30.1\",
\"Czechia\",\"CZE\",\"Age dependency ratio, old\",\"SP.POP.DPND.OL\",\"14.5\",\"15.1\",\"\",
\"Czechia\",\"CZE\",\"Age dependency ratio, young\",\"SP.POP.DPND.YG\",\"40.2\",\"40.2\",\"39.0\",
\"Slovak Republic\",\"SVK\",\"Age dependency ratio (% of working-age population)\",\"SP.POP.DPND\",\"60.1\",\"59.8\",\"58.7\",
";

    #[test]
    fn test_load_indicator_reader_sample() -> Result<()> {
        init_test_logging();
        let table = load_indicator_reader(Cursor::new(SAMPLE_CSV))?;

        assert_eq!(table.years, vec![1960, 1961, 1962]);
        assert_eq!(table.rows.len(), 4);

        let first = &table.rows[0];
        assert_eq!(first.country_name, "Czechia");
        assert_eq!(first.country_code, "CZE");
        assert_eq!(first.indicator_code, "SP.POP.DPND");
        assert_eq!(first.values, vec![Some(40.0), Some(55.2), Some(30.1)]);

        // blank cell survives as a gap
        assert_eq!(table.rows[1].values, vec![Some(14.5), Some(15.1), None]);
        Ok(())
    }

    #[test]
    fn test_load_indicator_csv_from_disk() -> Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(SAMPLE_CSV.as_bytes())?;

        let table = load_indicator_csv(tmp.path())?;
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[3].country_code, "SVK");
        Ok(())
    }

    #[test]
    fn test_year_columns_sorted_regardless_of_file_order() -> Result<()> {
        let csv = "Country Name,Country Code,Indicator Name,Indicator Code,1962,1960,1961\n\
                   Czechia,CZE,x,SP.POP.DPND,3,1,2\n";
        let table = load_indicator_reader(Cursor::new(csv))?;
        assert_eq!(table.years, vec![1960, 1961, 1962]);
        assert_eq!(table.rows[0].values, vec![Some(1.0), Some(2.0), Some(3.0)]);
        Ok(())
    }

    #[test]
    fn test_short_rows_are_tolerated() -> Result<()> {
        let csv = "Country Name,Country Code,Indicator Name,Indicator Code,1960,1961\n\
                   Czechia,CZE,x,SP.POP.DPND,1\n";
        let table = load_indicator_reader(Cursor::new(csv))?;
        assert_eq!(table.rows[0].values, vec![Some(1.0), None]);
        Ok(())
    }

    #[test]
    fn test_missing_descriptive_column_is_fatal() {
        let csv = "Country Name,Indicator Name,Indicator Code,1960\nCzechia,x,SP.POP.DPND,1\n";
        let err = load_indicator_reader(Cursor::new(csv)).unwrap_err();
        assert!(err.to_string().contains("Country Code"), "{err}");
    }

    #[test]
    fn test_duplicate_year_is_fatal() {
        let csv = "Country Name,Country Code,Indicator Name,Indicator Code,1960,1960\n";
        assert!(load_indicator_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(load_indicator_csv("/definitely/not/here.csv").is_err());
    }
}
