use super::RawTable;
use anyhow::{bail, Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int32Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{collections::HashSet, sync::Arc};
use tracing::{info, warn};

/// Name of the index column of a prepared table.
pub const YEAR_COLUMN: &str = "year";

/// Restrict `table` to `country_code` and transpose it so that years become rows.
///
/// The result has a non-null `Int32` column `year` (ascending) followed by one
/// nullable `Float64` column per indicator code, in source row order. When no
/// row matches, the batch holds only the `year` column.
#[tracing::instrument(level = "info", skip(table))]
pub fn prepare_country(table: &RawTable, country_code: &str) -> Result<RecordBatch> {
    let mut fields = vec![Field::new(YEAR_COLUMN, DataType::Int32, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(table.years.clone()))];

    let mut seen: HashSet<&str> = HashSet::new();
    for row in table.rows.iter().filter(|r| r.country_code == country_code) {
        if !seen.insert(row.indicator_code.as_str()) {
            warn!(indicator = %row.indicator_code, "duplicate indicator row; keeping the first");
            continue;
        }
        if row.values.len() != table.years.len() {
            bail!(
                "indicator {} has {} values for {} years",
                row.indicator_code,
                row.values.len(),
                table.years.len()
            );
        }
        fields.push(Field::new(&row.indicator_code, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(row.values.clone())) as ArrayRef);
    }

    if seen.is_empty() {
        warn!(country_code, "no rows match country code; prepared table is empty");
    } else {
        info!(indicators = seen.len(), years = table.years.len(), "prepared country table");
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("building prepared RecordBatch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{load_indicator_reader, tests::SAMPLE_CSV, IndicatorRow};
    use arrow::array::Array;
    use std::io::Cursor;

    fn sample() -> RawTable {
        load_indicator_reader(Cursor::new(SAMPLE_CSV)).expect("sample parses")
    }

    #[test]
    fn keeps_only_the_target_country() -> Result<()> {
        let batch = prepare_country(&sample(), "CZE")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec![YEAR_COLUMN, "SP.POP.DPND", "SP.POP.DPND.OL", "SP.POP.DPND.YG"]
        );
        assert_eq!(batch.num_rows(), 3);

        let years = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int32Array>()
            .expect("year column is Int32");
        assert_eq!(years.values().to_vec(), vec![1960, 1961, 1962]);

        let overall = batch
            .column_by_name("SP.POP.DPND")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .expect("overall column is Float64");
        assert_eq!(overall.value(1), 55.2);

        let old = batch.column_by_name("SP.POP.DPND.OL").expect("old column");
        assert!(old.is_null(2));
        Ok(())
    }

    #[test]
    fn unmatched_country_yields_year_only_table() -> Result<()> {
        let batch = prepare_country(&sample(), "XXX")?;
        assert_eq!(batch.num_columns(), 1);
        assert_eq!(batch.schema().field(0).name(), YEAR_COLUMN);
        Ok(())
    }

    #[test]
    fn country_code_must_match_exactly() -> Result<()> {
        let batch = prepare_country(&sample(), "cze")?;
        assert_eq!(batch.num_columns(), 1);
        Ok(())
    }

    #[test]
    fn preparing_twice_is_identical() -> Result<()> {
        let table = sample();
        let before = table.clone();
        let a = prepare_country(&table, "CZE")?;
        let b = prepare_country(&table, "CZE")?;
        assert_eq!(a, b);
        assert_eq!(table, before);
        Ok(())
    }

    #[test]
    fn duplicate_indicator_keeps_first_row() -> Result<()> {
        let mut table = sample();
        table.rows.push(IndicatorRow {
            country_name: "Czechia".into(),
            country_code: "CZE".into(),
            indicator_name: "dup".into(),
            indicator_code: "SP.POP.DPND".into(),
            values: vec![Some(1.0), Some(2.0), Some(3.0)],
        });
        let batch = prepare_country(&table, "CZE")?;
        assert_eq!(batch.num_columns(), 4);
        let overall = batch
            .column_by_name("SP.POP.DPND")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .expect("overall column");
        assert_eq!(overall.value(0), 40.0);
        Ok(())
    }
}
