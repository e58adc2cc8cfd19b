use crate::error::{Result, AnalyticsError};
use polars::prelude::*;
use super::types::ColumnSpec;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolve logical columns to header names. Missing optional columns are
    /// left out of the map; a missing required column is an error.
    pub fn resolve_columns<C: ColumnSpec>(
        df: &DataFrame,
        wanted: &[C],
    ) -> Result<HashMap<C, String>> {
        let mut column_map = HashMap::new();

        for spec in wanted {
            match Self::find_column(df, spec) {
                Some(col_name) => {
                    column_map.insert(*spec, col_name.to_string());
                }
                None if spec.is_required() => {
                    return Err(AnalyticsError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        spec.as_str(),
                        spec.aliases()
                    )));
                }
                None => {}
            }
        }

        Ok(column_map)
    }

    /// Fail if any of `specs` resolved to a non-numeric column.
    pub fn validate_numeric<C: ColumnSpec>(
        df: &DataFrame,
        column_map: &HashMap<C, String>,
        specs: &[C],
    ) -> Result<()> {
        for spec in specs {
            let Some(actual_name) = column_map.get(spec) else {
                continue;
            };
            let series = df.column(actual_name)?;
            if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
                return Err(AnalyticsError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    spec.as_str(),
                    series.dtype()
                )));
            }
        }
        Ok(())
    }

    /// First header matching any alias of `spec`.
    fn find_column<'a, C: ColumnSpec>(df: &'a DataFrame, spec: &C) -> Option<&'a str> {
        let columns = df.get_column_names();
        columns
            .into_iter()
            .find(|col| spec.aliases().iter().any(|alias| *alias == col.as_str()))
            .map(|col| col.as_str())
    }

    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        match df.height() {
            rows if rows >= min_rows => Ok(()),
            rows => Err(AnalyticsError::DataLoading(format!(
                "Expected at least {} rows, file has {}",
                min_rows, rows
            ))),
        }
    }

    /// Columns holding nulls, with their null counts.
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        Ok(df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::connectors::{EquityColumn, TradeColumn};
    use polars::df;

    #[test]
    fn test_resolve_equity_with_aliases() {
        let df = df! {
            "Time" => &[1_700_000_000_000i64, 1_700_000_060_000],
            "balance" => &[10_000.0, 10_050.0],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df, &EquityColumn::all()).unwrap();
        assert_eq!(map[&EquityColumn::Timestamp], "Time");
        assert_eq!(map[&EquityColumn::Equity], "balance");
        assert!(!map.contains_key(&EquityColumn::DrawdownPct));
    }

    #[test]
    fn test_missing_required_trade_column() {
        let df = df! {
            "entry_time" => &[1i64],
            "exit_time" => &[2i64],
            "side" => &["long"],
        }
        .unwrap();

        let result = DataValidator::resolve_columns(&df, &TradeColumn::all());
        assert!(matches!(result, Err(AnalyticsError::DataLoading(_))));
    }

    #[test]
    fn test_non_numeric_equity_is_rejected() {
        let df = df! {
            "timestamp" => &[1i64, 2],
            "equity" => &["a", "b"],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df, &EquityColumn::all()).unwrap();
        assert!(DataValidator::validate_numeric(&df, &map, &[EquityColumn::Equity]).is_err());
    }

    #[test]
    fn test_minimum_rows_and_nulls() {
        let df = df! {
            "equity" => &[Some(1.0), None, Some(3.0)],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 3).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 4).is_err());
        assert_eq!(DataValidator::check_nulls(&df).unwrap(), vec![("equity".to_string(), 1)]);
    }
}
