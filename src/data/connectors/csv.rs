use crate::config::{DataConfig, TimestampUnit};
use crate::error::{Result, AnalyticsError};
use crate::types::{EquitySample, Side, Trade};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use super::{
    types::{ColumnSpec, EquityColumn, TradeColumn},
    validator::DataValidator,
};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| AnalyticsError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load an equity-curve export.
    ///
    /// Without a drawdown column the drawdown is derived from the running
    /// equity peak.
    pub fn load_equity<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<Vec<EquitySample>> {
        let df = Self::load(&path)?;
        DataValidator::validate_minimum_rows(&df, config.min_rows)?;
        Self::warn_nulls(&df)?;

        let columns = DataValidator::resolve_columns(&df, &EquityColumn::all())?;
        DataValidator::validate_numeric(&df, &columns, &[EquityColumn::Equity, EquityColumn::DrawdownPct])?;

        let timestamps = Self::timestamp_column(&df, &columns[&EquityColumn::Timestamp], config.timestamp_unit)?;
        let equity = Self::required_f64(&df, &columns[&EquityColumn::Equity])?;
        let drawdown = match columns.get(&EquityColumn::DrawdownPct) {
            Some(name) => Self::optional_f64(&df, name)?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect(),
            None => Self::peak_drawdown(&equity),
        };

        if timestamps.windows(2).any(|w| w[1] < w[0]) {
            log::warn!(
                "Equity timestamps in {:?} are not ascending; alignment results may be off",
                path.as_ref()
            );
        }

        Ok(timestamps
            .into_iter()
            .zip(equity)
            .zip(drawdown)
            .map(|((timestamp, equity), drawdown_pct)| EquitySample::new(timestamp, equity, drawdown_pct))
            .collect())
    }

    /// Load a trade-list export.
    pub fn load_trades<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<Vec<Trade>> {
        let df = Self::load(&path)?;
        Self::warn_nulls(&df)?;

        let columns = DataValidator::resolve_columns(&df, &TradeColumn::all())?;
        DataValidator::validate_numeric(
            &df,
            &columns,
            &[TradeColumn::Pnl, TradeColumn::Mfe, TradeColumn::Mae, TradeColumn::MfePct, TradeColumn::MaePct],
        )?;

        let unit = config.timestamp_unit;
        let entry = Self::timestamp_column(&df, &columns[&TradeColumn::EntryTime], unit)?;
        let exit = Self::timestamp_column(&df, &columns[&TradeColumn::ExitTime], unit)?;
        let sides = Self::side_column(&df, &columns[&TradeColumn::Side])?;
        let pnl = Self::required_f64(&df, &columns[&TradeColumn::Pnl])?;
        let mfe = Self::optional_by(&df, &columns, TradeColumn::Mfe)?;
        let mae = Self::optional_by(&df, &columns, TradeColumn::Mae)?;
        let mfe_pct = Self::optional_by(&df, &columns, TradeColumn::MfePct)?;
        let mae_pct = Self::optional_by(&df, &columns, TradeColumn::MaePct)?;

        Ok((0..df.height())
            .map(|i| Trade {
                entry_time: entry[i],
                exit_time: exit[i],
                side: sides[i],
                pnl: pnl[i],
                mfe: mfe[i].unwrap_or(0.0),
                mae: mae[i].unwrap_or(0.0),
                mfe_pct: mfe_pct[i],
                mae_pct: mae_pct[i],
            })
            .collect())
    }

    // Helper functions
    fn warn_nulls(df: &DataFrame) -> Result<()> {
        let null_report = DataValidator::check_nulls(df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }
        Ok(())
    }

    fn required_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        Self::optional_f64(df, name)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    AnalyticsError::DataLoading(format!("Null value in column '{}' at row {}", name, i))
                })
            })
            .collect()
    }

    fn optional_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let values = column.f64()?;
        Ok((0..values.len()).map(|i| values.get(i)).collect())
    }

    fn optional_by(
        df: &DataFrame,
        columns: &HashMap<TradeColumn, String>,
        spec: TradeColumn,
    ) -> Result<Vec<Option<f64>>> {
        match columns.get(&spec) {
            Some(name) => Self::optional_f64(df, name),
            None => Ok(vec![None; df.height()]),
        }
    }

    fn side_column(df: &DataFrame, name: &str) -> Result<Vec<Side>> {
        let column = df.column(name)?;
        let values = column.str()?;
        (0..values.len())
            .map(|i| match values.get(i).map(|s| s.trim().to_ascii_lowercase()) {
                Some(s) if s == "long" || s == "buy" => Ok(Side::Long),
                Some(s) if s == "short" || s == "sell" => Ok(Side::Short),
                other => Err(AnalyticsError::DataLoading(format!(
                    "Invalid side {:?} at row {} ({}: {:?})",
                    other,
                    i,
                    TradeColumn::Side.as_str(),
                    TradeColumn::Side.aliases()
                ))),
            })
            .collect()
    }

    fn timestamp_column(df: &DataFrame, name: &str, unit: TimestampUnit) -> Result<Vec<DateTime<Utc>>> {
        let column = df.column(name)?;
        let null_err = |i: usize| AnalyticsError::DataLoading(format!("Null timestamp in column '{}' at row {}", name, i));

        if matches!(column.dtype(), DataType::String) {
            let values = column.str()?;
            return (0..values.len())
                .map(|i| {
                    let raw = values.get(i).ok_or_else(|| null_err(i))?;
                    Self::parse_timestamp(raw).ok_or_else(|| {
                        AnalyticsError::DataLoading(format!("Unparseable timestamp '{}' at row {}", raw, i))
                    })
                })
                .collect();
        }

        let ints = column.cast(&DataType::Int64)?;
        let ints = ints.i64()?;
        (0..ints.len())
            .map(|i| {
                let raw = ints.get(i).ok_or_else(|| null_err(i))?;
                let parsed = match unit {
                    TimestampUnit::Millis => DateTime::from_timestamp_millis(raw),
                    TimestampUnit::Seconds => DateTime::from_timestamp(raw, 0),
                };
                parsed.ok_or_else(|| {
                    AnalyticsError::DataLoading(format!("Timestamp {} out of range at row {}", raw, i))
                })
            })
            .collect()
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Percent below the running peak, zero or negative.
    fn peak_drawdown(equity: &[f64]) -> Vec<f64> {
        let mut peak = f64::MIN;
        equity
            .iter()
            .map(|&value| {
                peak = peak.max(value);
                if peak > 0.0 {
                    (value - peak) / peak * 100.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}
