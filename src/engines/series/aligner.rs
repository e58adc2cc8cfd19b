// src/engines/series/aligner.rs
use crate::error::{AnalyticsError, Result};
use crate::types::{EquitySample, Trade, TradeRange};
use chrono::{DateTime, Utc};

/// Maps trade timestamps onto indices of an ascending equity series.
///
/// The series is assumed sorted by timestamp; this is not checked.
pub struct TemporalAligner;

impl TemporalAligner {
    /// Index of the sample closest in time to `target`, or `None` for an
    /// empty series. Equidistant neighbours resolve to the earlier index.
    pub fn find_closest_index(series: &[EquitySample], target: DateTime<Utc>) -> Option<usize> {
        if series.is_empty() {
            return None;
        }

        let left = series.partition_point(|s| s.timestamp < target);
        if left == 0 {
            return Some(0);
        }
        if left == series.len() {
            return Some(series.len() - 1);
        }

        // series[left - 1] < target <= series[left]
        let after = series[left].timestamp - target;
        let before = target - series[left - 1].timestamp;
        if before <= after {
            Some(left - 1)
        } else {
            Some(left)
        }
    }

    /// Align one trade, pinning out-of-range timestamps to the nearest end.
    pub fn align_trade(
        series: &[EquitySample],
        trade_num: usize,
        trade: &Trade,
    ) -> Result<TradeRange> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => {
                return Err(AnalyticsError::EmptySeries(format!(
                    "Cannot align trade #{} against an empty series",
                    trade_num
                )))
            }
        };

        let last_index = series.len() - 1;
        let entry_index = Self::find_closest_index(series, trade.entry_time)
            .unwrap_or(0)
            .min(last_index);
        let exit_index = Self::find_closest_index(series, trade.exit_time)
            .unwrap_or(last_index)
            .min(last_index)
            .max(entry_index);

        let outside = |t: DateTime<Utc>| t < first || t > last;
        let clamped = outside(trade.entry_time) || outside(trade.exit_time);

        Ok(TradeRange {
            trade_num,
            entry_index,
            exit_index,
            mfe: trade.mfe.abs(),
            mae: trade.mae.abs(),
            clamped,
        })
    }

    /// Like [`TemporalAligner::align_trade`], but rejects a trade that does
    /// not overlap the series at all.
    pub fn align_trade_strict(
        series: &[EquitySample],
        trade_num: usize,
        trade: &Trade,
    ) -> Result<TradeRange> {
        let range = Self::align_trade(series, trade_num, trade)?;
        if !range.clamped {
            return Ok(range);
        }

        let first = series[0].timestamp;
        let last = series[series.len() - 1].timestamp;
        let (lo, hi) = if trade.entry_time <= trade.exit_time {
            (trade.entry_time, trade.exit_time)
        } else {
            (trade.exit_time, trade.entry_time)
        };

        if hi < first {
            return Err(AnalyticsError::MisalignedTrade {
                trade_num,
                reason: format!("trade closed at {} before series start {}", hi, first),
            });
        }
        if lo > last {
            return Err(AnalyticsError::MisalignedTrade {
                trade_num,
                reason: format!("trade opened at {} after series end {}", lo, last),
            });
        }
        Ok(range)
    }

    /// Align every trade; trade numbers are 1-based input positions.
    pub fn align_trades(series: &[EquitySample], trades: &[Trade]) -> Result<Vec<TradeRange>> {
        let mut ranges = Vec::with_capacity(trades.len());
        for (i, trade) in trades.iter().enumerate() {
            let range = Self::align_trade(series, i + 1, trade)?;
            if range.clamped {
                log::warn!(
                    "Trade #{} falls partly outside the equity series, pinned to [{}, {}]",
                    range.trade_num,
                    range.entry_index,
                    range.exit_index
                );
            }
            ranges.push(range);
        }
        Ok(ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn series_at(minutes: &[i64]) -> Vec<EquitySample> {
        minutes
            .iter()
            .map(|&m| EquitySample::new(t0() + Duration::minutes(m), 10_000.0, 0.0))
            .collect()
    }

    fn trade(entry: i64, exit: i64) -> Trade {
        Trade {
            entry_time: t0() + Duration::minutes(entry),
            exit_time: t0() + Duration::minutes(exit),
            side: Side::Long,
            pnl: 10.0,
            mfe: 20.0,
            mae: -5.0,
            mfe_pct: None,
            mae_pct: None,
        }
    }

    #[test]
    fn test_empty_series_is_not_found() {
        assert_eq!(TemporalAligner::find_closest_index(&[], t0()), None);
        assert!(matches!(
            TemporalAligner::align_trade(&[], 1, &trade(0, 1)),
            Err(AnalyticsError::EmptySeries(_))
        ));
    }

    #[test]
    fn test_single_element_series() {
        let s = series_at(&[10]);
        assert_eq!(TemporalAligner::find_closest_index(&s, t0()), Some(0));
        assert_eq!(
            TemporalAligner::find_closest_index(&s, t0() + Duration::days(3)),
            Some(0)
        );
    }

    #[test]
    fn test_nearest_neighbour_and_tie_prefers_earlier() {
        let s = series_at(&[0, 10, 20]);
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(4)), Some(0));
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(6)), Some(1));
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(5)), Some(0));
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(15)), Some(1));
    }

    #[test]
    fn test_duplicate_timestamps_terminate() {
        let s = series_at(&[0, 5, 5, 5, 9]);
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(5)), Some(1));
        assert_eq!(TemporalAligner::find_closest_index(&s, t0() + Duration::minutes(8)), Some(4));
    }

    #[test]
    fn test_align_trade_clamps_and_orders() {
        let s = series_at(&[0, 10, 20, 30]);
        let range = TemporalAligner::align_trade(&s, 3, &trade(-60, 12)).unwrap();
        assert_eq!(range.entry_index, 0);
        assert_eq!(range.exit_index, 1);
        assert!(range.clamped);
        assert_eq!(range.mae, 5.0);

        // exit before entry is pulled up to the entry index
        let range = TemporalAligner::align_trade(&s, 4, &trade(29, 1)).unwrap();
        assert_eq!(range.entry_index, 3);
        assert_eq!(range.exit_index, 3);
    }

    #[test]
    fn test_strict_alignment_rejects_disjoint_trade() {
        let s = series_at(&[0, 10, 20]);
        assert!(TemporalAligner::align_trade_strict(&s, 1, &trade(5, 15)).is_ok());
        assert!(TemporalAligner::align_trade_strict(&s, 2, &trade(-30, 5)).is_ok());
        assert!(matches!(
            TemporalAligner::align_trade_strict(&s, 3, &trade(-30, -20)),
            Err(AnalyticsError::MisalignedTrade { trade_num: 3, .. })
        ));
        assert!(matches!(
            TemporalAligner::align_trade_strict(&s, 4, &trade(40, 50)),
            Err(AnalyticsError::MisalignedTrade { trade_num: 4, .. })
        ));
    }
}
