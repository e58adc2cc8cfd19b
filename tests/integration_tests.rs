use chrono::{Duration, TimeZone, Utc};
use equity_analytics::config::{AppConfig, DataConfig, EngineConfig, StreakBasis};
use equity_analytics::data::{CsvConnector, JsonConnector};
use equity_analytics::engines::metrics::{BacktestInput, BenchmarkInputs, BenchmarkOrigin, MetricsEngine};
use equity_analytics::engines::trades::compute_excursion;
use equity_analytics::types::{DisplayMode, EquitySample, Side, StreakKind, Trade, TradeRange};
use equity_analytics::aggregate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn load_fixture_input() -> BacktestInput {
    let config = DataConfig::default();
    BacktestInput::new(10_000.0)
        .with_equity(CsvConnector::load_equity(fixture("equity.csv"), &config).unwrap())
        .with_trades(CsvConnector::load_trades(fixture("trades.csv"), &config).unwrap())
}

#[test]
fn test_csv_fixtures_end_to_end() {
    let input = load_fixture_input();
    assert_eq!(input.equity.len(), 5);
    assert_eq!(input.trades[3].side, Side::Short);
    assert!((input.equity[4].drawdown_pct - (9500.0 - 11000.0) / 11000.0 * 100.0).abs() < 1e-9);

    let view = MetricsEngine::default().aggregate(&input).unwrap();

    assert!(!view.synthesized);
    assert_eq!(view.series.len(), 5);
    let pnl: Vec<f64> = view.pnl_series.iter().map(|p| p.value).collect();
    assert_eq!(pnl, vec![0.0, 500.0, 200.0, 1000.0, -500.0]);

    let kinds: Vec<StreakKind> = view.streaks.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![StreakKind::Growth, StreakKind::Drawdown, StreakKind::Growth, StreakKind::Drawdown]
    );
    assert_eq!(view.summary.max_runup, 800.0);
    assert_eq!(view.summary.max_drawdown, 1500.0);

    let ranges: Vec<(usize, usize)> = view.ranges.iter().map(|r| (r.entry_index, r.exit_index)).collect();
    assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    assert_eq!(view.markers.len(), 4);
    assert_eq!(view.marker_at(4).unwrap().cumulative_pnl, -500.0);

    let first = view.excursions[0].excursion;
    assert_eq!(first.favorable_realized, 500.0);
    assert_eq!(first.favorable_unrealized, 150.0);
    assert_eq!(view.benchmark_origin, BenchmarkOrigin::Flat);
    assert!(view.benchmark_series.iter().all(|p| p.value == 0.0));
}

#[test]
fn test_percent_mode_matches_absolute_scaled() {
    let input = load_fixture_input();
    let absolute = MetricsEngine::default().aggregate(&input).unwrap();
    let percent = MetricsEngine::new(EngineConfig::default().with_display_mode(DisplayMode::Percent))
        .aggregate(&input)
        .unwrap();

    for (a, p) in absolute.pnl_series.iter().zip(&percent.pnl_series) {
        assert!((a.value / 10_000.0 * 100.0 - p.value).abs() < 1e-9);
        assert!((DisplayMode::Percent.revert(p.value, 10_000.0) - a.value).abs() < 1e-9);
    }
    for (index, marker) in &absolute.markers {
        let other = percent.marker_at(*index).unwrap();
        assert!((marker.cumulative_pnl / 100.0 - other.cumulative_pnl).abs() < 1e-9);
    }
}

#[test]
fn test_percent_round_trip_property() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..1000 {
        let capital = rng.gen_range(1.0..1_000_000.0);
        let value = rng.gen_range(-1_000_000.0..1_000_000.0);
        let shown = DisplayMode::Percent.apply(value, capital);
        let back = DisplayMode::Percent.revert(shown, capital);
        assert!((back - value).abs() <= 1e-9 * value.abs().max(1.0));
        assert_eq!(DisplayMode::Absolute.apply(value, capital), value);
    }
}

#[test]
fn test_excursion_spec_trade() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let trade = Trade {
        entry_time: t0,
        exit_time: t0 + Duration::hours(1),
        side: Side::Long,
        pnl: 150.0,
        mfe: 300.0,
        mae: 50.0,
        mfe_pct: None,
        mae_pct: None,
    };
    let range = TradeRange {
        trade_num: 1,
        entry_index: 0,
        exit_index: 1,
        mfe: 300.0,
        mae: 50.0,
        clamped: false,
    };

    let excursion = compute_excursion(&trade, &range);
    assert_eq!(excursion.favorable_realized, 150.0);
    assert_eq!(excursion.favorable_unrealized, 150.0);
    assert_eq!(excursion.adverse_realized, 0.0);
    assert_eq!(excursion.adverse_unrealized, 50.0);
}

#[test]
fn test_excursions_never_negative_or_both_realized() {
    let mut rng = StdRng::seed_from_u64(1234);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for _ in 0..2000 {
        let pnl = rng.gen_range(-500.0..500.0);
        let mfe = rng.gen_range(-600.0..600.0);
        let mae = rng.gen_range(-600.0..600.0);
        let trade = Trade {
            entry_time: t0,
            exit_time: t0,
            side: Side::Long,
            pnl,
            mfe,
            mae,
            mfe_pct: None,
            mae_pct: None,
        };
        let range = TradeRange {
            trade_num: 1,
            entry_index: 0,
            exit_index: 0,
            mfe,
            mae,
            clamped: false,
        };

        let e = compute_excursion(&trade, &range);
        assert!(e.favorable_realized >= 0.0 && e.favorable_unrealized >= 0.0);
        assert!(e.adverse_realized >= 0.0 && e.adverse_unrealized >= 0.0);
        assert!(e.favorable_realized == 0.0 || e.adverse_realized == 0.0);
    }
}

#[test]
fn test_large_backtest_with_benchmark_prices() {
    let mut rng = StdRng::seed_from_u64(2024);
    let start = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
    let mut equity = 25_000.0;
    let mut price = 100.0;
    let mut samples = Vec::new();
    let mut prices = Vec::new();
    for i in 0..5000 {
        equity += rng.gen_range(-120.0..130.0);
        price *= 1.0 + rng.gen_range(-0.01..0.01);
        samples.push(EquitySample::new(start + Duration::minutes(15 * i), equity, 0.0));
        prices.push(price);
    }

    let trades: Vec<Trade> = (0..300)
        .map(|k| {
            let entry = start + Duration::minutes(15 * (k * 16));
            Trade {
                entry_time: entry,
                exit_time: entry + Duration::minutes(15 * 10),
                side: if k % 2 == 0 { Side::Long } else { Side::Short },
                pnl: rng.gen_range(-200.0..220.0),
                mfe: rng.gen_range(0.0..400.0),
                mae: rng.gen_range(0.0..400.0),
                mfe_pct: None,
                mae_pct: None,
            }
        })
        .collect();

    let input = BacktestInput::new(25_000.0)
        .with_equity(samples.clone())
        .with_trades(trades)
        .with_benchmark(BenchmarkInputs {
            prices: Some(prices.clone()),
            ..Default::default()
        });
    let view = MetricsEngine::default().aggregate(&input).unwrap();

    assert_eq!(view.series.len(), 2000);
    assert_eq!(view.source_len, 5000);
    assert_eq!(view.series[0], samples[0]);
    assert_eq!(view.series[1999], samples[4999]);
    assert_eq!(view.benchmark_origin, BenchmarkOrigin::Prices);
    assert_eq!(view.benchmark_series.len(), 2000);
    assert_eq!(view.benchmark_series[0].value, 0.0);
    let expected_last = 25_000.0 * (prices[4999] / prices[0] - 1.0);
    assert!((view.benchmark_series[1999].value - expected_last).abs() < 1e-6);

    assert_eq!(view.ranges.len(), 300);
    assert!(view.ranges.iter().all(|r| r.entry_index <= r.exit_index && r.exit_index < 2000));
    assert_eq!(view.streaks.iter().map(|p| p.duration_bars).sum::<usize>(), 4999);
    assert!(!view.streaks_on_decimated);
}

#[test]
fn test_streaks_on_decimated_series() {
    let input = load_fixture_input();
    let mut config = EngineConfig::default().with_decimation_cap(3);
    config.streak_basis = StreakBasis::Decimated;
    let view = MetricsEngine::new(config).aggregate(&input).unwrap();

    assert_eq!(view.series.len(), 3);
    assert!(view.streaks_on_decimated);
    assert_eq!(view.streaks.iter().map(|p| p.duration_bars).sum::<usize>(), 2);
}

#[test]
fn test_trades_only_and_empty_inputs() {
    let input = load_fixture_input();
    let view = aggregate(&input.trades, &[], 10_000.0, DisplayMode::Absolute).unwrap();
    assert!(view.synthesized);
    assert_eq!(view.series.last().unwrap().equity, 9_500.0);

    let empty = aggregate(&[], &[], 10_000.0, DisplayMode::Percent).unwrap();
    assert!(empty.is_empty());
    assert!(empty.final_pnl().is_none());
}

#[test]
fn test_report_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");
    let input = load_fixture_input();
    std::fs::write(&report_path, serde_json::to_string(&input).unwrap()).unwrap();

    let loaded = JsonConnector::load_report(&report_path).unwrap();
    assert_eq!(loaded.trades, input.trades);
    assert_eq!(loaded.equity.len(), input.equity.len());
    for (a, b) in loaded.equity.iter().zip(&input.equity) {
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.equity, b.equity);
        assert!((a.drawdown_pct - b.drawdown_pct).abs() < 1e-9);
    }

    let view = MetricsEngine::new(AppConfig::default().engine).aggregate(&loaded).unwrap();
    let view_path = dir.path().join("view.json");
    JsonConnector::save_view(&view_path, &view).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(view_path).unwrap()).unwrap();
    assert_eq!(json["display_mode"], "absolute");
    assert_eq!(json["series"].as_array().unwrap().len(), 5);
}
