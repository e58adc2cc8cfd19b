use anyhow::{bail, Context, Result};
use clap::Parser;
use equity_analytics::config::{AppConfig, BenchmarkSource};
use equity_analytics::data::{CsvConnector, JsonConnector};
use equity_analytics::{BacktestInput, DisplayMode, MetricsEngine};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "equity-analytics")]
#[command(about = "Turn backtest results into chart-ready equity and trade analytics")]
struct Args {
    /// JSON report with capital, trades, equity and benchmark data
    #[arg(short, long, conflicts_with_all = ["equity", "trades"])]
    report: Option<PathBuf>,

    /// Equity curve CSV
    #[arg(short, long)]
    equity: Option<PathBuf>,

    /// Trade list CSV
    #[arg(short, long)]
    trades: Option<PathBuf>,

    /// Initial account capital (required with CSV inputs)
    #[arg(long, env = "EQUITY_ANALYTICS_CAPITAL")]
    capital: Option<f64>,

    /// Display mode: absolute or percent
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Maximum number of plotted points
    #[arg(long)]
    cap: Option<usize>,

    /// TOML or JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the view as JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.engine.display_mode = mode;
    }
    if let Some(cap) = args.cap {
        config.engine.decimation_cap = cap;
    }

    let input = load_input(&args, &config)?;
    if args.report.is_none() && config.engine.benchmark_source != BenchmarkSource::None {
        log::info!("CSV inputs carry no benchmark data; benchmark will be flat");
    }

    let engine = MetricsEngine::new(config.engine.clone());
    let view = engine.aggregate(&input)?;

    log::info!(
        "{} samples -> {} points, {} trades, {} streak periods",
        view.source_len,
        view.series.len(),
        view.ranges.len(),
        view.streaks.len()
    );
    if let Some(pnl) = view.final_pnl() {
        log::info!("Final P&L: {:.2} ({:?})", pnl, view.display_mode);
    }

    match &args.output {
        Some(path) => {
            JsonConnector::save_view(path, &view)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("View written to {}", path.display());
        }
        None => println!("{}", JsonConnector::render_view(&view)?),
    }

    Ok(())
}

fn load_input(args: &Args, config: &AppConfig) -> Result<BacktestInput> {
    if let Some(path) = &args.report {
        let mut input = JsonConnector::load_report(path)
            .with_context(|| format!("loading report {}", path.display()))?;
        if let Some(capital) = args.capital {
            input.initial_capital = capital;
        }
        return Ok(input);
    }

    if args.equity.is_none() && args.trades.is_none() {
        bail!("nothing to analyse: pass --report, --equity or --trades");
    }
    let Some(capital) = args.capital else {
        bail!("--capital is required with CSV inputs");
    };

    let mut input = BacktestInput::new(capital);
    if let Some(path) = &args.equity {
        input.equity = CsvConnector::load_equity(path, &config.data)
            .with_context(|| format!("loading equity {}", path.display()))?;
    }
    if let Some(path) = &args.trades {
        input.trades = CsvConnector::load_trades(path, &config.data)
            .with_context(|| format!("loading trades {}", path.display()))?;
    }
    Ok(input)
}
