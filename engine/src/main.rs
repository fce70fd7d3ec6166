// Stock screener entry point
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use engine::config::EngineSettings;
use engine::data::{AlertQuery, CsvPriceSource, InMemoryAlertStore, SystemClock};
use engine::indicators::{calculator_from_spec, Direction};
use engine::services::AlertService;
use shared::models::Ticker;
use shared::utils::{parse_tickers, validate_ticker};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Technical-analysis alerts for daily equity bars")]
struct Cli {
    /// Path to a JSON settings file; defaults are used when omitted
    #[arg(short, long, env = "SCREENER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of <SYMBOL>.csv price files (overrides the settings file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate alerts for a list of tickers
    Refresh {
        /// Comma-separated list of tickers (e.g. "AAPL,MSFT")
        tickers: String,
    },

    /// Show the tracked open/close signals of one ticker
    Signals {
        ticker: String,
    },

    /// Print one indicator's values for a ticker
    Indicator {
        ticker: String,

        /// sma, ema, rsi, atr, macd, supertrend, gann_hilo or volume_ma
        #[arg(long)]
        kind: String,

        /// Indicator parameters as JSON (e.g. '{"period": 14}')
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn tickers_from(input: &str) -> Result<Vec<Ticker>> {
    let symbols = parse_tickers(input);
    if symbols.is_empty() {
        return Err(anyhow!("No tickers given"));
    }
    symbols
        .iter()
        .enumerate()
        .map(|(idx, symbol)| Ok(Ticker::new(idx as i64 + 1, validate_ticker(symbol)?)))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    info!(data_dir = %settings.data_dir.display(), "Starting stock screener");

    let source = Arc::new(CsvPriceSource::new(settings.data_dir.clone()));
    let store = InMemoryAlertStore::new(settings.alerts.clone());
    let service = AlertService::new(source, store, Arc::new(SystemClock), settings);

    match cli.command {
        Commands::Refresh { tickers } => {
            let tickers = tickers_from(&tickers)?;
            let stats = service
                .refresh_all(&tickers, |done, total, symbol| info!(done, total, symbol = %symbol, "Ticker processed"))
                .await;
            println!("{}", stats.summary());

            let page = service.list_alerts(&AlertQuery::default()).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Signals { ticker } => {
            let ticker = Ticker::new(1, validate_ticker(&ticker)?);
            let frame = service.signals_for_ticker(&ticker).await?;
            let trend = &frame.indicators;
            let report = serde_json::json!({
                "symbol": frame.symbol(),
                "bars": frame.len(),
                "final_position": frame.final_position,
                "supertrend_direction": trend.supertrend_direction.last().copied().flatten().map(Direction::as_i8),
                "gann_direction": trend.gann_direction.last().copied().map(Direction::as_i8),
                "counts": frame.signal_counts(),
                "dates": frame.signal_dates(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Indicator { ticker, kind, params } => {
            let ticker = Ticker::new(1, validate_ticker(&ticker)?);
            let params: serde_json::Value =
                serde_json::from_str(&params).with_context(|| format!("Invalid JSON parameters for '{}'", kind))?;
            let calculator = calculator_from_spec(&kind, &params)?;
            let series = service.load_series(&ticker).await?;
            let values = calculator.calculate(series.bars());

            let rows: Vec<serde_json::Value> = series
                .bars()
                .iter()
                .zip(values)
                .map(|(bar, value)| serde_json::json!({ "date": bar.date, "value": value }))
                .collect();
            let report = serde_json::json!({
                "symbol": series.symbol(),
                "indicator": calculator.name(),
                "parameters": calculator.parameters(),
                "values": rows,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
