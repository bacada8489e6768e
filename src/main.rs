use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use options_backtest_core::adapters::{HistoricalDataProvider, InMemoryResultCache, InstrumentMasterProvider};
use options_backtest_core::config::ServiceConfig;
use options_backtest_core::facade::BacktestService;
use options_backtest_core::time::ist_timestamp;
use options_backtest_core::types::{BacktestRequest, Candle, Instrument, OptionType, Underlying};

#[derive(Parser)]
#[command(name = "options-backtest")]
#[command(author = "Options Backtesting")]
#[command(version = "0.1.0")]
#[command(about = "Deterministic single-day options-strategy backtesting core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service configuration file path (layered over defaults and BACKTEST_* env vars)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single backtest against synthetic demo data and print the result
    Backtest {
        /// Path to a JSON-encoded BacktestRequest
        request: PathBuf,
    },
    /// Print the effective service configuration and exit
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let service_config = ServiceConfig::load(Some(&cli.config)).unwrap_or_else(|_| ServiceConfig::default());

    match cli.command {
        Commands::Backtest { request } => run_backtest(request, service_config).await?,
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&service_config)?);
        }
    }

    Ok(())
}

async fn run_backtest(request_path: PathBuf, service_config: ServiceConfig) -> Result<()> {
    let raw = std::fs::read_to_string(&request_path)
        .with_context(|| format!("reading backtest request from {}", request_path.display()))?;
    let request: BacktestRequest = serde_json::from_str(&raw).context("parsing backtest request")?;

    info!(instrument = %request.instrument_type, date = %request.date, "starting backtest");

    let service = BacktestService::new(
        service_config,
        Arc::new(DemoHistoricalData),
        Arc::new(DemoInstrumentMaster),
        Arc::new(InMemoryResultCache::new(500)),
    );

    let result = service.run_backtest(request).await;

    println!("status: {:?}", result.status);
    if let Some(code) = &result.error_code {
        println!("error: {} — {}", code, result.error_message.as_deref().unwrap_or(""));
    } else {
        println!("trades: {}", result.trades.len());
        println!("pnl_points: {}", result.totals.pnl_points);
        println!("pnl_amount: {}", result.totals.pnl_amount);
        println!("win_rate_pct: {}", result.totals.win_rate_pct);
        println!("max_drawdown_pct: {}", result.totals.max_drawdown_pct);
        for trade in &result.trades {
            println!(
                "  {} -> {}  strike {}  pnl {} pts ({})",
                trade.entry_time, trade.exit_time, trade.strike, trade.pnl_points, trade.exit_reason
            );
        }
    }

    Ok(())
}

/// Synthetic one-day historical feed for demonstration and manual smoke
/// testing; a production deployment wires a real market-data collaborator
/// behind the same [`HistoricalDataProvider`] trait (spec §6).
struct DemoHistoricalData;

#[async_trait]
impl HistoricalDataProvider for DemoHistoricalData {
    async fn fetch_day_candles(&self, _token: &str, date: NaiveDate, _interval: &str) -> Result<Vec<Candle>> {
        let ts = ist_timestamp(date, NaiveTime::from_hms_opt(9, 20, 0).unwrap());
        Ok(vec![Candle::new(ts, dec!(22500), dec!(22520), dec!(22480), dec!(22510), dec!(100000))])
    }

    async fn fetch_option_candles(
        &self,
        _underlying: Underlying,
        _strike: Decimal,
        option_type: OptionType,
        _expiry: NaiveDate,
        date: NaiveDate,
        _interval: &str,
    ) -> Result<Vec<Candle>> {
        let base = match option_type {
            OptionType::CE => dec!(100),
            OptionType::PE => dec!(80),
        };
        let t1 = ist_timestamp(date, NaiveTime::from_hms_opt(9, 20, 0).unwrap());
        let t2 = ist_timestamp(date, NaiveTime::from_hms_opt(15, 10, 0).unwrap());
        Ok(vec![
            Candle::new(t1, base, base, base, base, dec!(1000)),
            Candle::new(t2, base, base, base, base, dec!(1000)),
        ])
    }

    fn generate_option_symbol(&self, underlying: Underlying, strike: Decimal, option_type: OptionType, expiry: NaiveDate) -> String {
        format!("{underlying}{expiry}{strike}{option_type}")
    }

    async fn is_data_available(&self, _date: NaiveDate) -> Result<bool> {
        Ok(true)
    }
}

/// Synthetic NFO instrument master spanning a fixed strike range around
/// 22500/48000/19500 for NIFTY/BANKNIFTY/FINNIFTY.
struct DemoInstrumentMaster;

#[async_trait]
impl InstrumentMasterProvider for DemoInstrumentMaster {
    async fn fetch_nfo(&self) -> Result<Arc<[Instrument]>> {
        let expiry = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let mut instruments = Vec::new();
        let mut token = 1u64;
        for underlying in [Underlying::NIFTY, Underlying::BANKNIFTY, Underlying::FINNIFTY] {
            let centre = match underlying {
                Underlying::NIFTY => dec!(22500),
                Underlying::BANKNIFTY => dec!(48000),
                Underlying::FINNIFTY => dec!(19500),
            };
            let step = underlying.strike_step();
            for offset in -10..=10 {
                let strike = centre + step * Decimal::from(offset);
                for option_type in [OptionType::CE, OptionType::PE] {
                    instruments.push(Instrument {
                        trading_symbol: format!("{underlying}{expiry}{strike}{option_type}"),
                        token,
                        underlying,
                        expiry,
                        strike,
                        option_type,
                        lot_size: underlying.default_lot_size(),
                    });
                    token += 1;
                }
            }
        }
        Ok(Arc::from(instruments))
    }

    fn get_index_token(&self, underlying: Underlying) -> String {
        match underlying {
            Underlying::NIFTY => "256265".into(),
            Underlying::BANKNIFTY => "260105".into(),
            Underlying::FINNIFTY => "257801".into(),
        }
    }

    fn get_default_lot_size(&self, underlying: Underlying) -> u32 {
        underlying.default_lot_size()
    }
}
