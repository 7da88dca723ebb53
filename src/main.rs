use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};

use coinflip_trader::quotes::QuoteSource;
use coinflip_trader::{
    daily_returns, print_summary, render_report, simulate, SimulationConfig, StooqClient, Summary,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Ticker symbol to fetch
    #[arg(short, long, default_value = "NVDA")]
    ticker: String,

    /// Start of the historical window (YYYY-MM-DD)
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// End of the historical window (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    end: NaiveDate,

    /// Number of random strategies to simulate
    #[arg(short = 'n', long, default_value = "10000")]
    simulations: usize,

    /// RNG seed for reproducible runs (unset = fresh entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output path for the rendered figure
    #[arg(short, long, default_value = "outcomes.svg")]
    output: PathBuf,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coinflip_trader=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.end <= args.start {
        bail!("end date {} is not after start date {}", args.end, args.start);
    }

    info!("Fetching data for {}...", args.ticker);
    let client = StooqClient::new();
    let prices = client
        .daily_closes(&args.ticker, args.start, args.end)
        .context("failed to fetch price series")?;
    info!("Fetched {} trading days", prices.len());

    let returns = daily_returns(&prices)?;

    info!("Running {} random simulations...", args.simulations);
    let config = SimulationConfig { num_simulations: args.simulations, seed: args.seed };
    let output = simulate(&returns, &config)?;

    let summary = Summary::from_final_values(&output.final_values, output.benchmark_final());
    print_summary(&args.ticker, args.simulations, &summary);

    // A render failure loses only the figure; the report above stands
    render_report(
        &args.output,
        &output.final_values,
        &output.equity_curves,
        &output.benchmark_curve,
        &summary,
    )
    .with_context(|| format!("failed to write figure to {}", args.output.display()))?;

    info!("Figure written to {}", args.output.display());
    Ok(())
}
