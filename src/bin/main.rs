use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use coin_tracker::app::{self, Action, Config};
use coin_tracker::fiat::Fiat;
use coin_tracker::market::coinmarketcap::CoinMarketCap;
use coin_tracker::portfolio::PortfolioStore;
use rust_decimal::Decimal;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Track cryptocurrency prices and a local portfolio from the command line
#[derive(Parser, Debug)]
struct Args {
    /// Get info on a list of currencies (symbol or full name)
    #[arg(short, long, num_args = 1.., value_name = "SYMBOL")]
    info: Option<Vec<String>>,

    /// Fiat currency to convert prices to (default: USD)
    #[arg(short, long, env = "COINTRACK_CONVERT", value_name = "CODE")]
    convert: Option<String>,

    /// Currency to add to the portfolio
    #[arg(short, long, requires = "amt", value_name = "SYMBOL")]
    add: Option<String>,

    /// Amount of currency to add to the portfolio
    #[arg(long, value_name = "AMOUNT")]
    amt: Option<Decimal>,

    /// Currency to remove from the portfolio
    #[arg(short, long, visible_alias = "rm", value_name = "SYMBOL")]
    remove: Option<String>,

    /// View the portfolio
    #[arg(short, long)]
    portfolio: bool,

    /// Tab-separated output without colors
    #[arg(long)]
    plain: bool,

    /// Portfolio file location
    #[arg(long, env = "COINTRACK_PORTFOLIO", value_name = "PATH")]
    portfolio_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(err) = run(args).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let fiat = match &args.convert {
        Some(code) => Fiat::resolve(code)?,
        None => Fiat::default(),
    };

    let action = Action::resolve(args.info, args.add.zip(args.amt), args.remove, args.portfolio);

    let store = match args.portfolio_path {
        Some(path) => PortfolioStore::new(path),
        None => PortfolioStore::new(PortfolioStore::default_path()?),
    };

    let config = Config {
        fiat,
        action,
        plain: args.plain,
    };
    app::run(&config, &CoinMarketCap::new(), &store).await
}
