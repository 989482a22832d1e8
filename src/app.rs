use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use tracing::info;

use crate::fiat::Fiat;
use crate::market::MarketData;
use crate::portfolio::{Portfolio, PortfolioStore};
use crate::table::{Cell, CellStyle, Table};
use crate::ticker::TickerEntry;

#[derive(Clone, Debug)]
pub struct Config {
    pub fiat: Fiat,
    pub action: Action,
    pub plain: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Info { symbols: Vec<String> },
    Add { symbol: String, amount: Decimal },
    Remove { symbol: String },
    Portfolio,
    None,
}

impl Action {
    // exactly one action drives an invocation, the first of info, add,
    // remove, portfolio wins
    pub fn resolve(
        info: Option<Vec<String>>,
        add: Option<(String, Decimal)>,
        remove: Option<String>,
        portfolio: bool,
    ) -> Self {
        if let Some(symbols) = info {
            Self::Info { symbols }
        } else if let Some((symbol, amount)) = add {
            Self::Add { symbol, amount }
        } else if let Some(symbol) = remove {
            Self::Remove { symbol }
        } else if portfolio {
            Self::Portfolio
        } else {
            Self::None
        }
    }
}

pub async fn run<M>(config: &Config, market: &M, store: &PortfolioStore) -> Result<()>
where
    M: MarketData,
{
    match &config.action {
        Action::Info { symbols } => run_info(config, market, symbols).await,
        Action::Add { symbol, amount } => run_add(config, market, store, symbol, *amount).await,
        Action::Remove { symbol } => run_remove(store, symbol).await,
        Action::Portfolio => run_portfolio(config, market, store).await,
        Action::None => Ok(()),
    }
}

async fn run_info<M: MarketData>(config: &Config, market: &M, symbols: &[String]) -> Result<()> {
    let entries = market.fetch(config.fiat).await?;
    let table = info_table(&entries, symbols, config.fiat)?;
    if config.plain {
        print!("{}", table.render_plain());
    } else {
        print!("{}", table.render());
    }
    Ok(())
}

async fn run_add<M: MarketData>(
    config: &Config,
    market: &M,
    store: &PortfolioStore,
    token: &str,
    amount: Decimal,
) -> Result<()> {
    let entries = market.fetch(config.fiat).await?;
    let symbol = resolve_symbol(&entries, token)?;
    let mut portfolio = store.load().await?;
    portfolio.set(&symbol, amount);
    store.save(&portfolio).await?;
    info!("Added {} {} to the portfolio", amount, symbol);
    Ok(())
}

async fn run_remove(store: &PortfolioStore, symbol: &str) -> Result<()> {
    let mut portfolio = store.load().await?;
    if portfolio.remove(symbol) {
        store.save(&portfolio).await?;
        info!("Removed {} from the portfolio", symbol.to_uppercase());
    }
    Ok(())
}

async fn run_portfolio<M: MarketData>(
    config: &Config,
    market: &M,
    store: &PortfolioStore,
) -> Result<()> {
    let entries = market.fetch(config.fiat).await?;
    let portfolio = store.load().await?;
    let (table, total) = portfolio_table(&entries, &portfolio, config.fiat)?;
    if config.plain {
        print!("{}", table.render_plain());
        println!("Total Value: {}", total);
    } else {
        print!("{}", table.render());
        println!("Total Value: {}", total.to_string().yellow().bold());
    }
    Ok(())
}

// the canonical API symbol for a user-supplied token
pub fn resolve_symbol(entries: &[TickerEntry], token: &str) -> Result<String> {
    entries
        .iter()
        .find(|entry| entry.matches(token))
        .map(|entry| entry.symbol.clone())
        .ok_or_else(|| anyhow!("{} is not supported", token))
}

pub fn info_table(entries: &[TickerEntry], symbols: &[String], fiat: Fiat) -> Result<Table> {
    let mut table = Table::new(vec![
        "Name".to_string(),
        format!("Price ({})", fiat),
        "Market Cap".to_string(),
        "Percent Change".to_string(),
    ]);
    for symbol in symbols {
        // requested symbols with no matching entry are skipped, not an error
        let Some(entry) = entries.iter().find(|entry| entry.matches(symbol)) else {
            continue;
        };
        table.push_row(market_cells(entry, fiat)?);
    }
    Ok(table)
}

pub fn portfolio_table(
    entries: &[TickerEntry],
    portfolio: &Portfolio,
    fiat: Fiat,
) -> Result<(Table, Decimal)> {
    let mut table = Table::new(vec![
        "Name".to_string(),
        format!("Price ({})", fiat),
        "Market Cap".to_string(),
        "Percent Change".to_string(),
        "Holdings".to_string(),
        format!("Value ({})", fiat),
    ]);
    let mut total = Decimal::ZERO;
    for (symbol, amount) in portfolio.iter() {
        // held currencies the API no longer lists are skipped
        let Some(entry) = entries.iter().find(|entry| entry.symbol == symbol) else {
            continue;
        };
        let value = amount * price_decimal(entry, fiat)?;
        total += value;
        let mut row = market_cells(entry, fiat)?;
        row.push(Cell::styled(amount.to_string(), CellStyle::Holdings));
        row.push(Cell::styled(value.to_string(), CellStyle::Value));
        table.push_row(row);
    }
    Ok((table, total))
}

fn market_cells(entry: &TickerEntry, fiat: Fiat) -> Result<Vec<Cell>> {
    let price = entry
        .price(fiat)
        .with_context(|| format!("{} has no {} price", entry.symbol, fiat))?;
    let market_cap = entry
        .market_cap(fiat)
        .with_context(|| format!("{} has no {} market cap", entry.symbol, fiat))?;
    Ok(vec![
        Cell::plain(entry.symbol.clone()),
        Cell::styled(price, CellStyle::Price),
        Cell::plain(market_cap),
        Cell::styled(format!("{}%", entry.percent_change_1h), CellStyle::Percent),
    ])
}

fn price_decimal(entry: &TickerEntry, fiat: Fiat) -> Result<Decimal> {
    let raw = entry
        .price(fiat)
        .with_context(|| format!("{} has no {} price", entry.symbol, fiat))?;
    Decimal::from_str(raw)
        .with_context(|| format!("Invalid {} price for {} : {}", fiat, entry.symbol, raw))
}
