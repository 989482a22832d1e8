use anyhow::{Context, Result};
use reqwest::{Client, Url};
use tracing::debug;

use crate::fiat::Fiat;
use crate::market::MarketData;
use crate::ticker::TickerEntry;

const TICKER_ENDPOINT: &str = "https://api.coinmarketcap.com/v1/ticker/";

#[derive(Default, Debug, Clone)]
pub struct CoinMarketCap {
    client: Client,
}

impl CoinMarketCap {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl MarketData for CoinMarketCap {
    async fn fetch(&self, fiat: Fiat) -> Result<Vec<TickerEntry>> {
        let url = Url::parse_with_params(TICKER_ENDPOINT, &[("convert", fiat.to_string())])?;
        debug!("Fetching ticker data from {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        response
            .json::<Vec<TickerEntry>>()
            .await
            .context("Malformed ticker response")
    }
}
