use anyhow::Result;

use crate::fiat::Fiat;
use crate::ticker::TickerEntry;

pub mod coinmarketcap;

pub trait MarketData {
    async fn fetch(&self, fiat: Fiat) -> Result<Vec<TickerEntry>>;
}
