use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

pub const PORTFOLIO_FILE: &str = "portfolio.json";

// Held quantities keyed by canonical uppercase symbol. Key order is the row
// order of the portfolio view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Portfolio {
    holdings: BTreeMap<String, Decimal>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.holdings.get(&symbol.to_uppercase()).copied()
    }

    // upsert, replaces any previous amount for the symbol
    pub fn set(&mut self, symbol: &str, amount: Decimal) {
        self.holdings.insert(symbol.to_uppercase(), amount);
    }

    // removing an absent symbol is a no-op
    pub fn remove(&mut self, symbol: &str) -> bool {
        self.holdings.remove(&symbol.to_uppercase()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.holdings
            .iter()
            .map(|(symbol, amount)| (symbol.as_str(), *amount))
    }
}

// The file is a single JSON object mapping symbol to a plain JSON number,
// e.g. {"BTC":2.5}.
impl Serialize for Portfolio {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.holdings.len()))?;
        for (symbol, amount) in &self.holdings {
            let amount = amount
                .to_f64()
                .ok_or_else(|| serde::ser::Error::custom("quantity out of range"))?;
            map.serialize_entry(symbol, &amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Portfolio {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PortfolioVisitor;

        impl<'de> Visitor<'de> for PortfolioVisitor {
            type Value = Portfolio;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map of currency symbol to held quantity")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut holdings = BTreeMap::new();
                while let Some((symbol, value)) = access.next_entry::<String, Value>()? {
                    // quantities are numbers, but tolerate string-encoded ones
                    let amount = match &value {
                        Value::Number(n) => Decimal::from_str(&n.to_string()),
                        Value::String(s) => Decimal::from_str(s),
                        _ => {
                            return Err(de::Error::custom(format!(
                                "invalid quantity for {}",
                                symbol
                            )))
                        }
                    }
                    .map_err(de::Error::custom)?;
                    holdings.insert(symbol.to_uppercase(), amount);
                }
                Ok(Portfolio { holdings })
            }
        }

        deserializer.deserialize_map(PortfolioVisitor)
    }
}

// Reads and writes the portfolio file. Writes are wholesale and not atomic,
// concurrent invocations are last-writer-wins.
#[derive(Clone, Debug)]
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(home.join(PORTFOLIO_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // missing file reads as empty, an unparseable one is reset to empty
    // after a warning
    pub async fn load(&self) -> Result<Portfolio> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Portfolio::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        match serde_json::from_slice::<Portfolio>(&raw) {
            Ok(portfolio) => Ok(portfolio),
            Err(err) => {
                warn!(
                    "Resetting unreadable portfolio file {} : {}",
                    self.path.display(),
                    err
                );
                let empty = Portfolio::new();
                self.save(&empty).await?;
                Ok(empty)
            }
        }
    }

    pub async fn save(&self, portfolio: &Portfolio) -> Result<()> {
        let json = serde_json::to_vec(portfolio)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> PortfolioStore {
        PortfolioStore::new(dir.path().join(PORTFOLIO_FILE))
    }

    #[test]
    fn test_set_replaces_existing_amount() {
        let mut portfolio = Portfolio::new();
        portfolio.set("BTC", dec!(1));
        portfolio.set("btc", dec!(2.5));
        assert_eq!(portfolio.len(), 1);
        assert_eq!(portfolio.get("BTC"), Some(dec!(2.5)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut portfolio = Portfolio::new();
        portfolio.set("ETH", dec!(3));
        assert!(portfolio.remove("eth"));
        assert!(!portfolio.remove("eth"));
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_serializes_quantities_as_numbers() {
        let mut portfolio = Portfolio::new();
        portfolio.set("BTC", dec!(2.5));
        let json = serde_json::to_string(&portfolio).unwrap();
        assert_eq!(json, r#"{"BTC":2.5}"#);
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let portfolio: Portfolio = serde_json::from_str(r#"{"btc":2.5,"ETH":"0.75"}"#).unwrap();
        assert_eq!(portfolio.get("BTC"), Some(dec!(2.5)));
        assert_eq!(portfolio.get("ETH"), Some(dec!(0.75)));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let portfolio = store_in(&dir).load().await.unwrap();
        assert!(portfolio.is_empty());
        // nothing gets written for a merely missing file
        assert!(!dir.path().join(PORTFOLIO_FILE).exists());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"not json").unwrap();

        let portfolio = store.load().await.unwrap();
        assert!(portfolio.is_empty());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{}");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut portfolio = Portfolio::new();
        portfolio.set("BTC", dec!(2.5));
        portfolio.set("XRP", dec!(1000));
        store.save(&portfolio).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, portfolio);
    }
}
