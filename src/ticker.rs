use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::fiat::Fiat;

// One currency's market snapshot as returned by the ticker endpoint. The
// fiat-converted fields arrive under suffixed keys (price_usd, market_cap_eur,
// ...) depending on the convert parameter, so they land in the flattened map
// and are selected per fiat at read time.
#[derive(Deserialize, Clone, Debug)]
pub struct TickerEntry {
    pub symbol: String,
    pub name: String,
    pub percent_change_1h: String,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl TickerEntry {
    // case-insensitive match on the short code or the full name
    pub fn matches(&self, query: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }

    pub fn price(&self, fiat: Fiat) -> Option<&str> {
        self.field("price", fiat)
    }

    pub fn market_cap(&self, fiat: Fiat) -> Option<&str> {
        self.field("market_cap", fiat)
    }

    fn field(&self, prefix: &str, fiat: Fiat) -> Option<&str> {
        self.fields
            .get(&format!("{}_{}", prefix, fiat.field_suffix()))
            .and_then(Value::as_str)
    }
}
