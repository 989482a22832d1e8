use std::str::FromStr;

use anyhow::{anyhow, Result};
use strum::VariantNames;
use strum_macros::{Display, EnumString};

// Fiat currencies the ticker endpoint can convert prices into.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum Fiat {
    AUD,
    BRL,
    CAD,
    CHF,
    CLP,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    HKD,
    HUF,
    IDR,
    ILS,
    INR,
    JPY,
    KRW,
    MXN,
    MYR,
    NOK,
    NZD,
    PHP,
    PKR,
    PLN,
    RUB,
    SEK,
    SGD,
    THB,
    TRY,
    TWD,
    #[default]
    USD,
    ZAR,
}

impl Fiat {
    pub fn resolve(code: &str) -> Result<Self> {
        Self::from_str(code).map_err(|_| anyhow!("{} is not a supported fiat currency", code))
    }

    // lowercase code, as used in the response field names (price_usd, ...)
    pub fn field_suffix(&self) -> String {
        self.to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        for code in Fiat::VARIANTS {
            assert!(Fiat::resolve(code).is_ok());
            assert!(Fiat::resolve(&code.to_lowercase()).is_ok());
        }
        assert_eq!(Fiat::resolve("eur").unwrap(), Fiat::EUR);
        assert_eq!(Fiat::resolve("Jpy").unwrap(), Fiat::JPY);
    }

    #[test]
    fn test_resolve_rejects_unknown_codes() {
        let err = Fiat::resolve("XYZ").unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_default_is_usd() {
        assert_eq!(Fiat::default(), Fiat::USD);
        assert_eq!(Fiat::default().field_suffix(), "usd");
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Fiat::GBP.to_string(), "GBP");
    }
}
