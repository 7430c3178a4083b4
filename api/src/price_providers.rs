//! Defines traits and implementations for external BTC price data providers.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::exchange_rates::ExchangeRates;
use crate::fiat_currency::FiatCurrency;
use crate::money::Money;
use crate::ApiError;

/// Fiat currencies requested from remote price APIs.
pub const QUOTED_CURRENCIES: [FiatCurrency; 3] =
    [FiatCurrency::USD, FiatCurrency::EUR, FiatCurrency::GBP];

/// A service that can provide fiat prices for BTC.
#[allow(async_fn_in_trait)]
pub trait PriceProvider {
    /// Fetches the latest exchange rates.
    async fn get_prices(&self) -> Result<ExchangeRates, ApiError>;
}

/// Selects which remote price provider the user prefers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PriceProviderKind {
    #[default]
    CoinGecko,
    CoinPaprika,
}

/// Provides price data from the public CoinGecko API.
pub mod coin_gecko {
    use super::*;

    /// The structure of the JSON response from CoinGecko's simple price API.
    #[derive(Deserialize, Debug)]
    pub(crate) struct CoinGeckoResponse {
        pub(crate) bitcoin: HashMap<String, f64>,
    }

    impl CoinGeckoResponse {
        pub(crate) fn into_rates(self) -> ExchangeRates {
            let mut rates = ExchangeRates::new();
            for fiat in QUOTED_CURRENCIES {
                if let Some(price) = self.bitcoin.get(&fiat.api_key()) {
                    rates.insert(Money::new_from_float(*price, fiat.into()));
                }
            }
            rates
        }
    }

    pub struct CoinGecko;

    impl PriceProvider for CoinGecko {
        async fn get_prices(&self) -> Result<ExchangeRates, ApiError> {
            let vs_currencies = QUOTED_CURRENCIES
                .iter()
                .map(FiatCurrency::api_key)
                .collect::<Vec<_>>()
                .join(",");
            let url = format!(
                "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies={vs_currencies}"
            );

            let resp = reqwest::Client::new()
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<CoinGeckoResponse>()
                .await?;

            tracing::debug!("coingecko quoted {} currencies", resp.bitcoin.len());
            Ok(resp.into_rates())
        }
    }
}

/// Provides price data from the CoinPaprika API.
pub mod coin_paprika {
    use super::*;
    use serde_json::Value;

    /// Extracts `quotes.<CODE>.price` for each quoted currency.
    pub(crate) fn rates_from_ticker(resp: &Value) -> ExchangeRates {
        let get_price = |code: &str| -> Option<f64> {
            resp.get("quotes")?.get(code)?.get("price")?.as_f64()
        };

        let mut rates = ExchangeRates::new();
        for fiat in QUOTED_CURRENCIES {
            if let Some(price) = get_price(fiat.code()) {
                rates.insert(Money::new_from_float(price, fiat.into()));
            }
        }
        rates
    }

    pub struct CoinPaprika;

    impl PriceProvider for CoinPaprika {
        async fn get_prices(&self) -> Result<ExchangeRates, ApiError> {
            let quotes = QUOTED_CURRENCIES
                .iter()
                .map(FiatCurrency::code)
                .collect::<Vec<_>>()
                .join(",");
            let url = format!("https://api.coinpaprika.com/v1/tickers/btc-bitcoin?quotes={quotes}");

            let resp: Value = reqwest::Client::new()
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await?;

            Ok(rates_from_ticker(&resp))
        }
    }
}

/// Dispatches to the provider selected by a `PriceProviderKind`.
impl PriceProvider for PriceProviderKind {
    async fn get_prices(&self) -> Result<ExchangeRates, ApiError> {
        match self {
            Self::CoinGecko => coin_gecko::CoinGecko.get_prices().await,
            Self::CoinPaprika => coin_paprika::CoinPaprika.get_prices().await,
        }
    }
}
