use std::env;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::converter::CurrencyPair;
use crate::fiat_currency::FiatCurrency;
use crate::money::Currency;
use crate::price_providers::PriceProviderKind;

/// Represents the user's complete currency display preference.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize, strum::EnumIs)]
pub enum DisplayPreference {
    /// Pure BTC mode. The app should not fetch or display any fiat info.
    BtcOnly,

    /// Fiat integration is enabled.
    FiatEnabled {
        /// The specific fiat currency selected by the user.
        fiat: FiatCurrency,

        /// Determines the primary display: `true` for fiat, `false` for BTC.
        display_as_fiat: bool,

        /// The selected price data provider.
        provider: PriceProviderKind,
    },
}

impl DisplayPreference {
    /// Creates a DisplayPreference from environment variables, with a
    /// conservative in-code default.
    ///
    /// # Environment Variables (case-insensitive for "true" or "false"):
    /// - `BTC_ONLY`: if "true", forces BTC-only mode. Defaults to false.
    /// - `FIAT_CURRENCY`: an ISO code such as "USD" or "EUR".
    /// - `DISPLAY_AS_FIAT`: "true" to make fiat the primary display.
    /// - `PRICE_PROVIDER`: "coingecko" or "coinpaprika".
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        /// Lowest priority setting.
        const BTC_ONLY: bool = false;

        let is_true = |val: String| val.eq_ignore_ascii_case("true") || val == "1";

        let is_btc_mode = lookup("BTC_ONLY").map(is_true).unwrap_or(BTC_ONLY);

        if is_btc_mode {
            return Self::BtcOnly;
        }

        let fiat = lookup("FIAT_CURRENCY")
            .and_then(|s| FiatCurrency::from_str(&s).ok())
            .unwrap_or_default();

        let display_as_fiat = lookup("DISPLAY_AS_FIAT").map(is_true).unwrap_or(true);

        let provider = lookup("PRICE_PROVIDER")
            .and_then(|s| PriceProviderKind::from_str(&s).ok())
            .unwrap_or_default();

        Self::FiatEnabled {
            fiat,
            display_as_fiat,
            provider,
        }
    }

    /// The currency pair amounts should be shown in.
    ///
    /// BTC-only mode still carries the default fiat so conversions stay
    /// well-defined; it is simply never primary.
    pub fn currency_pair(&self) -> CurrencyPair {
        match *self {
            Self::BtcOnly => CurrencyPair::btc_primary(FiatCurrency::default()),
            Self::FiatEnabled {
                fiat,
                display_as_fiat: true,
                ..
            } => CurrencyPair::new(Currency::Fiat(fiat), fiat),
            Self::FiatEnabled { fiat, .. } => CurrencyPair::btc_primary(fiat),
        }
    }
}

impl Default for DisplayPreference {
    fn default() -> Self {
        Self::from_env()
    }
}
