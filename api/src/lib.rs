//! Currency, exchange-rate and preference types shared by every wallet screen.

pub mod converter;
pub mod exchange_rates;
pub mod fee_mode;
pub mod fiat_currency;
pub mod money;
pub mod prefs;
pub mod price_providers;
pub mod rate_cache;

pub type ApiError = anyhow::Error;
