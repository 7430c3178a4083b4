//! Provides a specialized map for storing BTC prices against various fiat currencies.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::fiat_currency::FiatCurrency;
use crate::money::Currency;
use crate::money::Money;

/// The price of one BTC in various fiat currencies.
///
/// Only the raw minor-unit amounts are stored. BTC's own rate is implicitly one
/// and is never stored. Iterating yields one `Money` per known fiat price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates(HashMap<FiatCurrency, i64>);

impl ExchangeRates {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Inserts or updates the price of one BTC for the price's currency.
    ///
    /// Prices denominated in BTC are ignored. If a price was already known for
    /// the currency, the old value is returned.
    pub fn insert(&mut self, price: Money) -> Option<Money> {
        let fiat = price.currency().fiat()?;
        self.0
            .insert(fiat, price.as_minor_units())
            .map(|old| Money::fiat(old, fiat))
    }

    /// Builder-style variant of `insert`.
    pub fn with_price(mut self, price: Money) -> Self {
        self.insert(price);
        self
    }

    pub fn remove(&mut self, currency: FiatCurrency) -> Option<Money> {
        self.0
            .remove(&currency)
            .map(|amount| Money::fiat(amount, currency))
    }

    /// Retrieves the price of one BTC in the given fiat currency.
    pub fn get(&self, currency: FiatCurrency) -> Option<Money> {
        self.0
            .get(&currency)
            .map(|&amount| Money::fiat(amount, currency))
    }

    /// Returns the rate for any currency in its minor units per BTC.
    ///
    /// BTC always resolves to `SATS_PER_BTC`; a fiat currency resolves only if a
    /// positive price is known.
    pub fn minor_units_per_btc(&self, currency: Currency) -> Option<i64> {
        match currency {
            Currency::BTC => Some(crate::money::SATS_PER_BTC),
            Currency::Fiat(fiat) => self.0.get(&fiat).copied().filter(|rate| *rate > 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.iter())
    }
}

/// An iterator over the prices in an `ExchangeRates`.
pub struct Iter<'a>(std::collections::hash_map::Iter<'a, FiatCurrency, i64>);

impl Iterator for Iter<'_> {
    type Item = Money;

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(currency, &amount)| Money::fiat(amount, *currency))
    }
}

impl<'a> IntoIterator for &'a ExchangeRates {
    type Item = Money;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_fiat_prices_only() {
        let mut rates = ExchangeRates::new();
        assert_eq!(rates.insert(Money::fiat(800_000, FiatCurrency::USD)), None);
        assert_eq!(
            rates.insert(Money::fiat(810_000, FiatCurrency::USD)),
            Some(Money::fiat(800_000, FiatCurrency::USD))
        );
        assert_eq!(rates.insert(Money::from_sats(1)), None);
        assert_eq!(rates.iter().count(), 1);
        assert_eq!(
            rates.get(FiatCurrency::USD),
            Some(Money::fiat(810_000, FiatCurrency::USD))
        );
    }

    #[test]
    fn btc_rate_is_implicit() {
        let rates = ExchangeRates::new().with_price(Money::fiat(0, FiatCurrency::EUR));
        assert_eq!(
            rates.minor_units_per_btc(Currency::BTC),
            Some(crate::money::SATS_PER_BTC)
        );
        assert_eq!(rates.minor_units_per_btc(FiatCurrency::EUR.into()), None);
        assert_eq!(rates.minor_units_per_btc(FiatCurrency::USD.into()), None);
    }
}
