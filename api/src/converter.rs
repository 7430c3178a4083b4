//! Converts amounts between BTC and fiat using a snapshot of exchange rates.

use num_bigint::BigInt;
use num_traits::Signed;
use num_traits::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

use crate::exchange_rates::ExchangeRates;
use crate::fiat_currency::FiatCurrency;
use crate::money::Currency;
use crate::money::Money;

/// Which currency is shown first, and which fiat currency is in play.
///
/// The secondary currency is always the "other side": the fiat currency when
/// BTC is primary, and BTC otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub primary: Currency,
    pub fiat: FiatCurrency,
}

impl CurrencyPair {
    pub fn new(primary: Currency, fiat: FiatCurrency) -> Self {
        Self { primary, fiat }
    }

    /// A pair that displays BTC first.
    pub fn btc_primary(fiat: FiatCurrency) -> Self {
        Self::new(Currency::BTC, fiat)
    }

    /// A pair that displays fiat first.
    pub fn fiat_primary(fiat: FiatCurrency) -> Self {
        Self::new(Currency::Fiat(fiat), fiat)
    }

    pub fn secondary(&self) -> Currency {
        match self.primary {
            Currency::BTC => Currency::Fiat(self.fiat),
            Currency::Fiat(_) => Currency::BTC,
        }
    }

    /// Returns the pair with primary and secondary exchanged.
    pub fn swapped(&self) -> Self {
        Self::new(self.secondary(), self.fiat)
    }
}

/// Converts `amount` to `to` using `rates`.
///
/// Uses integer math on minor units with round-half-away-from-zero, so the
/// result is exact to the destination's minor unit. Returns `None` when a rate
/// for either side is unknown or the result does not fit.
pub fn convert(rates: &ExchangeRates, amount: Money, to: Currency) -> Option<Money> {
    if amount.currency() == to {
        return Some(amount);
    }
    let from_rate = BigInt::from(rates.minor_units_per_btc(amount.currency())?);
    let to_rate = BigInt::from(rates.minor_units_per_btc(to)?);

    let numerator: BigInt = BigInt::from(amount.as_minor_units()) * to_rate * 2;
    let denominator: BigInt = from_rate * 2;
    let half: BigInt = &denominator / 2;
    let rounded: BigInt = if numerator.is_negative() {
        (numerator - half) / denominator
    } else {
        (numerator + half) / denominator
    };

    rounded
        .to_i64()
        .map(|minor| Money::new_from_minor(minor, to))
}

/// An amount plus the context needed to express it in any currency.
///
/// The converter is a pure value: every accessor derives its result from the
/// three inputs, and the `with_*` helpers return a new converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyConverter {
    rates: ExchangeRates,
    from_amount: Money,
    currency_pair: CurrencyPair,
}

impl CurrencyConverter {
    pub fn new(rates: ExchangeRates, from_amount: Money, currency_pair: CurrencyPair) -> Self {
        Self {
            rates,
            from_amount,
            currency_pair,
        }
    }

    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    pub fn from_amount(&self) -> Money {
        self.from_amount
    }

    pub fn currency_pair(&self) -> CurrencyPair {
        self.currency_pair
    }

    /// The amount expressed in `currency`.
    pub fn amount(&self, currency: Currency) -> Option<Money> {
        convert(&self.rates, self.from_amount, currency)
    }

    pub fn btc_amount(&self) -> Option<Money> {
        self.amount(Currency::BTC)
    }

    pub fn fiat_amount(&self) -> Option<Money> {
        self.amount(Currency::Fiat(self.currency_pair.fiat))
    }

    pub fn primary_amount(&self) -> Option<Money> {
        self.amount(self.currency_pair.primary)
    }

    pub fn secondary_amount(&self) -> Option<Money> {
        self.amount(self.currency_pair.secondary())
    }

    /// Converts an arbitrary amount with this converter's rates.
    pub fn convert(&self, amount: Money, to: Currency) -> Option<Money> {
        convert(&self.rates, amount, to)
    }

    pub fn with_amount(&self, from_amount: Money) -> Self {
        Self::new(self.rates.clone(), from_amount, self.currency_pair)
    }

    pub fn with_pair(&self, currency_pair: CurrencyPair) -> Self {
        Self::new(self.rates.clone(), self.from_amount, currency_pair)
    }

    pub fn with_rates(&self, rates: ExchangeRates) -> Self {
        Self::new(rates, self.from_amount, self.currency_pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::SATS_PER_BTC;

    fn rates_8000() -> ExchangeRates {
        ExchangeRates::new().with_price(Money::fiat(800_000, FiatCurrency::USD))
    }

    #[test]
    fn converts_fiat_to_btc_and_back() {
        let rates = rates_8000();
        let thousand_usd = Money::fiat(100_000, FiatCurrency::USD);
        let btc = convert(&rates, thousand_usd, Currency::BTC).unwrap();
        assert_eq!(btc, Money::from_sats(12_500_000));
        assert_eq!(
            convert(&rates, btc, FiatCurrency::USD.into()),
            Some(thousand_usd)
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1 cent at 8000 USD/BTC is exactly 125 sats, 1 sat is 0.008 cents.
        let rates = rates_8000();
        assert_eq!(
            convert(&rates, Money::from_sats(62), FiatCurrency::USD.into()),
            Some(Money::fiat(0, FiatCurrency::USD))
        );
        assert_eq!(
            convert(&rates, Money::from_sats(63), FiatCurrency::USD.into()),
            Some(Money::fiat(1, FiatCurrency::USD))
        );
        assert_eq!(
            convert(&rates, Money::from_sats(-63), FiatCurrency::USD.into()),
            Some(Money::fiat(-1, FiatCurrency::USD))
        );
    }

    #[test]
    fn unknown_rate_yields_none() {
        let rates = rates_8000();
        assert_eq!(
            convert(&rates, Money::from_sats(1), FiatCurrency::EUR.into()),
            None
        );
        assert_eq!(
            convert(&rates, Money::from_sats(1), Currency::BTC),
            Some(Money::from_sats(1))
        );
    }

    #[test]
    fn round_trip_stays_within_one_minor_unit() {
        let rates = ExchangeRates::new()
            .with_price(Money::fiat(800_000, FiatCurrency::USD))
            .with_price(Money::fiat(3_712_345, FiatCurrency::EUR))
            .with_price(Money::fiat(1_234_567, FiatCurrency::JPY));

        for fiat in [FiatCurrency::USD, FiatCurrency::EUR, FiatCurrency::JPY] {
            for minor in [0_i64, 1, 7, 99, 12_345, 100_000, 9_876_543, -4_321] {
                let original = Money::fiat(minor, fiat);
                let btc = convert(&rates, original, Currency::BTC).unwrap();
                let back = convert(&rates, btc, fiat.into()).unwrap();
                assert!((back.as_minor_units() - minor).abs() <= 1, "{original} -> {back}");
            }

            // BTC -> fiat -> BTC can only be as precise as one fiat minor unit.
            let rate = rates.minor_units_per_btc(fiat.into()).unwrap();
            let tolerance = SATS_PER_BTC / rate + 1;
            for sats in [0_i64, 1, 546, 12_345_678, SATS_PER_BTC, 21 * SATS_PER_BTC] {
                let original = Money::from_sats(sats);
                let fiat_amount = convert(&rates, original, fiat.into()).unwrap();
                let back = convert(&rates, fiat_amount, Currency::BTC).unwrap();
                assert!((back.as_minor_units() - sats).abs() <= tolerance);
            }
        }
    }

    #[test]
    fn converter_exposes_primary_and_secondary() {
        let converter = CurrencyConverter::new(
            rates_8000(),
            Money::fiat(10_000, FiatCurrency::USD),
            CurrencyPair::fiat_primary(FiatCurrency::USD),
        );
        assert_eq!(
            converter.primary_amount(),
            Some(Money::fiat(10_000, FiatCurrency::USD))
        );
        assert_eq!(converter.secondary_amount(), Some(Money::from_sats(1_250_000)));
        assert_eq!(converter.btc_amount(), converter.secondary_amount());

        let swapped = converter.with_pair(converter.currency_pair().swapped());
        assert_eq!(swapped.primary_amount(), Some(Money::from_sats(1_250_000)));
        assert_eq!(swapped.currency_pair().secondary(), FiatCurrency::USD.into());
    }
}
