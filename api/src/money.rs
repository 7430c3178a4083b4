//! Provides a safe, self-contained type for representing BTC and fiat amounts.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_traits::CheckedAdd;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::fiat_currency::FiatCurrency;

/// Number of satoshis in one bitcoin.
pub const SATS_PER_BTC: i64 = 100_000_000;

/// An error that can occur when parsing a string into a `Money`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseMoneyError {
    /// The string is not in a valid numeric format (e.g., "abc", "1.2.3").
    #[error("invalid amount format")]
    InvalidFormat,
    /// The string has more decimal places than the currency supports (e.g., "$1.234").
    #[error("too many decimal places for the currency")]
    TooManyDecimals,
}

/// An error returned when a currency code is not recognized.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct ParseCurrencyError(pub String);

/// Either bitcoin or one of the supported fiat currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIs)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    BTC,
    Fiat(FiatCurrency),
}

impl Currency {
    /// Number of decimal places of the minor unit. BTC is counted in satoshis.
    pub fn decimals(&self) -> u8 {
        match self {
            Self::BTC => 8,
            Self::Fiat(fiat) => fiat.decimals(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BTC => "BTC",
            Self::Fiat(fiat) => fiat.code(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::BTC => "₿",
            Self::Fiat(fiat) => fiat.symbol(),
        }
    }

    /// Returns the fiat currency, or `None` for BTC.
    pub fn fiat(&self) -> Option<FiatCurrency> {
        match self {
            Self::BTC => None,
            Self::Fiat(fiat) => Some(*fiat),
        }
    }
}

impl From<FiatCurrency> for Currency {
    fn from(fiat: FiatCurrency) -> Self {
        Self::Fiat(fiat)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("BTC") {
            return Ok(Self::BTC);
        }
        FiatCurrency::from_str(s)
            .map(Self::Fiat)
            .map_err(|_| ParseCurrencyError(s.to_string()))
    }
}

/// A monetary value tagged with its currency.
///
/// The amount is stored as a signed 64-bit integer in the currency's smallest
/// unit (satoshis for BTC, cents for USD) so that arithmetic and comparison
/// are exact. Two values are equal only when both amount and currency match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    // --- Getters ---

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the raw amount in the currency's smallest unit.
    pub fn as_minor_units(&self) -> i64 {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    // --- Constructors ---

    /// Creates a new `Money` directly from its smallest unit.
    ///
    /// # Example
    /// ```
    /// use wallet_api::money::{Currency, Money};
    /// use wallet_api::fiat_currency::FiatCurrency;
    ///
    /// let amount = Money::new_from_minor(12345, Currency::Fiat(FiatCurrency::USD));
    /// assert_eq!(amount.to_string(), "123.45");
    /// ```
    pub fn new_from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a BTC amount from satoshis.
    pub fn from_sats(sats: i64) -> Self {
        Self::new_from_minor(sats, Currency::BTC)
    }

    /// Creates a fiat amount from its minor unit (e.g. cents).
    pub fn fiat(amount: i64, fiat: FiatCurrency) -> Self {
        Self::new_from_minor(amount, Currency::Fiat(fiat))
    }

    /// Creates a new `Money` from a floating-point value, typically from an API.
    ///
    /// The float is rounded to the nearest minor unit of the currency.
    pub fn new_from_float(value: f64, currency: Currency) -> Self {
        let multiplier = 10_f64.powi(currency.decimals() as i32);
        let amount = (value * multiplier).round() as i64;

        Self { amount, currency }
    }

    /// Creates a new `Money` by parsing a plain decimal string such as "100" or "0.125".
    ///
    /// # Examples
    /// ```
    /// use wallet_api::money::{Currency, Money, ParseMoneyError};
    ///
    /// let amount = Money::new_from_str("0.125", Currency::BTC).unwrap();
    /// assert_eq!(amount.as_minor_units(), 12_500_000);
    ///
    /// let err = Money::new_from_str("0.000000001", Currency::BTC).unwrap_err();
    /// assert_eq!(err, ParseMoneyError::TooManyDecimals);
    /// ```
    pub fn new_from_str(s: &str, currency: Currency) -> Result<Self, ParseMoneyError> {
        let decimals = currency.decimals() as u32;

        let (is_negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let mut parts = s.split('.');
        let major_str = parts.next().unwrap_or("");
        let minor_str = parts.next().unwrap_or("");

        if parts.next().is_some() || (major_str.is_empty() && minor_str.is_empty()) {
            return Err(ParseMoneyError::InvalidFormat);
        }
        if !major_str
            .chars()
            .chain(minor_str.chars())
            .all(|c| c.is_ascii_digit())
        {
            return Err(ParseMoneyError::InvalidFormat);
        }
        if minor_str.len() > decimals as usize {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let parse = |digits: &str| -> Result<i64, ParseMoneyError> {
            if digits.is_empty() {
                Ok(0)
            } else {
                digits.parse().map_err(|_| ParseMoneyError::InvalidFormat)
            }
        };
        let major_units = parse(major_str)?;
        let minor_units = parse(minor_str)?;

        let scaled_minor_units = minor_units
            .checked_mul(10_i64.pow(decimals - minor_str.len() as u32))
            .ok_or(ParseMoneyError::InvalidFormat)?;
        let total = major_units
            .checked_mul(10_i64.pow(decimals))
            .and_then(|major| major.checked_add(scaled_minor_units))
            .ok_or(ParseMoneyError::InvalidFormat)?;

        Ok(Self::new_from_minor(
            if is_negative { -total } else { total },
            currency,
        ))
    }

    /// Subtracts `rhs`, returning `None` on currency mismatch or overflow.
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self.currency != rhs.currency {
            return None;
        }
        self.amount
            .checked_sub(rhs.amount)
            .map(|amount| Self::new_from_minor(amount, self.currency))
    }

    // --- Display Methods ---

    /// Formats the amount with its currency symbol (e.g., "$25.34").
    pub fn to_string_with_symbol(&self) -> String {
        format!("{}{}", self.currency.symbol(), self)
    }

    /// Formats the amount with its currency code (e.g., "25.34 USD").
    pub fn to_string_with_code(&self) -> String {
        format!("{} {}", self, self.currency.code())
    }

    /// Formats with symbol and thousands separators (e.g., "$1,000.00").
    pub fn to_grouped_string_with_symbol(&self) -> String {
        let (sign, major, minor) = self.split_parts();
        let grouped = group_thousands(major);
        match minor {
            Some(minor) => format!("{sign}{}{grouped}.{minor}", self.currency.symbol()),
            None => format!("{sign}{}{grouped}", self.currency.symbol()),
        }
    }

    /// Formats a BTC amount with trailing zeros trimmed (e.g., "₿0.125").
    pub fn to_btc_string(&self) -> String {
        let (sign, major, minor) = self.split_parts();
        let minor = minor.map(|m| m.trim_end_matches('0').to_string());
        match minor {
            Some(minor) if !minor.is_empty() => {
                format!("{sign}{}{major}.{minor}", self.currency.symbol())
            }
            _ => format!("{sign}{}{major}", self.currency.symbol()),
        }
    }

    /// Formats the raw minor units as satoshis (e.g., "12,500,000 sats").
    pub fn to_sats_string(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        format!("{sign}{} sats", group_thousands(self.amount.unsigned_abs()))
    }

    fn split_parts(&self) -> (&'static str, u64, Option<String>) {
        let decimals = self.currency.decimals() as u32;
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        if decimals == 0 {
            return (sign, abs, None);
        }
        let divisor = 10_u64.pow(decimals);
        let minor = format!("{:0width$}", abs % divisor, width = decimals as usize);
        (sign, abs / divisor, Some(minor))
    }
}

/// Inserts a comma every three digits, counting from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats the amount as a plain numeric string with all minor digits (e.g., "25.34").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, major, minor) = self.split_parts();
        match minor {
            Some(minor) => write!(f, "{sign}{major}.{minor}"),
            None => write!(f, "{sign}{major}"),
        }
    }
}

/// Amounts in different currencies are unordered.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.amount.cmp(&other.amount))
    }
}

/// Returns `None` if currencies mismatch or if addition overflows.
impl CheckedAdd for Money {
    fn checked_add(&self, v: &Self) -> Option<Self> {
        if self.currency != v.currency {
            return None;
        }
        self.amount
            .checked_add(v.amount)
            .map(|amount| Self::new_from_minor(amount, self.currency))
    }
}

/// Panics if currencies do not match. Prefer `checked_add` for untrusted input.
impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        if self.currency != rhs.currency {
            panic!(
                "Cannot add amounts of different currencies: {:?} and {:?}",
                self.currency, rhs.currency
            );
        }
        Self::new_from_minor(self.amount + rhs.amount, self.currency)
    }
}
