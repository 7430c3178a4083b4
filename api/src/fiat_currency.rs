//! Defines the fiat currencies a payment can be displayed and limited in.

use serde::Deserialize;
use serde::Serialize;

/// A fiat currency, containing its code, symbol, and formatting rules.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Default,
    strum::EnumIs,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum FiatCurrency {
    AUD, // Australian Dollar
    BRL, // Brazilian Real
    CAD, // Canadian Dollar
    CHF, // Swiss Franc
    EUR, // Euro
    GBP, // Great British Pound
    JPY, // Japanese Yen
    KWD, // Kuwaiti Dinar
    MXN, // Mexican Peso
    SEK, // Swedish Krona
    #[default]
    USD, // United States Dollar
}

impl FiatCurrency {
    /// Returns the number of decimal digits used by the currency.
    ///
    /// USD uses 2 decimal places (cents), JPY uses 0 and KWD uses 3.
    pub fn decimals(&self) -> u8 {
        match self {
            Self::JPY => 0,
            Self::KWD => 3,
            _ => 2,
        }
    }

    /// Returns the graphical symbol for the currency (e.g., '$').
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::AUD => "A$",
            Self::BRL => "R$",
            Self::CAD => "C$",
            Self::CHF => "CHF",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
            Self::KWD => "د.ك",
            Self::MXN => "MX$",
            Self::SEK => "kr",
            Self::USD => "$",
        }
    }

    /// Returns the ISO 4217 code for the currency (e.g., "USD").
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Returns the full name of the currency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AUD => "Australian Dollar",
            Self::BRL => "Brazilian Real",
            Self::CAD => "Canadian Dollar",
            Self::CHF => "Swiss Franc",
            Self::EUR => "Euro",
            Self::GBP => "Great British Pound",
            Self::JPY => "Japanese Yen",
            Self::KWD => "Kuwaiti Dinar",
            Self::MXN => "Mexican Peso",
            Self::SEK => "Swedish Krona",
            Self::USD => "United States Dollar",
        }
    }

    /// Returns the lowercase code used as a query key by price APIs.
    pub fn api_key(&self) -> String {
        self.code().to_ascii_lowercase()
    }
}
